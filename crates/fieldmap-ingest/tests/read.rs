use fieldmap_ingest::{IngestError, read_source_bytes, read_source_file};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[test]
fn reads_semicolon_file_with_ragged_rows() {
    let table = read_source_bytes(
        "people.csv",
        b"\xEF\xBB\xBFfirst_name ; amount;city\nAnn;12,50\n ;  ; \nBob;3;Oslo;extra\n",
    )
    .expect("read");
    assert_eq!(table.columns(), strings(&["first_name", "amount", "city"]).as_slice());
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows()[0], strings(&["Ann", "12,50", ""]));
    assert_eq!(table.rows()[1], strings(&["Bob", "3", "Oslo"]));
}

#[test]
fn quoted_delimiters_stay_in_cells() {
    let table = read_source_bytes(
        "quoted.csv",
        b"name,address\n\"Doe, Jane\",\"1 Main St\"\n",
    )
    .expect("read");
    assert_eq!(table.rows()[0], strings(&["Doe, Jane", "1 Main St"]));
}

#[test]
fn tab_separated_samples_skip_empty_cells() {
    let table = read_source_bytes("t.tsv", b"id\tcode\n1\t\n2\tB\n3\tC\n4\tD\n").expect("read");
    let columns = table.source_columns(fieldmap_model::SAMPLE_LIMIT);
    assert_eq!(columns[1].samples, strings(&["B", "C", "D"]));
}

#[test]
fn empty_input_is_an_empty_table() {
    let table = read_source_bytes("empty.csv", b"").expect("read");
    assert!(table.is_empty());
    assert_eq!(table.row_count(), 0);
}

#[test]
fn reads_from_disk_and_reports_missing_files() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("source.csv");
    std::fs::write(&path, "a|b\n1|2\n").expect("write source");
    let table = read_source_file(&path).expect("read");
    assert_eq!(table.rows()[0], strings(&["1", "2"]));

    let missing = dir.path().join("missing.csv");
    let err = read_source_file(&missing).expect_err("missing file");
    assert!(matches!(err, IngestError::FileRead { ref path, .. } if *path == missing));
}

fn people_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let people = workbook.add_worksheet();
    people.set_name("People").expect("sheet name");
    people.write_string(0, 0, " first   name ").expect("header");
    people.write_string(0, 1, "amount").expect("header");
    people.write_string(0, 2, "city").expect("header");
    people.write_string(1, 0, " Ann ").expect("cell");
    people.write_number(1, 1, 12.5).expect("cell");
    people.write_string(3, 0, "Bob").expect("cell");
    people.write_number(3, 1, 3).expect("cell");
    people.write_string(3, 2, "Oslo").expect("cell");

    let other = workbook.add_worksheet();
    other.set_name("Ignored").expect("sheet name");
    other.write_string(0, 0, "unused").expect("cell");

    workbook.save_to_buffer().expect("xlsx bytes")
}

#[test]
fn reads_first_worksheet_of_xlsx() {
    let table = read_source_bytes("people.xlsx", &people_workbook()).expect("read");
    assert_eq!(table.columns(), strings(&["first name", "amount", "city"]).as_slice());
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows()[0], strings(&["Ann", "12.5", ""]));
    assert_eq!(table.rows()[1], strings(&["Bob", "3", "Oslo"]));
}

#[test]
fn spreadsheet_files_are_read_by_extension() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("People.XLSX");
    std::fs::write(&path, people_workbook()).expect("write workbook");
    let table = read_source_file(&path).expect("read");
    assert_eq!(table.rows()[0][0], "Ann");

    let err = read_source_bytes("broken.xlsx", b"id,name\n1,Ann\n").expect_err("csv named xlsx");
    assert!(matches!(err, IngestError::Spreadsheet { .. }));
}
