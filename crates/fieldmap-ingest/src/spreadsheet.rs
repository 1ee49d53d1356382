use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use tracing::{debug, info};

use fieldmap_model::SourceTable;

use crate::csv_table::normalize_header;
use crate::error::{IngestError, Result};

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Reads the first worksheet of an `.xlsx`/`.xls`/`.ods` workbook.
///
/// The first row holds the headers. Empty cells become empty strings and
/// rows with only empty cells are skipped. A workbook without worksheets
/// yields an empty table.
pub fn read_spreadsheet_bytes(name: &str, bytes: &[u8]) -> Result<SourceTable> {
    let spreadsheet_error = |source| IngestError::Spreadsheet {
        name: name.to_string(),
        source,
    };
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(spreadsheet_error)?;
    let sheet_name = workbook.sheet_names().first().cloned();
    let Some(range) = workbook.worksheet_range_at(0) else {
        debug!(source = name, "workbook has no worksheets");
        return Ok(SourceTable::default());
    };
    let range = range.map_err(spreadsheet_error)?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| normalize_header(&cell_to_string(cell))).collect())
        .unwrap_or_default();

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in rows {
        let values: Vec<String> = row.iter().map(cell_to_string).collect();
        if values.iter().all(String::is_empty) {
            skipped += 1;
            continue;
        }
        records.push(values);
    }
    if skipped > 0 {
        debug!(source = name, skipped, "skipped blank rows");
    }

    let table = SourceTable::new(headers, records);
    info!(
        source = name,
        sheet = sheet_name.as_deref().unwrap_or_default(),
        columns = table.columns().len(),
        rows = table.row_count(),
        "read source worksheet"
    );
    Ok(table)
}
