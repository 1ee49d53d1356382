use std::borrow::Cow;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use fieldmap_model::SourceTable;

use crate::error::{IngestError, Result};

/// Delimiters considered when sniffing, in tie-break order.
pub const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Picks the candidate delimiter occurring most often in the header line.
///
/// Ties keep the earlier candidate; a line without any candidate yields `,`.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for candidate in DELIMITER_CANDIDATES {
        let count = header_line.bytes().filter(|b| *b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Collapses runs of whitespace in a header cell.
pub(crate) fn normalize_header(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes))
}

/// Reads CSV bytes into a normalized source table.
///
/// The first row holds the headers. Cells are trimmed, missing cells become
/// empty strings and records with only empty cells are skipped. Invalid
/// UTF-8 is replaced rather than rejected.
pub fn read_csv_bytes(name: &str, bytes: &[u8]) -> Result<SourceTable> {
    let text = decode(bytes);
    let delimiter = sniff_delimiter(text.lines().next().unwrap_or_default());
    let csv_error = |source| IngestError::CsvParse {
        name: name.to_string(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_header)
        .collect();

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(str::is_empty) {
            skipped += 1;
            continue;
        }
        records.push(record.iter().map(str::to_string).collect());
    }
    if skipped > 0 {
        debug!(source = name, skipped, "skipped blank records");
    }

    let table = SourceTable::new(headers, records);
    info!(
        source = name,
        delimiter = %char::from(delimiter).escape_default(),
        columns = table.columns().len(),
        rows = table.row_count(),
        "read source table"
    );
    Ok(table)
}
