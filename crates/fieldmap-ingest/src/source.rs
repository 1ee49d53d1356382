use std::path::Path;

use fieldmap_model::SourceTable;

use crate::csv_table::read_csv_bytes;
use crate::error::{IngestError, Result};
use crate::spreadsheet::read_spreadsheet_bytes;

/// File extensions read as spreadsheets; everything else is delimited text.
pub const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited,
    Spreadsheet,
}

impl SourceFormat {
    /// Picks the format from the extension of a file name, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension {
            Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) => Self::Spreadsheet,
            _ => Self::Delimited,
        }
    }
}

/// Reads a source file into a normalized table.
pub fn read_source_file(path: &Path) -> Result<SourceTable> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_source_bytes(&path.display().to_string(), &bytes)
}

/// Reads source bytes, choosing the reader from the extension of `name`.
pub fn read_source_bytes(name: &str, bytes: &[u8]) -> Result<SourceTable> {
    match SourceFormat::from_name(name) {
        SourceFormat::Spreadsheet => read_spreadsheet_bytes(name, bytes),
        SourceFormat::Delimited => read_csv_bytes(name, bytes),
    }
}
