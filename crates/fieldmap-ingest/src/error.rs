//! Error types for source ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a source table.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to read the source file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV content could not be parsed.
    #[error("failed to parse CSV {name}: {source}")]
    CsvParse {
        name: String,
        #[source]
        source: csv::Error,
    },

    /// The workbook could not be opened or its first worksheet read.
    #[error("failed to read spreadsheet {name}: {source}")]
    Spreadsheet {
        name: String,
        #[source]
        source: calamine::Error,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
