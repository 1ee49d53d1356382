//! Source adapter: CSV and spreadsheet bytes to [`fieldmap_model::SourceTable`].

pub mod csv_table;
pub mod error;
pub mod source;
pub mod spreadsheet;

pub use csv_table::{DELIMITER_CANDIDATES, read_csv_bytes, sniff_delimiter};
pub use error::{IngestError, Result};
pub use source::{SPREADSHEET_EXTENSIONS, SourceFormat, read_source_bytes, read_source_file};
pub use spreadsheet::read_spreadsheet_bytes;
