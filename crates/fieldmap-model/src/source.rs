//! Source table types handed over by the source adapter.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Maximum number of sample values kept per source column.
pub const SAMPLE_LIMIT: usize = 3;

/// Number of source rows carried into the report preview sheet.
pub const PREVIEW_ROW_LIMIT: usize = 50;

/// A source column together with its first non-empty sample values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColumn {
    pub name: String,
    pub samples: Vec<String>,
}

/// Row-major tabular data with normalized cells.
///
/// Every row has exactly one cell per column and missing cells are empty
/// strings. Column names are unique; a repeated header keeps only its first
/// column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SourceTable {
    /// Builds a table from raw headers and records.
    ///
    /// Short records are padded with empty strings, long records truncated,
    /// and columns whose header repeats an earlier one are dropped.
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let mut seen = HashSet::new();
        let mut keep = Vec::with_capacity(headers.len());
        let mut columns = Vec::with_capacity(headers.len());
        for (idx, header) in headers.into_iter().enumerate() {
            if seen.insert(header.clone()) {
                keep.push(idx);
                columns.push(header);
            }
        }
        let rows = records
            .into_iter()
            .map(|record| {
                keep.iter()
                    .map(|&idx| record.get(idx).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Extracts each column with up to `limit` non-empty samples in row order.
    pub fn source_columns(&self, limit: usize) -> Vec<SourceColumn> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let samples = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .filter(|value| !value.is_empty())
                    .take(limit)
                    .cloned()
                    .collect();
                SourceColumn {
                    name: name.clone(),
                    samples,
                }
            })
            .collect()
    }

    /// The first `limit` rows.
    pub fn preview(&self, limit: usize) -> Vec<Vec<String>> {
        self.rows.iter().take(limit).cloned().collect()
    }
}

/// Samples keyed by column name, the shape the ranking collaborator expects.
pub fn samples_by_column(columns: &[SourceColumn]) -> BTreeMap<String, Vec<String>> {
    columns
        .iter()
        .map(|c| (c.name.clone(), c.samples.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn pads_short_records_and_truncates_long_ones() {
        let table = SourceTable::new(
            strings(&["a", "b"]),
            vec![strings(&["1"]), strings(&["1", "2", "3"])],
        );
        assert_eq!(table.rows()[0], strings(&["1", ""]));
        assert_eq!(table.rows()[1], strings(&["1", "2"]));
    }

    #[test]
    fn duplicate_headers_keep_first_column() {
        let table = SourceTable::new(
            strings(&["id", "name", "id"]),
            vec![strings(&["1", "Ann", "99"])],
        );
        assert_eq!(table.columns(), strings(&["id", "name"]).as_slice());
        assert_eq!(table.rows()[0], strings(&["1", "Ann"]));
    }

    #[test]
    fn samples_skip_empty_values_and_respect_limit() {
        let table = SourceTable::new(
            strings(&["city"]),
            vec![
                strings(&[""]),
                strings(&["Oslo"]),
                strings(&["Rome"]),
                strings(&[""]),
                strings(&["Lima"]),
                strings(&["Kyiv"]),
            ],
        );
        let columns = table.source_columns(SAMPLE_LIMIT);
        assert_eq!(columns[0].samples, strings(&["Oslo", "Rome", "Lima"]));
    }

    #[test]
    fn preview_takes_leading_rows() {
        let records = (0..80).map(|i| vec![i.to_string()]).collect();
        let table = SourceTable::new(strings(&["n"]), records);
        let preview = table.preview(PREVIEW_ROW_LIMIT);
        assert_eq!(preview.len(), 50);
        assert_eq!(preview[49][0], "49");
    }
}
