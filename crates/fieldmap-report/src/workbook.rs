//! Format-independent workbook model shared by the xlsx and HTML writers.

use fieldmap_model::{MappingRow, ScoreTier, TargetPathRecord, format_score};

/// Sheet names are limited to 31 characters by spreadsheet applications.
pub const SHEET_NAME_MAX: usize = 31;

pub const SHEET_BY_SOURCE: &str = "Suggested Mapping (By Source)";
pub const SHEET_BY_SCORE: &str = "Suggested Mapping (By Score)";
pub const SHEET_TARGETS: &str = "Target Dictionary";
pub const SHEET_PREVIEW: &str = "Source Preview (first 50)";

pub const MAPPING_HEADERS: [&str; 3] = ["SourceField", "TargetPath", "MatchScore"];
pub const TARGET_HEADERS: [&str; 6] = ["schema", "path", "name", "type", "minOccurs", "maxOccurs"];

const MIN_COLUMN_WIDTH: usize = 12;
const MAX_COLUMN_WIDTH: usize = 60;

/// Background colour of a score cell, as `#RRGGBB`.
pub fn tier_color(tier: ScoreTier) -> &'static str {
    match tier {
        ScoreTier::Low => "#FCE4E4",
        ScoreTier::Medium => "#FFF3CD",
        ScoreTier::High => "#D4EDDA",
    }
}

/// Width of a column in characters, derived from its header.
pub fn column_width(header: &str) -> usize {
    (header.chars().count() + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
}

/// Truncates a sheet name to [`SHEET_NAME_MAX`] characters.
pub fn sheet_name(name: &str) -> String {
    name.chars().take(SHEET_NAME_MAX).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
            width: column_width(header),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub value: String,
    /// Score tier fill, set on score cells only.
    pub fill: Option<ScoreTier>,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            fill: None,
        }
    }

    pub fn score(score: f64) -> Self {
        Self {
            value: format_score(score),
            fill: Some(ScoreTier::from_score(score)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new<S: AsRef<str>>(name: &str, headers: &[S]) -> Self {
        Self {
            name: sheet_name(name),
            columns: headers.iter().map(|h| Column::new(h.as_ref())).collect(),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

/// Mapping sheet with a tier-filled percentage score column.
pub fn mapping_sheet(name: &str, rows: &[MappingRow]) -> Sheet {
    let mut sheet = Sheet::new(name, &MAPPING_HEADERS);
    sheet.rows = rows
        .iter()
        .map(|row| {
            vec![
                Cell::text(row.source_field.as_str()),
                Cell::text(row.target_path.as_deref().unwrap_or_default()),
                Cell::score(row.match_score),
            ]
        })
        .collect();
    sheet
}

pub fn target_sheet(targets: &[TargetPathRecord]) -> Sheet {
    let mut sheet = Sheet::new(SHEET_TARGETS, &TARGET_HEADERS);
    sheet.rows = targets
        .iter()
        .map(|t| {
            [
                &t.schema_name,
                &t.path,
                &t.leaf_name,
                &t.declared_type,
                &t.min_occurs,
                &t.max_occurs,
            ]
            .into_iter()
            .map(|value| Cell::text(value.as_str()))
            .collect()
        })
        .collect();
    sheet
}

pub fn preview_sheet(headers: &[String], rows: &[Vec<String>]) -> Sheet {
    let mut sheet = Sheet::new(SHEET_PREVIEW, headers);
    sheet.rows = rows
        .iter()
        .map(|row| row.iter().map(|value| Cell::text(value.as_str())).collect())
        .collect();
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_are_clamped() {
        assert_eq!(column_width("name"), 12);
        assert_eq!(column_width("SourceField"), 13);
        assert_eq!(column_width(&"x".repeat(80)), 60);
    }

    #[test]
    fn sheet_names_are_truncated() {
        let name = sheet_name("A very long sheet name that keeps going");
        assert_eq!(name.chars().count(), 31);
        assert_eq!(sheet_name(SHEET_BY_SOURCE), SHEET_BY_SOURCE);
    }

    #[test]
    fn mapping_sheet_formats_scores_with_tiers() {
        let rows = vec![
            MappingRow::new("a", Some("x/A".to_string()), 0.875, ""),
            MappingRow::new("b", None, 0.65, ""),
            MappingRow::new("c", None, 0.1, ""),
        ];
        let sheet = mapping_sheet(SHEET_BY_SOURCE, &rows);
        assert_eq!(sheet.rows[0][2].value, "87.5%");
        assert_eq!(sheet.rows[0][2].fill, Some(ScoreTier::High));
        assert_eq!(sheet.rows[1][1].value, "");
        assert_eq!(sheet.rows[1][2].fill, Some(ScoreTier::Medium));
        assert_eq!(sheet.rows[2][2].fill, Some(ScoreTier::Low));
        assert!(sheet.rows[0][0].fill.is_none());
    }
}
