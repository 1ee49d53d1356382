//! Report generation for reviewed field mappings.
//!
//! - **Workbook**: four sheets (mappings by source and by score, target
//!   dictionary, source preview) written as `.xlsx`
//! - **HTML**: standalone documents for both mapping sheets
//! - **Bundle**: an in-memory zip of the above plus reviewer notes

#![deny(unsafe_code)]

pub mod html;
pub mod package;
pub mod workbook;
pub mod xlsx;

use anyhow::{Context, Result};
use tracing::debug;

use fieldmap_model::{MappingRow, TargetPathRecord};

pub use crate::html::render_html;
pub use crate::package::{REVIEW_NOTES_FILE, package_artifacts};
pub use crate::workbook::{
    Cell, Column, SHEET_BY_SCORE, SHEET_BY_SOURCE, SHEET_PREVIEW, SHEET_TARGETS, Sheet, Workbook,
};
pub use crate::xlsx::write_xlsx;

/// Snapshot handed over by a finalizing session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportInput {
    pub project_name: String,
    pub by_source: Vec<MappingRow>,
    /// `by_source` sorted by descending score, stable for ties.
    pub by_score: Vec<MappingRow>,
    pub targets: Vec<TargetPathRecord>,
    pub preview_headers: Vec<String>,
    pub preview_rows: Vec<Vec<String>>,
}

/// Rendered outputs of one finalize call.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportArtifacts {
    pub project_name: String,
    pub workbook: Workbook,
    pub xlsx: Vec<u8>,
    pub html_by_source: String,
    pub html_by_score: String,
}

impl ReportArtifacts {
    pub fn xlsx_file_name(&self) -> String {
        format!("{}.xlsx", self.project_name)
    }

    pub fn html_by_source_file_name(&self) -> String {
        format!("{} - {SHEET_BY_SOURCE}.html", self.project_name)
    }

    pub fn html_by_score_file_name(&self) -> String {
        format!("{} - {SHEET_BY_SCORE}.html", self.project_name)
    }
}

/// Builds the workbook model for a snapshot.
pub fn build_workbook(input: &ReportInput) -> Workbook {
    Workbook {
        sheets: vec![
            workbook::mapping_sheet(SHEET_BY_SOURCE, &input.by_source),
            workbook::mapping_sheet(SHEET_BY_SCORE, &input.by_score),
            workbook::target_sheet(&input.targets),
            workbook::preview_sheet(&input.preview_headers, &input.preview_rows),
        ],
    }
}

/// Renders the workbook and both HTML reports.
pub fn build_reports(input: &ReportInput) -> Result<ReportArtifacts> {
    let workbook = build_workbook(input);
    let xlsx = write_xlsx(&workbook).context("write workbook")?;
    let html_by_source = render_html(SHEET_BY_SOURCE, &workbook.sheets[0])
        .context("render by-source report")?;
    let html_by_score =
        render_html(SHEET_BY_SCORE, &workbook.sheets[1]).context("render by-score report")?;
    debug!(
        project = %input.project_name,
        rows = input.by_source.len(),
        xlsx_bytes = xlsx.len(),
        "built reports"
    );
    Ok(ReportArtifacts {
        project_name: input.project_name.clone(),
        workbook,
        xlsx,
        html_by_source,
        html_by_score,
    })
}
