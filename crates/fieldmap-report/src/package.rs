//! In-memory zip bundle of the finalized outputs.

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::ReportArtifacts;

/// Name of the reviewer notes entry.
pub const REVIEW_NOTES_FILE: &str = "REVIEW_NOTES.txt";

/// Bundles the workbook, both HTML reports and optional reviewer notes.
///
/// The notes entry is only written when `notes` is non-empty.
pub fn package_artifacts(artifacts: &ReportArtifacts, notes: Option<&str>) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let mut entries: Vec<(String, &[u8])> = vec![
        (artifacts.xlsx_file_name(), artifacts.xlsx.as_slice()),
        (
            artifacts.html_by_source_file_name(),
            artifacts.html_by_source.as_bytes(),
        ),
        (
            artifacts.html_by_score_file_name(),
            artifacts.html_by_score.as_bytes(),
        ),
    ];
    if let Some(notes) = notes.filter(|n| !n.is_empty()) {
        entries.push((REVIEW_NOTES_FILE.to_string(), notes.as_bytes()));
    }

    for (name, bytes) in &entries {
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("start {name}"))?;
        zip.write_all(bytes).with_context(|| format!("write {name}"))?;
    }
    let cursor = zip.finish().context("finish bundle")?;
    let bundle = cursor.into_inner();
    info!(
        project = %artifacts.project_name,
        entries = entries.len(),
        bytes = bundle.len(),
        "packaged mapping bundle"
    );
    Ok(bundle)
}
