//! Review session life cycle: preview, reviewer edits, finalize.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use fieldmap_model::{
    MappingEdit, MappingRow, PREVIEW_ROW_LIMIT, SAMPLE_LIMIT, SessionId, SourceColumn,
    SourceTable, TargetPathRecord, VerificationResult, rows_by_score, samples_by_column,
};
use fieldmap_report::{ReportArtifacts, ReportInput, build_reports};

use crate::config::MatchThresholds;
use crate::engine::{Alternate, DEFAULT_ALTERNATES, MatchingEngine, alternates};
use crate::error::{MapError, Result};
use crate::verify::verify_with;

/// Project name used when the reviewer did not provide one.
pub const DEFAULT_PROJECT_NAME: &str = "mapping-output";

/// Where a session is in its review life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Freshly matched, no reviewer edits yet.
    Preview,
    /// At least one edit batch was applied.
    Edited,
    /// Reports were produced; no further edits are accepted.
    Finalized,
}

/// Result of one edit batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub applied: usize,
    /// Source fields of edits that matched no row, in batch order.
    pub ignored: Vec<String>,
}

/// Per-review mapping state.
#[derive(Debug, Clone)]
pub struct MappingSession {
    id: SessionId,
    project_name: String,
    columns: Vec<SourceColumn>,
    preview_headers: Vec<String>,
    preview_rows: Vec<Vec<String>>,
    targets: Vec<TargetPathRecord>,
    rows: Vec<MappingRow>,
    verification: VerificationResult,
    created_at: DateTime<Utc>,
    state: SessionState,
    thresholds: MatchThresholds,
}

impl MappingSession {
    /// Runs the two-pass suggestion over `table` and returns a session in
    /// the `Preview` state with its verification already computed.
    pub fn preview(
        project_name: &str,
        table: &SourceTable,
        targets: Vec<TargetPathRecord>,
        engine: &MatchingEngine,
    ) -> Self {
        let project_name = match project_name.trim() {
            "" => DEFAULT_PROJECT_NAME.to_string(),
            name => name.to_string(),
        };
        let columns = table.source_columns(SAMPLE_LIMIT);
        let thresholds = *engine.thresholds();
        let rows = engine.suggest(&columns, &targets);
        let verification = verify_with(&rows, thresholds.low_confidence);
        let session = Self {
            id: SessionId::new(),
            project_name,
            columns,
            preview_headers: table.columns().to_vec(),
            preview_rows: table.preview(PREVIEW_ROW_LIMIT),
            targets,
            rows,
            verification,
            created_at: Utc::now(),
            state: SessionState::Preview,
            thresholds,
        };
        info!(
            session = %session.id,
            project = %session.project_name,
            columns = session.rows.len(),
            targets = session.targets.len(),
            coverage = session.verification.coverage,
            "session previewed"
        );
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn columns(&self) -> &[SourceColumn] {
        &self.columns
    }

    pub fn targets(&self) -> &[TargetPathRecord] {
        &self.targets
    }

    /// Current rows in source column order.
    pub fn rows(&self) -> &[MappingRow] {
        &self.rows
    }

    pub fn row(&self, source_field: &str) -> Option<&MappingRow> {
        self.rows.iter().find(|row| row.source_field == source_field)
    }

    /// Verification of the current rows.
    pub fn verification(&self) -> &VerificationResult {
        &self.verification
    }

    /// Applies a batch of reviewer overrides and re-verifies.
    ///
    /// Edits naming an unknown source field are skipped and reported in the
    /// outcome. Targets outside the flattened target list are accepted.
    pub fn apply_edits(&mut self, edits: &[MappingEdit]) -> Result<EditOutcome> {
        if self.state == SessionState::Finalized {
            return Err(MapError::SessionFinalized(self.id));
        }

        let known: HashSet<&str> = self.targets.iter().map(|t| t.path.as_str()).collect();
        let mut outcome = EditOutcome::default();
        for edit in edits {
            let Some(row) = self
                .rows
                .iter_mut()
                .find(|row| row.source_field == edit.source_field)
            else {
                outcome.ignored.push(edit.source_field.clone());
                continue;
            };
            let target = edit.normalized_target();
            if let Some(path) = &target
                && !known.contains(path.as_str())
            {
                debug!(field = %edit.source_field, target = %path, "freeform target accepted");
            }
            row.apply_override_with_floor(target, self.thresholds.override_floor);
            outcome.applied += 1;
        }

        self.verification = verify_with(&self.rows, self.thresholds.low_confidence);
        self.state = SessionState::Edited;
        info!(
            session = %self.id,
            applied = outcome.applied,
            ignored = outcome.ignored.len(),
            coverage = self.verification.coverage,
            "edits applied"
        );
        Ok(outcome)
    }

    /// Snapshot handed to the report builder.
    pub fn report_input(&self) -> ReportInput {
        ReportInput {
            project_name: self.project_name.clone(),
            by_source: self.rows.clone(),
            by_score: rows_by_score(&self.rows),
            targets: self.targets.clone(),
            preview_headers: self.preview_headers.clone(),
            preview_rows: self.preview_rows.clone(),
        }
    }

    /// Builds the reports and moves the session to `Finalized`.
    ///
    /// Finalizing again reproduces the same artifacts.
    pub fn finalize(&mut self) -> Result<ReportArtifacts> {
        let artifacts = build_reports(&self.report_input())?;
        self.state = SessionState::Finalized;
        info!(
            session = %self.id,
            project = %self.project_name,
            coverage = self.verification.coverage,
            issues = self.verification.issue_count(),
            "session finalized"
        );
        Ok(artifacts)
    }

    /// Reviewer-facing view of the session.
    pub fn preview_payload(&self) -> PreviewPayload {
        let mappings = self
            .rows
            .iter()
            .map(|row| PreviewMapping {
                row: row.clone(),
                alternates: alternates(&row.source_field, &self.targets, DEFAULT_ALTERNATES),
            })
            .collect();
        PreviewPayload {
            job_id: self.id,
            project_name: self.project_name.clone(),
            created_at: self.created_at,
            state: self.state,
            mappings,
            issues: self.verification.clone(),
            targets: self.targets.clone(),
            samples: samples_by_column(&self.columns),
        }
    }
}

/// JSON body shown to the reviewer after a preview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPayload {
    pub job_id: SessionId,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub state: SessionState,
    pub mappings: Vec<PreviewMapping>,
    pub issues: VerificationResult,
    pub targets: Vec<TargetPathRecord>,
    pub samples: BTreeMap<String, Vec<String>>,
}

/// A mapping row with its ranked alternates.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewMapping {
    #[serde(flatten)]
    pub row: MappingRow,
    #[serde(rename = "Alternates")]
    pub alternates: Vec<Alternate>,
}
