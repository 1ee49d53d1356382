//! Coverage, low-confidence and duplicate-target checks.

use std::collections::HashSet;

use fieldmap_model::{LOW_CONFIDENCE_BELOW, MappingRow, VerificationResult};

/// Prefix of every duplicate-target issue message.
pub const DUPLICATE_TARGET_ISSUE: &str = "Duplicate target";

/// Verifies rows with the default low-confidence threshold.
pub fn verify(rows: &[MappingRow]) -> VerificationResult {
    verify_with(rows, LOW_CONFIDENCE_BELOW)
}

/// Verifies rows, flagging scores below `low_confidence`.
///
/// Coverage is `mapped / max(1, total)`. Only the second and later uses of a
/// target path are reported, in row order.
pub fn verify_with(rows: &[MappingRow], low_confidence: f64) -> VerificationResult {
    let mapped = rows.iter().filter(|row| row.is_mapped()).count();
    let coverage = mapped as f64 / rows.len().max(1) as f64;

    let low_confidence_fields = rows
        .iter()
        .filter(|row| row.match_score < low_confidence)
        .map(|row| row.source_field.clone())
        .collect();

    let mut seen = HashSet::new();
    let duplicate_target_issues = rows
        .iter()
        .filter_map(|row| row.target_path.as_deref())
        .filter(|path| !seen.insert(*path))
        .map(|path| format!("{DUPLICATE_TARGET_ISSUE}: {path}"))
        .collect();

    VerificationResult {
        coverage,
        low_confidence_fields,
        duplicate_target_issues,
    }
}
