use serde::{Deserialize, Serialize};

/// Quality summary of a mapping snapshot.
///
/// Always derived from the rows it describes; sessions recompute it after
/// every change instead of editing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Fraction of rows with a target, in `[0, 1]`.
    pub coverage: f64,
    /// Source fields whose score is below the low-confidence threshold.
    pub low_confidence_fields: Vec<String>,
    /// One message per repeated use of a target path.
    pub duplicate_target_issues: Vec<String>,
}

impl VerificationResult {
    pub fn issue_count(&self) -> usize {
        self.duplicate_target_issues.len()
    }

    pub fn is_clean(&self) -> bool {
        self.low_confidence_fields.is_empty() && self.duplicate_target_issues.is_empty()
    }
}
