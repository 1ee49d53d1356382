#![deny(unsafe_code)]

pub mod error;
pub mod ids;
pub mod mapping;
pub mod source;
pub mod target;
pub mod tier;
pub mod verification;

pub use error::{ModelError, Result};
pub use ids::SessionId;
pub use mapping::{
    LOCAL_SIMILARITY_RATIONALE, MappingEdit, MappingRow, USER_OVERRIDE_RATIONALE, rows_by_score,
};
pub use source::{PREVIEW_ROW_LIMIT, SAMPLE_LIMIT, SourceColumn, SourceTable, samples_by_column};
pub use target::{DEFAULT_OCCURS, PATH_SEPARATOR, TargetPathRecord, leaf_of, target_paths};
pub use tier::{
    LOW_CONFIDENCE_BELOW, OVERRIDE_SCORE_FLOOR, REFINE_BELOW, ScoreTier, clamp_score, format_score,
};
pub use verification::VerificationResult;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_row_serializes_with_review_field_names() {
        let row = MappingRow::new(
            "first_name",
            Some("person/FirstName".to_string()),
            0.93,
            LOCAL_SIMILARITY_RATIONALE,
        );
        let json = serde_json::to_value(&row).expect("serialize row");
        assert_eq!(json["SourceField"], "first_name");
        assert_eq!(json["TargetPath"], "person/FirstName");
        assert_eq!(json["Rationale"], "Local similarity");
        let round: MappingRow = serde_json::from_value(json).expect("deserialize row");
        assert_eq!(round, row);
    }

    #[test]
    fn verification_serializes_camel_case() {
        let result = VerificationResult {
            coverage: 0.5,
            low_confidence_fields: vec!["x".to_string()],
            duplicate_target_issues: vec![],
        };
        let json = serde_json::to_value(&result).expect("serialize verification");
        assert_eq!(json["lowConfidenceFields"][0], "x");
        assert!(json["duplicateTargetIssues"].as_array().unwrap().is_empty());
        assert!(!result.is_clean());
    }
}
