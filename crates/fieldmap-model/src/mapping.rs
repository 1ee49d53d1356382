//! Mapping rows and reviewer edits.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::tier::{OVERRIDE_SCORE_FLOOR, ScoreTier, clamp_score};

/// Rationale recorded on rows produced by the local similarity fallback.
pub const LOCAL_SIMILARITY_RATIONALE: &str = "Local similarity";

/// Rationale prefix recorded when a reviewer overrode a row.
pub const USER_OVERRIDE_RATIONALE: &str = "User override";

/// One candidate mapping for a source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MappingRow {
    pub source_field: String,
    pub target_path: Option<String>,
    pub match_score: f64,
    #[serde(default)]
    pub rationale: String,
}

impl MappingRow {
    pub fn new(
        source_field: impl Into<String>,
        target_path: Option<String>,
        match_score: f64,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            source_field: source_field.into(),
            target_path,
            match_score: clamp_score(match_score),
            rationale: rationale.into(),
        }
    }

    /// A row with no target and a zero score.
    pub fn unmapped(source_field: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self::new(source_field, None, 0.0, rationale)
    }

    pub fn is_mapped(&self) -> bool {
        self.target_path.is_some()
    }

    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.match_score)
    }

    /// Applies a reviewer override in place.
    ///
    /// Assigning a target raises the score to at least the override floor and
    /// never lowers it; clearing the target keeps the score. The rationale is
    /// prefixed once with the override marker.
    pub fn apply_override(&mut self, target_path: Option<String>) {
        self.apply_override_with_floor(target_path, OVERRIDE_SCORE_FLOOR);
    }

    /// [`Self::apply_override`] with a custom score floor.
    pub fn apply_override_with_floor(&mut self, target_path: Option<String>, floor: f64) {
        match target_path {
            Some(path) => {
                self.target_path = Some(path);
                self.match_score = clamp_score(self.match_score.max(floor));
            }
            None => self.target_path = None,
        }
        if !self.rationale.starts_with(USER_OVERRIDE_RATIONALE) {
            self.rationale = if self.rationale.is_empty() {
                USER_OVERRIDE_RATIONALE.to_string()
            } else {
                format!("{USER_OVERRIDE_RATIONALE} | {}", self.rationale)
            };
        }
    }
}

/// A reviewer override for one source field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MappingEdit {
    pub source_field: String,
    #[serde(default)]
    pub target_path: Option<String>,
}

impl MappingEdit {
    pub fn assign(source_field: impl Into<String>, target_path: impl Into<String>) -> Self {
        Self {
            source_field: source_field.into(),
            target_path: Some(target_path.into()),
        }
    }

    pub fn skip(source_field: impl Into<String>) -> Self {
        Self {
            source_field: source_field.into(),
            target_path: None,
        }
    }

    /// The trimmed target, or `None` for a missing or blank one.
    pub fn normalized_target(&self) -> Option<String> {
        self.target_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(str::to_string)
    }
}

/// Returns the rows sorted by descending score, stable for equal scores.
pub fn rows_by_score(rows: &[MappingRow]) -> Vec<MappingRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_score() {
        let row = MappingRow::new("a", None, 3.0, "");
        assert_eq!(row.match_score, 1.0);
    }

    #[test]
    fn override_raises_score_to_floor() {
        let mut row = MappingRow::new("amount", Some("x/Amt".into()), 0.4, "Local similarity");
        row.apply_override(Some("invoice/Amount".into()));
        assert_eq!(row.target_path.as_deref(), Some("invoice/Amount"));
        assert_eq!(row.match_score, 0.9);
        assert_eq!(row.rationale, "User override | Local similarity");
    }

    #[test]
    fn override_keeps_higher_score() {
        let mut row = MappingRow::new("amount", Some("x/Amt".into()), 0.97, "");
        row.apply_override(Some("invoice/Amount".into()));
        assert_eq!(row.match_score, 0.97);
        assert_eq!(row.rationale, "User override");
    }

    #[test]
    fn clearing_target_keeps_score() {
        let mut row = MappingRow::new("amount", Some("x/Amt".into()), 0.4, "Local similarity");
        row.apply_override(None);
        assert!(row.target_path.is_none());
        assert_eq!(row.match_score, 0.4);
    }

    #[test]
    fn repeated_overrides_prefix_once() {
        let mut row = MappingRow::new("amount", None, 0.2, "Local similarity");
        row.apply_override(Some("a".into()));
        row.apply_override(Some("b".into()));
        assert_eq!(row.rationale, "User override | Local similarity");
    }

    #[test]
    fn blank_edit_target_is_none() {
        let edit = MappingEdit::assign("a", "   ");
        assert_eq!(edit.normalized_target(), None);
        let edit = MappingEdit::assign("a", " person/Name ");
        assert_eq!(edit.normalized_target().as_deref(), Some("person/Name"));
    }

    #[test]
    fn rows_by_score_is_stable() {
        let rows = vec![
            MappingRow::new("a", None, 0.5, ""),
            MappingRow::new("b", None, 0.9, ""),
            MappingRow::new("c", None, 0.5, ""),
            MappingRow::new("d", None, 0.9, ""),
        ];
        let order: Vec<String> = rows_by_score(&rows)
            .into_iter()
            .map(|r| r.source_field)
            .collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn edit_deserializes_from_review_payload() {
        let edit: MappingEdit =
            serde_json::from_str(r#"{"SourceField":"amount","TargetPath":""}"#).unwrap();
        assert_eq!(edit.source_field, "amount");
        assert_eq!(edit.normalized_target(), None);
        let edit: MappingEdit = serde_json::from_str(r#"{"SourceField":"amount"}"#).unwrap();
        assert!(edit.target_path.is_none());
    }
}
