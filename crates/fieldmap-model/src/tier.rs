//! Score tiers shared by verification, refinement and report rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scores below this value are flagged as low confidence.
pub const LOW_CONFIDENCE_BELOW: f64 = 0.6;

/// Scores below this value are re-scored by the refinement pass.
pub const REFINE_BELOW: f64 = 0.8;

/// Minimum score of a row after a reviewer assigned it a target.
pub const OVERRIDE_SCORE_FLOOR: f64 = 0.9;

/// Confidence tier of a match score.
///
/// - `Low`: below 0.6, needs a reviewer decision
/// - `Medium`: 0.6 up to (not including) 0.8, should be checked
/// - `High`: 0.8 and above
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Low,
    Medium,
    High,
}

impl ScoreTier {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < LOW_CONFIDENCE_BELOW {
            Self::Low
        } else if score < REFINE_BELOW {
            Self::Medium
        } else {
            Self::High
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a score as a percentage with one decimal, e.g. `87.5%`.
pub fn format_score(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Clamps a score into `[0, 1]`, mapping NaN to 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_half_open() {
        assert_eq!(ScoreTier::from_score(0.0), ScoreTier::Low);
        assert_eq!(ScoreTier::from_score(0.5999), ScoreTier::Low);
        assert_eq!(ScoreTier::from_score(0.6), ScoreTier::Medium);
        assert_eq!(ScoreTier::from_score(0.7999), ScoreTier::Medium);
        assert_eq!(ScoreTier::from_score(0.8), ScoreTier::High);
        assert_eq!(ScoreTier::from_score(1.0), ScoreTier::High);
    }

    #[test]
    fn formats_percentages_with_one_decimal() {
        assert_eq!(format_score(0.875), "87.5%");
        assert_eq!(format_score(1.0), "100.0%");
        assert_eq!(format_score(0.0), "0.0%");
    }

    #[test]
    fn clamps_out_of_range_scores() {
        assert_eq!(clamp_score(1.7), 1.0);
        assert_eq!(clamp_score(-0.2), 0.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(0.42), 0.42);
    }
}
