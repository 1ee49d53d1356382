//! Property tests for similarity and verification.

use std::collections::HashSet;

use fieldmap_map::{dice_similarity, verify};
use fieldmap_model::MappingRow;
use proptest::prelude::*;

fn arb_rows() -> impl Strategy<Value = Vec<MappingRow>> {
    prop::collection::vec(
        (
            prop::option::of(prop::sample::select(vec!["p/A", "p/B", "p/C", "q/A"])),
            0.0f64..=1.0,
        ),
        0..24,
    )
    .prop_map(|cells| {
        cells
            .into_iter()
            .enumerate()
            .map(|(idx, (target, score))| {
                MappingRow::new(format!("col{idx}"), target.map(str::to_string), score, "")
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn identical_strings_score_one(a in "[a-zA-Z_]{1,16}") {
        prop_assert_eq!(dice_similarity(&a, &a.to_uppercase()), 1.0);
        prop_assert_eq!(dice_similarity(&a, ""), 0.0);
        prop_assert_eq!(dice_similarity("", &a), 0.0);
    }

    #[test]
    fn similarity_is_bounded_and_symmetric(a in "[a-z_]{0,12}", b in "[a-z_]{0,12}") {
        let ab = dice_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert_eq!(ab, dice_similarity(&b, &a));
    }

    #[test]
    fn coverage_is_mapped_over_total(rows in arb_rows()) {
        let result = verify(&rows);
        let mapped = rows.iter().filter(|row| row.is_mapped()).count();
        prop_assert!((0.0..=1.0).contains(&result.coverage));
        prop_assert_eq!(result.coverage, mapped as f64 / rows.len().max(1) as f64);
    }

    #[test]
    fn duplicates_exclude_first_occurrences(rows in arb_rows()) {
        let result = verify(&rows);
        let mapped = rows.iter().filter(|row| row.is_mapped()).count();
        let distinct: HashSet<_> = rows.iter().filter_map(|row| row.target_path.as_deref()).collect();
        prop_assert_eq!(result.duplicate_target_issues.len(), mapped - distinct.len());
    }

    #[test]
    fn low_confidence_preserves_row_order(rows in arb_rows()) {
        let expected: Vec<String> = rows
            .iter()
            .filter(|row| row.match_score < 0.6)
            .map(|row| row.source_field.clone())
            .collect();
        prop_assert_eq!(verify(&rows).low_confidence_fields, expected);
    }
}
