//! Character-bigram similarity used by the local matcher.

use std::collections::HashMap;

use fieldmap_model::{TargetPathRecord, leaf_of};

/// Dice coefficient over character bigrams, case-insensitive.
///
/// Returns 0 when either input is empty and 1 when both are equal after
/// lower-casing. Bigrams are counted as multisets.
pub fn dice_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }

    let left = bigrams(&a);
    let right = bigrams(&b);
    let total: usize = left.values().sum::<usize>() + right.values().sum::<usize>();
    if total == 0 {
        return 0.0;
    }
    let shared: usize = left
        .iter()
        .map(|(gram, count)| (*count).min(right.get(gram).copied().unwrap_or(0)))
        .sum();
    (2 * shared) as f64 / total as f64
}

fn bigrams(text: &str) -> HashMap<(char, char), usize> {
    let chars: Vec<char> = text.chars().collect();
    let mut counts = HashMap::new();
    for pair in chars.windows(2) {
        *counts.entry((pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}

/// Similarity between a source column and the leaf name of a target path.
pub fn leaf_similarity(column: &str, target: &TargetPathRecord) -> f64 {
    dice_similarity(column, leaf_of(&target.path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_score_one() {
        assert_eq!(dice_similarity("amount", "amount"), 1.0);
        assert_eq!(dice_similarity("Amount", "aMOUNT"), 1.0);
        assert_eq!(dice_similarity("x", "X"), 1.0);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(dice_similarity("", "amount"), 0.0);
        assert_eq!(dice_similarity("amount", ""), 0.0);
        assert_eq!(dice_similarity("", ""), 0.0);
    }

    #[test]
    fn single_characters_without_bigrams_score_zero() {
        assert_eq!(dice_similarity("a", "b"), 0.0);
        assert_eq!(dice_similarity("a", "ab"), 0.0);
    }

    #[test]
    fn counts_bigrams_as_multisets() {
        // "aaa" = {aa, aa}, "aa" = {aa}: 2 * 1 / 3
        let score = dice_similarity("aaa", "aa");
        assert!((score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn first_name_matches_first_name_leaf() {
        let score = dice_similarity("first_name", "FirstName");
        // fi ir rs st t_ _n na am me vs fi ir rs st tn na am me: 7 shared of 9 + 8
        assert!((score - 14.0 / 17.0).abs() < 1e-12);
    }
}
