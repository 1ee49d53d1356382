//! Hybrid matching of source columns to target paths.
//!
//! A configured [`MatchRanker`] is asked first for the whole batch. Any
//! [`Degraded`] outcome, including a payload that leaves a requested column
//! out or names an unknown target, switches the whole batch to local leaf
//! similarity.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use fieldmap_model::{
    LOCAL_SIMILARITY_RATIONALE, MappingRow, SourceColumn, TargetPathRecord, samples_by_column,
    target_paths,
};

use crate::config::MatchThresholds;
use crate::ranker::{Degraded, MatchRanker, RankRequest, RankedMatch};
use crate::score::leaf_similarity;

/// Number of alternates shown to the reviewer per column.
pub const DEFAULT_ALTERNATES: usize = 3;

/// A ranked alternative target for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternate {
    pub path: String,
    pub score: f64,
}

/// Matching engine combining an optional ranker with local similarity.
#[derive(Clone, Default)]
pub struct MatchingEngine {
    ranker: Option<Arc<dyn MatchRanker>>,
    thresholds: MatchThresholds,
}

impl std::fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("ranker", &self.ranker.as_ref().map(|r| r.name().to_string()))
            .field("thresholds", &self.thresholds)
            .finish()
    }
}

impl MatchingEngine {
    /// Engine that only uses local similarity.
    pub fn local() -> Self {
        Self::default()
    }

    pub fn with_ranker(ranker: Arc<dyn MatchRanker>) -> Self {
        Self {
            ranker: Some(ranker),
            thresholds: MatchThresholds::default(),
        }
    }

    #[must_use]
    pub fn thresholds_from(mut self, thresholds: MatchThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> &MatchThresholds {
        &self.thresholds
    }

    pub fn has_ranker(&self) -> bool {
        self.ranker.is_some()
    }

    /// One matching pass: exactly one row per column, in column order.
    pub fn match_columns(
        &self,
        columns: &[SourceColumn],
        targets: &[TargetPathRecord],
    ) -> Vec<MappingRow> {
        if columns.is_empty() {
            return Vec::new();
        }
        if let Some(ranker) = &self.ranker {
            match rank_batch(ranker.as_ref(), columns, targets) {
                Ok(rows) => {
                    debug!(ranker = ranker.name(), columns = rows.len(), "ranked batch accepted");
                    return rows;
                }
                Err(reason) => {
                    warn!(
                        ranker = ranker.name(),
                        columns = columns.len(),
                        %reason,
                        "ranking degraded, falling back to local similarity"
                    );
                }
            }
        }
        columns
            .iter()
            .map(|column| local_match(&column.name, targets))
            .collect()
    }

    /// Two-pass suggestion: a full pass, then a refinement pass over the
    /// columns scoring below the refine threshold. Refined rows replace the
    /// first-pass rows for those columns only; column order is preserved.
    pub fn suggest(
        &self,
        columns: &[SourceColumn],
        targets: &[TargetPathRecord],
    ) -> Vec<MappingRow> {
        let first = self.match_columns(columns, targets);
        let hard: Vec<SourceColumn> = columns
            .iter()
            .zip(&first)
            .filter(|(_, row)| row.match_score < self.thresholds.refine_below)
            .map(|(column, _)| column.clone())
            .collect();
        if hard.is_empty() {
            info!(columns = first.len(), refined = 0, "suggested mappings");
            return first;
        }

        let refined = self.match_columns(&hard, targets);
        let mut by_source: HashMap<String, MappingRow> = refined
            .into_iter()
            .map(|row| (row.source_field.clone(), row))
            .collect();
        let rows: Vec<MappingRow> = first
            .into_iter()
            .map(|row| by_source.remove(&row.source_field).unwrap_or(row))
            .collect();
        info!(columns = rows.len(), refined = hard.len(), "suggested mappings");
        rows
    }

    /// Top `k` alternative targets for a column by leaf similarity.
    pub fn alternates(&self, column: &str, targets: &[TargetPathRecord], k: usize) -> Vec<Alternate> {
        alternates(column, targets, k)
    }
}

/// Best target by leaf-name similarity.
///
/// Only a strictly higher score replaces the current best, so ties keep the
/// first target in list order. A best score of 0 leaves the column unmapped.
pub fn local_match(column: &str, targets: &[TargetPathRecord]) -> MappingRow {
    let mut best: Option<&TargetPathRecord> = None;
    let mut best_score = 0.0;
    for target in targets {
        let score = leaf_similarity(column, target);
        if score > best_score {
            best = Some(target);
            best_score = score;
        }
    }
    debug!(
        column,
        target = best.map(|t| t.path.as_str()),
        score = best_score,
        "local match"
    );
    MappingRow::new(
        column,
        best.map(|t| t.path.clone()),
        best_score,
        LOCAL_SIMILARITY_RATIONALE,
    )
}

/// Top `k` targets by leaf similarity, descending and stable for ties.
pub fn alternates(column: &str, targets: &[TargetPathRecord], k: usize) -> Vec<Alternate> {
    let mut scored: Vec<Alternate> = targets
        .iter()
        .map(|target| Alternate {
            path: target.path.clone(),
            score: leaf_similarity(column, target),
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(k);
    scored
}

fn rank_batch(
    ranker: &dyn MatchRanker,
    columns: &[SourceColumn],
    targets: &[TargetPathRecord],
) -> Result<Vec<MappingRow>, Degraded> {
    let request = RankRequest {
        columns: columns.iter().map(|c| c.name.clone()).collect(),
        targets: target_paths(targets),
        samples: samples_by_column(columns),
    };
    let ranked = ranker.rank(&request)?;
    rows_from_ranked(&request.columns, targets, ranked)
}

/// Aligns ranked matches to the requested columns.
///
/// The first match per column wins; matches for columns that were not
/// requested are ignored. A missing column or an unknown target path makes
/// the whole payload unusable.
pub fn rows_from_ranked(
    columns: &[String],
    targets: &[TargetPathRecord],
    ranked: Vec<RankedMatch>,
) -> Result<Vec<MappingRow>, Degraded> {
    let known: HashSet<&str> = targets.iter().map(|t| t.path.as_str()).collect();
    let mut by_source: HashMap<String, RankedMatch> = HashMap::new();
    for candidate in ranked {
        by_source.entry(candidate.source.clone()).or_insert(candidate);
    }

    columns
        .iter()
        .map(|column| {
            let candidate = by_source
                .remove(column)
                .ok_or_else(|| Degraded::Incomplete(format!("no match for column {column}")))?;
            if let Some(target) = &candidate.target
                && !known.contains(target.as_str())
            {
                return Err(Degraded::Incomplete(format!(
                    "unknown target {target} for column {column}"
                )));
            }
            Ok(MappingRow::new(
                column.clone(),
                candidate.target,
                candidate.score,
                candidate.rationale,
            ))
        })
        .collect()
}
