//! Score normalization for one result set.
//!
//! The index store returns unscaled relevance values whose magnitude depends on
//! the engine and the query. The ranker rescales them against the largest
//! score in the set so every document carries a rank in `[0, 1]`, with the
//! best match at exactly `1.0`.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogDocument;

/// A candidate as returned by the index store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    pub document: CatalogDocument,
    /// Unscaled relevance, expected to be non-negative.
    pub raw_score: f32,
}

impl RawHit {
    pub fn new(document: CatalogDocument, raw_score: f32) -> Self {
        RawHit {
            document,
            raw_score,
        }
    }
}

/// A ranked document in a search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    #[serde(flatten)]
    pub document: CatalogDocument,
    pub raw_score: f32,
    /// `raw_score` relative to the best score of the result set.
    pub rank: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_description: Option<String>,
}

/// Normalizes raw scores into ranks.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceRanker;

impl RelevanceRanker {
    pub fn new() -> Self {
        RelevanceRanker
    }

    /// Divisor for the set: its largest score, or 1 when there is no
    /// positive score to scale by.
    pub fn max_score(hits: &[RawHit]) -> f32 {
        let max = hits
            .iter()
            .map(|hit| hit.raw_score)
            .filter(|score| score.is_finite())
            .fold(f32::NEG_INFINITY, f32::max);

        if max > 0.0 { max } else { 1.0 }
    }

    /// Attach a normalized rank to every hit.
    ///
    /// Input order is kept as is; the transform is monotonic, so a set sorted
    /// by raw score stays sorted by rank.
    pub fn rank(&self, hits: Vec<RawHit>) -> Vec<ScoredDocument> {
        if hits.is_empty() {
            return Vec::new();
        }

        let max_score = Self::max_score(&hits);

        hits.into_iter()
            .map(|hit| {
                let rank = Self::normalize(hit.raw_score, max_score);
                ScoredDocument {
                    document: hit.document,
                    raw_score: hit.raw_score,
                    rank,
                    highlighted_title: None,
                    highlighted_description: None,
                }
            })
            .collect()
    }

    fn normalize(raw_score: f32, max_score: f32) -> f32 {
        if !raw_score.is_finite() {
            // +inf is the best possible score; NaN and -inf carry no relevance.
            return if raw_score == f32::INFINITY { 1.0 } else { 0.0 };
        }
        (raw_score / max_score).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, score: f32) -> RawHit {
        RawHit::new(CatalogDocument::new(id, id), score)
    }

    fn ids(docs: &[ScoredDocument]) -> Vec<&str> {
        docs.iter().map(|d| d.document.id.as_str()).collect()
    }

    #[test]
    fn test_rank_relative_to_max() {
        let ranked = RelevanceRanker::new().rank(vec![hit("a", 10.0), hit("b", 5.0), hit("c", 0.0)]);

        assert_eq!(ids(&ranked), vec!["a", "b", "c"]);
        let ranks: Vec<f32> = ranked.iter().map(|d| d.rank).collect();
        assert_eq!(ranks, vec![1.0, 0.5, 0.0]);
        assert_eq!(ranked[1].raw_score, 5.0);
    }

    #[test]
    fn test_empty_set() {
        assert!(RelevanceRanker::new().rank(Vec::new()).is_empty());
        assert_eq!(RelevanceRanker::max_score(&[]), 1.0);
    }

    #[test]
    fn test_all_zero_scores_not_inflated() {
        let ranked = RelevanceRanker::new().rank(vec![hit("a", 0.0), hit("b", 0.0)]);
        assert!(ranked.iter().all(|d| d.rank == 0.0));
    }

    #[test]
    fn test_small_scores_scale_up() {
        let ranked = RelevanceRanker::new().rank(vec![hit("a", 0.08), hit("b", 0.02)]);
        assert_eq!(ranked[0].rank, 1.0);
        assert!((ranked[1].rank - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_scores_stay_in_bounds() {
        let ranked = RelevanceRanker::new().rank(vec![
            hit("a", 4.0),
            hit("b", f32::NAN),
            hit("c", -3.0),
        ]);

        assert_eq!(ranked[0].rank, 1.0);
        assert_eq!(ranked[1].rank, 0.0);
        assert_eq!(ranked[2].rank, 0.0);
    }

    #[test]
    fn test_order_preserved_and_bounded() {
        let scores = [9.5, 7.25, 7.25, 3.0, 0.5, 0.0];
        let hits = scores.iter().enumerate().map(|(i, s)| hit(&i.to_string(), *s)).collect();
        let ranked = RelevanceRanker::new().rank(hits);

        assert_eq!(ranked[0].rank, 1.0);
        for pair in ranked.windows(2) {
            assert!(pair[0].rank >= pair[1].rank);
        }
        assert!(ranked.iter().all(|d| (0.0..=1.0).contains(&d.rank)));
    }
}
