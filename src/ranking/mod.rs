//! Relevance ranking of index store candidates.

pub mod ranker;

pub use self::ranker::{RawHit, RelevanceRanker, ScoredDocument};
