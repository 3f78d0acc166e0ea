//! Contract of the external ranked-match engine.
//!
//! The search core never matches text itself. It hands a [`CompiledQuery`]
//! to an [`IndexStore`] and receives candidates sorted by descending raw
//! score. How the store matches and scores is its own business; the core only
//! relies on the ordering and on scores being non-negative.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::CompiledQuery;
use crate::ranking::RawHit;
use crate::suggest::SuggestionKind;

/// Parameters of a fuzzy lookup against one suggestion corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRequest {
    /// Which corpus (titles or author names) to search.
    pub corpus: SuggestionKind,
    /// Folded, lowercased query text.
    pub term: String,
    /// Minimum similarity for a fuzzy candidate. Candidates containing `term`
    /// as a substring qualify regardless.
    pub threshold: f32,
    /// Maximum number of candidates wanted.
    pub limit: usize,
}

/// A corpus value and how similar it is to the requested term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityCandidate {
    pub text: String,
    pub score: f32,
}

impl SimilarityCandidate {
    pub fn new<S: Into<String>>(text: S, score: f32) -> Self {
        SimilarityCandidate {
            text: text.into(),
            score,
        }
    }
}

/// A ranked-match engine holding the catalog.
///
/// Implementations must be `Send + Sync`; one store handle is shared by every
/// concurrent request.
#[async_trait]
pub trait IndexStore: Send + Sync + Debug {
    /// Documents matching every term of `query`, by descending raw score,
    /// skipping `offset` and returning at most `limit`.
    async fn match_documents(
        &self,
        query: &CompiledQuery,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<RawHit>>;

    /// Number of documents matching `query`, regardless of paging.
    async fn count(&self, query: &CompiledQuery) -> Result<u64>;

    /// Corpus values that contain or resemble the requested term.
    async fn similarity(&self, request: &SimilarityRequest) -> Result<Vec<SimilarityCandidate>>;

    /// Get the name of this store (for logging).
    fn name(&self) -> &str {
        "index-store"
    }
}
