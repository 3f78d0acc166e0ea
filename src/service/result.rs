//! Search responses.

use serde::{Deserialize, Serialize};

use crate::ranking::ScoredDocument;
use crate::suggest::Suggestion;

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching documents, best first.
    pub documents: Vec<ScoredDocument>,
    /// Always empty for searches; suggestions are requested separately.
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    /// Number of matches across all pages.
    pub total: u64,
}

impl SearchResult {
    /// A result with no matches.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of documents on this page.
    pub fn len(&self) -> usize {
        self.documents.len()
    }
}
