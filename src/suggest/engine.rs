//! Autocomplete suggestion generation.
//!
//! Suggestions come from two corpora, book titles and author names, queried
//! independently through the index store's similarity lookup. Each corpus is
//! ranked on its own, then the two lists are merged and ranked again by
//! similarity. The same text may appear once per corpus; no deduplication is
//! done across them.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{canonicalize_whitespace, normalize_term};
use crate::config::SuggestionConfig;
use crate::error::Result;
use crate::store::{IndexStore, SimilarityCandidate, SimilarityRequest};

/// Corpus a suggestion was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Title,
    Author,
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionKind::Title => f.pad("title"),
            SuggestionKind::Author => f.pad("author"),
        }
    }
}

/// One autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Similarity to the query, higher is better.
    pub score: f32,
}

impl Suggestion {
    pub fn new<S: Into<String>>(text: S, kind: SuggestionKind, score: f32) -> Self {
        Suggestion {
            text: text.into(),
            kind,
            score,
        }
    }
}

fn by_score_desc(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Produces ranked suggestions through an [`IndexStore`].
#[derive(Debug, Clone, Default)]
pub struct SuggestionEngine {
    config: SuggestionConfig,
}

impl SuggestionEngine {
    pub fn new(config: SuggestionConfig) -> Self {
        SuggestionEngine { config }
    }

    pub fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    /// Requested count, defaulted and capped.
    pub fn effective_limit(&self, limit: Option<usize>) -> usize {
        limit
            .unwrap_or(self.config.default_limit)
            .clamp(1, self.config.max_limit)
    }

    /// Suggestions for `query`, best first.
    ///
    /// Queries shorter than the configured minimum yield an empty list without
    /// contacting the store. Store failures propagate.
    pub async fn suggest(
        &self,
        store: &dyn IndexStore,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Suggestion>> {
        let trimmed = query.trim();
        if trimmed.chars().count() < self.config.min_query_chars {
            return Ok(Vec::new());
        }

        let limit = self.effective_limit(limit);
        let term = normalize_term(&canonicalize_whitespace(trimmed));
        let request = |corpus| SimilarityRequest {
            corpus,
            term: term.clone(),
            threshold: self.config.similarity_threshold,
            limit,
        };
        let title_request = request(SuggestionKind::Title);
        let author_request = request(SuggestionKind::Author);

        let (titles, authors) = tokio::try_join!(
            store.similarity(&title_request),
            store.similarity(&author_request)
        )?;

        debug!(
            term = %term,
            titles = titles.len(),
            authors = authors.len(),
            "similarity candidates"
        );

        let mut suggestions = Self::top(titles, SuggestionKind::Title, limit);
        suggestions.extend(Self::top(authors, SuggestionKind::Author, limit));
        suggestions.sort_by(|a, b| by_score_desc(a.score, b.score));
        suggestions.truncate(limit);

        Ok(suggestions)
    }

    /// Best `limit` candidates of one corpus.
    fn top(
        mut candidates: Vec<SimilarityCandidate>,
        kind: SuggestionKind,
        limit: usize,
    ) -> Vec<Suggestion> {
        candidates.sort_by(|a, b| by_score_desc(a.score, b.score));
        candidates
            .into_iter()
            .take(limit)
            .map(|c| Suggestion::new(c.text, kind, c.score))
            .collect()
    }
}
