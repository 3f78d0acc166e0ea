//! In-memory index store.
//!
//! Used by the CLI and by tests. Documents are indexed by their folded,
//! lowercased words; a document matches when every query term matches at
//! least one of its words. The raw score weights title hits over author hits
//! over description hits.

use std::cmp::Ordering;

use ahash::{AHashMap, AHashSet};
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::analysis::{normalize_term, word_spans};
use crate::catalog::CatalogDocument;
use crate::error::Result;
use crate::query::{CompiledQuery, QueryTerm};
use crate::ranking::RawHit;
use crate::store::index_store::{IndexStore, SimilarityCandidate, SimilarityRequest};
use crate::suggest::SuggestionKind;
use crate::util::trigram;

const TITLE_WEIGHT: f32 = 3.0;
const AUTHOR_WEIGHT: f32 = 2.0;
const DESCRIPTION_WEIGHT: f32 = 1.0;

/// A document together with its normalized words per field.
#[derive(Debug, Clone)]
struct IndexedDocument {
    document: CatalogDocument,
    title_terms: Vec<String>,
    author_terms: Vec<String>,
    description_terms: Vec<String>,
}

impl IndexedDocument {
    fn new(document: CatalogDocument) -> Self {
        let title_terms = terms_of(&document.title);
        let author_terms = document.authors.iter().flat_map(|a| terms_of(a)).collect();
        let description_terms = document
            .description
            .as_deref()
            .map(terms_of)
            .unwrap_or_default();

        IndexedDocument {
            document,
            title_terms,
            author_terms,
            description_terms,
        }
    }

    /// Weighted hit count for one term; zero means the term does not match.
    fn term_score(&self, term: &QueryTerm) -> f32 {
        let hits = |terms: &[String]| terms.iter().filter(|t| term.matches(t)).count() as f32;

        hits(&self.title_terms) * TITLE_WEIGHT
            + hits(&self.author_terms) * AUTHOR_WEIGHT
            + hits(&self.description_terms) * DESCRIPTION_WEIGHT
    }

    /// Conjunctive score, `None` when some term is missing.
    ///
    /// Terms are matched by word unit, the way the indexed text is split, so
    /// `spider-man` needs both `spider` and `man`. Units that are pure
    /// punctuation are dropped.
    fn score(&self, query: &CompiledQuery) -> Option<f32> {
        let units: Vec<QueryTerm> = query.terms().iter().flat_map(QueryTerm::word_units).collect();
        if units.is_empty() {
            return None;
        }

        let mut total = 0.0;
        for unit in &units {
            let score = self.term_score(unit);
            if score == 0.0 {
                return None;
            }
            total += score;
        }
        Some(total)
    }
}

fn terms_of(text: &str) -> Vec<String> {
    word_spans(text)
        .into_iter()
        .map(|span| normalize_term(span.as_str(text)))
        .collect()
}

/// An index store holding the whole catalog in memory.
#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    documents: RwLock<AHashMap<String, IndexedDocument>>,
}

impl MemoryIndexStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `documents`.
    pub fn with_documents<I: IntoIterator<Item = CatalogDocument>>(documents: I) -> Self {
        let store = Self::new();
        for document in documents {
            store.upsert(document);
        }
        store
    }

    /// Insert or replace a document, returning the previous version.
    pub fn upsert(&self, document: CatalogDocument) -> Option<CatalogDocument> {
        let id = document.id.clone();
        self.documents
            .write()
            .insert(id, IndexedDocument::new(document))
            .map(|previous| previous.document)
    }

    /// Remove a document.
    pub fn remove(&self, id: &str) -> Option<CatalogDocument> {
        self.documents.write().remove(id).map(|d| d.document)
    }

    /// Get a document by id.
    pub fn get(&self, id: &str) -> Option<CatalogDocument> {
        self.documents.read().get(id).map(|d| d.document.clone())
    }

    /// Number of documents stored.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every matching document, best first; ties ordered by id.
    fn ranked(&self, query: &CompiledQuery) -> Vec<RawHit> {
        let documents = self.documents.read();
        let mut hits: Vec<RawHit> = documents
            .values()
            .filter_map(|doc| {
                doc.score(query)
                    .map(|score| RawHit::new(doc.document.clone(), score))
            })
            .collect();

        hits.sort_by(|a, b| {
            b.raw_score
                .partial_cmp(&a.raw_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.document.id.cmp(&b.document.id))
        });
        hits
    }

    /// Distinct values of one corpus.
    fn corpus(&self, kind: SuggestionKind) -> Vec<String> {
        let documents = self.documents.read();
        let mut seen = AHashSet::new();
        let mut values = Vec::new();

        for doc in documents.values() {
            let fields: Vec<&String> = match kind {
                SuggestionKind::Title => vec![&doc.document.title],
                SuggestionKind::Author => doc.document.authors.iter().collect(),
            };
            for value in fields {
                if seen.insert(value.clone()) {
                    values.push(value.clone());
                }
            }
        }
        values
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn match_documents(
        &self,
        query: &CompiledQuery,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<RawHit>> {
        Ok(self
            .ranked(query)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn count(&self, query: &CompiledQuery) -> Result<u64> {
        let documents = self.documents.read();
        Ok(documents
            .values()
            .filter(|doc| doc.score(query).is_some())
            .count() as u64)
    }

    async fn similarity(&self, request: &SimilarityRequest) -> Result<Vec<SimilarityCandidate>> {
        let mut candidates: Vec<SimilarityCandidate> = self
            .corpus(request.corpus)
            .into_iter()
            .filter_map(|value| {
                let folded = normalize_term(&value);
                let score = trigram::similarity(&folded, &request.term);
                if folded.contains(&request.term) || score >= request.threshold {
                    Some(SimilarityCandidate::new(value, score))
                } else {
                    None
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.text.cmp(&b.text))
        });
        candidates.truncate(request.limit);
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryCompiler;

    fn catalog() -> MemoryIndexStore {
        MemoryIndexStore::with_documents(vec![
            CatalogDocument::new("1", "Harry Potter and the Philosopher's Stone")
                .with_author("J. K. Rowling")
                .with_description("A boy learns he is a wizard."),
            CatalogDocument::new("2", "Harry Potter and the Chamber of Secrets")
                .with_author("J. K. Rowling"),
            CatalogDocument::new("3", "The Casual Vacancy")
                .with_author("J. K. Rowling")
                .with_description("Not a Harry Potter book."),
            CatalogDocument::new("4", "Lalka").with_author("Bolesław Prus"),
            CatalogDocument::new("5", "The Amazing Spider-Man").with_author("Stan Lee"),
        ])
    }

    #[tokio::test]
    async fn test_match_is_conjunctive_and_ranked() -> Result<()> {
        let store = catalog();
        let query = QueryCompiler::new().compile("harry pot");

        let hits = store.match_documents(&query, 10, 0).await?;
        let ids: Vec<&str> = hits.iter().map(|h| h.document.id.as_str()).collect();

        // titles outweigh descriptions; equal scores fall back to id order
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(hits[0].raw_score > hits[2].raw_score);
        assert_eq!(store.count(&query).await?, 3);

        let query = QueryCompiler::new().compile("harry chamber");
        assert_eq!(store.count(&query).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_match_paging() -> Result<()> {
        let store = catalog();
        let query = QueryCompiler::new().compile("rowling");

        let page = store.match_documents(&query, 2, 2).await?;
        assert_eq!(page.len(), 1);
        assert_eq!(store.count(&query).await?, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_match_folds_diacritics() -> Result<()> {
        let store = catalog();
        let query = QueryCompiler::new().compile("boleslaw");

        let hits = store.match_documents(&query, 10, 0).await?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document.title, "Lalka");

        Ok(())
    }

    #[tokio::test]
    async fn test_punctuated_terms_match_by_word() -> Result<()> {
        let store = catalog();
        let compiler = QueryCompiler::new();

        assert_eq!(store.count(&compiler.compile("Harry, potter.")).await?, 3);
        assert_eq!(store.count(&compiler.compile("rowling?")).await?, 3);

        let hits = store.match_documents(&compiler.compile("spider-man"), 10, 0).await?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document.id, "5");

        // every unit of a hyphenated term must match
        assert_eq!(store.count(&compiler.compile("spider-woman")).await?, 0);
        // exact mode still compares whole words
        let exact = QueryCompiler::new().with_prefix_match(false);
        assert_eq!(store.count(&exact.compile("Harry,")).await?, 3);
        assert_eq!(store.count(&exact.compile("harr,")).await?, 0);
        // punctuation alone adds no constraint
        assert_eq!(store.count(&compiler.compile("lalka -")).await?, 1);
        assert_eq!(store.count(&compiler.compile("- ,")).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_query_matches_nothing() -> Result<()> {
        let store = catalog();
        assert!(store
            .match_documents(&CompiledQuery::Empty, 10, 0)
            .await?
            .is_empty());
        assert_eq!(store.count(&CompiledQuery::Empty).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_similarity() -> Result<()> {
        let store = catalog();
        let request = SimilarityRequest {
            corpus: SuggestionKind::Author,
            term: "rowlin".to_string(),
            threshold: 0.3,
            limit: 5,
        };

        let candidates = store.similarity(&request).await?;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "J. K. Rowling");

        let request = SimilarityRequest {
            corpus: SuggestionKind::Title,
            term: "harry potter".to_string(),
            threshold: 0.3,
            limit: 5,
        };
        let candidates = store.similarity(&request).await?;
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].score >= candidates[1].score);

        Ok(())
    }

    #[test]
    fn test_upsert_and_remove() {
        let store = catalog();
        assert_eq!(store.len(), 5);

        let previous = store.upsert(CatalogDocument::new("4", "Lalka (wydanie II)"));
        assert_eq!(previous.map(|d| d.title), Some("Lalka".to_string()));
        assert_eq!(store.get("4").map(|d| d.title), Some("Lalka (wydanie II)".to_string()));

        assert!(store.remove("4").is_some());
        assert!(store.remove("4").is_none());
        assert_eq!(store.len(), 4);
    }
}
