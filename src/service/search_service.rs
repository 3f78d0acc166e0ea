//! Search, autocomplete and cache invalidation over the collaborators.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{CacheStore, SearchCache};
use crate::catalog::CatalogEvent;
use crate::config::FolioConfig;
use crate::error::Result;
use crate::highlight::Highlighter;
use crate::query::{MarkerPair, QueryCompiler, SearchQuery, SearchRequest};
use crate::ranking::RelevanceRanker;
use crate::service::result::SearchResult;
use crate::store::IndexStore;
use crate::suggest::{Suggestion, SuggestionEngine};

/// Entry point of the search core.
///
/// A search runs compile, cache lookup, match and count, rank, and optional
/// highlighting, then caches the response. Index store failures propagate to
/// the caller and are never cached; cache failures are logged and ignored.
#[derive(Debug, Clone)]
pub struct SearchService {
    index: Arc<dyn IndexStore>,
    cache: SearchCache,
    compiler: QueryCompiler,
    ranker: RelevanceRanker,
    highlighter: Highlighter,
    suggestions: SuggestionEngine,
    /// Markers for requests that name none.
    markers: MarkerPair,
    config: FolioConfig,
}

impl SearchService {
    /// Create a service over the given collaborators.
    pub fn new(
        index: Arc<dyn IndexStore>,
        cache_store: Arc<dyn CacheStore>,
        config: FolioConfig,
    ) -> Self {
        SearchService {
            index,
            cache: SearchCache::new(cache_store, config.cache.clone()),
            compiler: QueryCompiler::new(),
            ranker: RelevanceRanker::new(),
            highlighter: Highlighter::new(config.highlight.clone()),
            suggestions: SuggestionEngine::new(config.suggestion.clone()),
            markers: config.highlight.marker_pair(),
            config,
        }
    }

    /// Use a different query compiler, e.g. one without prefix matching.
    pub fn with_compiler(mut self, compiler: QueryCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn index(&self) -> &Arc<dyn IndexStore> {
        &self.index
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    pub fn compiler(&self) -> &QueryCompiler {
        &self.compiler
    }

    /// Compile a request with this service's settings.
    ///
    /// Requests without markers get the configured pair, and the cache key
    /// is built from that resolved pair.
    pub fn compile(&self, request: &SearchRequest) -> SearchQuery {
        SearchQuery::compile(
            request,
            &self.compiler,
            self.config.pagination.max_limit,
            &self.markers,
        )
    }

    /// Run a search.
    ///
    /// A query with nothing searchable left after normalization yields an
    /// empty result without touching either store.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let query = self.compile(request);
        if query.is_empty() {
            debug!(query = %query.raw, "query compiled to nothing");
            return Ok(SearchResult::empty());
        }

        let key = self.cache.key(&query);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let pagination = query.pagination;
        debug!(
            expression = %query.compiled,
            page = pagination.page,
            limit = pagination.limit,
            store = self.index.name(),
            "querying index store"
        );

        let (hits, total) = tokio::try_join!(
            self.index
                .match_documents(&query.compiled, pagination.limit, pagination.offset()),
            self.index.count(&query.compiled)
        )?;

        let mut documents = self.ranker.rank(hits);
        if query.highlight {
            for document in &mut documents {
                self.highlighter
                    .highlight_document(document, &query.tokens, &query.markers);
            }
        }

        let result = SearchResult {
            documents,
            suggestions: Vec::new(),
            total,
        };
        debug!(key = %key, total, returned = result.len(), "search complete");

        self.cache.put(&key, &result).await;
        Ok(result)
    }

    /// Autocomplete suggestions for `query`.
    pub async fn suggest(&self, query: &str, limit: Option<usize>) -> Result<Vec<Suggestion>> {
        self.suggestions
            .suggest(self.index.as_ref(), query, limit)
            .await
    }

    /// React to a catalog mutation by dropping every cached search.
    ///
    /// Returns once the invalidation has finished, with the number of entries
    /// removed.
    ///
    /// A search that read the index before the mutation but finishes after
    /// the sweep still writes its result. That entry is stale and is served
    /// until its TTL runs out, so `cache.ttl_secs` bounds how long a mutation
    /// can go unseen.
    pub async fn handle_event(&self, event: &CatalogEvent) -> usize {
        info!(
            kind = event.kind(),
            id = event.document_id(),
            "catalog changed, invalidating search cache"
        );
        self.cache.invalidate_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::catalog::CatalogDocument;
    use crate::config::HighlightConfig;
    use crate::store::MemoryIndexStore;

    fn service() -> (SearchService, Arc<MemoryIndexStore>, Arc<MemoryCacheStore>) {
        let index = Arc::new(MemoryIndexStore::with_documents(vec![
            CatalogDocument::new("1", "Harry Potter and the Philosopher's Stone")
                .with_author("J. K. Rowling")
                .with_description("Harry learns he is a wizard."),
            CatalogDocument::new("2", "Lalka").with_author("Bolesław Prus"),
        ]));
        let cache = Arc::new(MemoryCacheStore::new());
        let service = SearchService::new(index.clone(), cache.clone(), FolioConfig::default());
        (service, index, cache)
    }

    #[tokio::test]
    async fn test_search_ranks_and_caches() -> Result<()> {
        let (service, _, cache) = service();

        let result = service.search(&SearchRequest::new("harry")).await?;
        assert_eq!(result.total, 1);
        assert_eq!(result.documents[0].rank, 1.0);
        assert!(result.suggestions.is_empty());
        assert_eq!(cache.len(), 1);

        let again = service.search(&SearchRequest::new("  HARRY ")).await?;
        assert_eq!(again, result);
        assert_eq!(cache.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_operator_only_query() -> Result<()> {
        let (service, _, cache) = service();

        let result = service.search(&SearchRequest::new("!!!")).await?;
        assert_eq!(result, SearchResult::empty());
        assert!(cache.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_highlighted_search() -> Result<()> {
        let (service, _, _) = service();
        let request = SearchRequest::new("harry")
            .highlight(true)
            .markers(MarkerPair::new("[", "]"));

        let result = service.search(&request).await?;
        let document = &result.documents[0];
        assert_eq!(
            document.highlighted_title.as_deref(),
            Some("[Harry] Potter and the Philosopher's Stone")
        );
        assert_eq!(
            document.highlighted_description.as_deref(),
            Some("[Harry] learns he is a wizard.")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_configured_markers_apply_when_request_has_none() -> Result<()> {
        let index = Arc::new(MemoryIndexStore::with_documents(vec![
            CatalogDocument::new("1", "Harry Potter").with_author("J. K. Rowling"),
        ]));
        let cache = Arc::new(MemoryCacheStore::new());
        let config = FolioConfig::new().highlight(HighlightConfig::new().markers("<b>", "</b>"));
        let service = SearchService::new(index, cache.clone(), config);

        let result = service.search(&SearchRequest::new("harry").highlight(true)).await?;
        assert_eq!(
            result.documents[0].highlighted_title.as_deref(),
            Some("<b>Harry</b> Potter")
        );

        // explicit markers win and are cached under their own key
        let explicit = SearchRequest::new("harry")
            .highlight(true)
            .markers(MarkerPair::default());
        let result = service.search(&explicit).await?;
        assert_eq!(
            result.documents[0].highlighted_title.as_deref(),
            Some("<mark>Harry</mark> Potter")
        );
        assert_eq!(cache.len(), 2);

        let query = service.compile(&SearchRequest::new("harry").highlight(true));
        assert_eq!(query.markers, MarkerPair::new("<b>", "</b>"));
        assert!(service.cache().key(&query).as_str().contains("<b></b>"));

        Ok(())
    }

    #[tokio::test]
    async fn test_punctuated_query_matches_and_highlights() -> Result<()> {
        let (service, _, _) = service();

        let result = service
            .search(&SearchRequest::new("harry, wizard.").highlight(true))
            .await?;
        assert_eq!(result.total, 1);
        assert_eq!(
            result.documents[0].highlighted_description.as_deref(),
            Some("<mark>Harry</mark> learns he is a <mark>wizard</mark>.")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_event_invalidates() -> Result<()> {
        let (service, index, cache) = service();

        service.search(&SearchRequest::new("lalka")).await?;
        index.upsert(CatalogDocument::new("3", "Lalka i inne"));

        let deleted = service
            .handle_event(&CatalogEvent::Created("3".to_string()))
            .await;
        assert_eq!(deleted, 1);
        assert!(cache.is_empty());

        let result = service.search(&SearchRequest::new("lalka")).await?;
        assert_eq!(result.total, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_suggest() -> Result<()> {
        let (service, _, _) = service();

        let suggestions = service.suggest("rowling", None).await?;
        assert_eq!(suggestions[0].text, "J. K. Rowling");
        assert!(service.suggest("r", None).await?.is_empty());

        Ok(())
    }
}
