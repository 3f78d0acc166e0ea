//! Best-effort memoization of search results.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::cache::key::CacheKey;
use crate::cache::store::CacheStore;
use crate::config::CacheConfig;
use crate::error::{FolioError, Result};
use crate::query::SearchQuery;
use crate::service::SearchResult;

/// Search result cache over a [`CacheStore`].
///
/// None of the methods return errors. Reads that fail or hold an
/// undecodable payload count as misses, failed writes are skipped. Cache
/// errors are logged as warnings; anything else a store raises is logged as
/// an error but swallowed all the same.
#[derive(Debug, Clone)]
pub struct SearchCache {
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
}

impl SearchCache {
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        SearchCache { store, config }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Key under which `query` is cached.
    pub fn key(&self, query: &SearchQuery) -> CacheKey {
        CacheKey::for_query(&self.config.key_prefix(), query)
    }

    fn report(&self, operation: &str, key: &str, e: &FolioError) {
        let store = self.store.name();
        if e.is_cache_error() {
            warn!(key, store, error = %e, "cache {operation} failed");
        } else {
            error!(key, store, error = %e, "unexpected error during cache {operation}");
        }
    }

    /// Cached result for `key`, if any.
    pub async fn get(&self, key: &CacheKey) -> Option<SearchResult> {
        if !self.config.enabled {
            return None;
        }

        match self.try_get(key).await {
            Ok(Some(result)) => {
                debug!(key = %key, "cache hit");
                Some(result)
            }
            Ok(None) => {
                debug!(key = %key, "cache miss");
                None
            }
            Err(e) => {
                self.report("read", key.as_str(), &e);
                None
            }
        }
    }

    async fn try_get(&self, key: &CacheKey) -> Result<Option<SearchResult>> {
        let Some(bytes) = self.store.get(key.as_str()).await? else {
            return Ok(None);
        };
        let result = serde_json::from_slice(&bytes)
            .map_err(|e| FolioError::serialization(format!("Corrupt cache entry: {e}")))?;
        Ok(Some(result))
    }

    /// Store `result` under `key` for the configured TTL.
    pub async fn put(&self, key: &CacheKey, result: &SearchResult) {
        if !self.config.enabled {
            return;
        }

        if let Err(e) = self.try_put(key, result).await {
            self.report("write", key.as_str(), &e);
        }
    }

    async fn try_put(&self, key: &CacheKey, result: &SearchResult) -> Result<()> {
        let bytes = serde_json::to_vec(result)
            .map_err(|e| FolioError::serialization(format!("Cannot encode result: {e}")))?;
        self.store
            .set(key.as_str(), bytes, self.config.ttl())
            .await
    }

    /// Remove every cached result, returning how many entries were deleted.
    ///
    /// A store failure stops the sweep; entries it could not reach expire
    /// with their TTL.
    pub async fn invalidate_all(&self) -> usize {
        let pattern = self.config.key_pattern();
        match self
            .store
            .scan_delete(&pattern, self.config.scan_page_size)
            .await
        {
            Ok(deleted) => {
                info!(pattern = %pattern, deleted, "search cache invalidated");
                deleted
            }
            Err(e) => {
                self.report("invalidation", &pattern, &e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::cache::memory::MemoryCacheStore;
    use crate::cache::store::{ScanCursor, ScanPage};
    use crate::query::{MarkerPair, QueryCompiler, SearchRequest};

    /// Fails every operation.
    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(FolioError::cache_store("connection refused"))
        }

        async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<()> {
            Err(FolioError::cache_store("connection refused"))
        }

        async fn scan(
            &self,
            _pattern: &str,
            _cursor: Option<ScanCursor>,
            _count: usize,
        ) -> Result<ScanPage> {
            Err(FolioError::cache_store("connection refused"))
        }

        async fn delete(&self, _keys: &[String]) -> Result<usize> {
            Err(FolioError::cache_store("connection refused"))
        }
    }

    /// Fails every operation with an error outside the cache family.
    #[derive(Debug)]
    struct MisbehavingStore;

    #[async_trait]
    impl CacheStore for MisbehavingStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(FolioError::other("driver panicked"))
        }

        async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<()> {
            Err(FolioError::Io(std::io::Error::other("broken pipe")))
        }

        async fn scan(
            &self,
            _pattern: &str,
            _cursor: Option<ScanCursor>,
            _count: usize,
        ) -> Result<ScanPage> {
            Err(FolioError::other("driver panicked"))
        }

        async fn delete(&self, _keys: &[String]) -> Result<usize> {
            Err(FolioError::other("driver panicked"))
        }
    }

    fn query(text: &str) -> SearchQuery {
        SearchQuery::compile(
            &SearchRequest::new(text),
            &QueryCompiler::new(),
            100,
            &MarkerPair::default(),
        )
    }

    fn result(total: u64) -> SearchResult {
        SearchResult {
            total,
            ..SearchResult::empty()
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = SearchCache::new(Arc::new(MemoryCacheStore::new()), CacheConfig::default());
        let key = cache.key(&query("Harry  Potter"));

        assert_eq!(cache.get(&key).await, None);
        cache.put(&key, &result(3)).await;
        assert_eq!(cache.get(&key).await, Some(result(3)));

        // canonically equal query hits the same entry
        let same = cache.key(&query("harry potter"));
        assert_eq!(cache.get(&same).await, Some(result(3)));
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() -> Result<()> {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = SearchCache::new(store.clone(), CacheConfig::default());
        let key = cache.key(&query("harry"));

        store
            .set(key.as_str(), b"not json".to_vec(), Duration::from_secs(60))
            .await?;
        assert_eq!(cache.get(&key).await, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let cache = SearchCache::new(Arc::new(BrokenStore), CacheConfig::default());
        let key = cache.key(&query("harry"));

        assert_eq!(cache.get(&key).await, None);
        cache.put(&key, &result(1)).await;
        assert_eq!(cache.invalidate_all().await, 0);
    }

    #[tokio::test]
    async fn test_unexpected_store_errors_are_swallowed() {
        let cache = SearchCache::new(Arc::new(MisbehavingStore), CacheConfig::default());
        let key = cache.key(&query("harry"));

        assert!(!FolioError::other("driver panicked").is_cache_error());
        assert_eq!(cache.get(&key).await, None);
        cache.put(&key, &result(1)).await;
        assert_eq!(cache.invalidate_all().await, 0);
    }

    #[tokio::test]
    async fn test_invalidate_all_keeps_other_namespaces() -> Result<()> {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = SearchCache::new(store.clone(), CacheConfig::default());

        for text in ["harry", "potter", "lalka"] {
            cache.put(&cache.key(&query(text)), &result(1)).await;
        }
        store
            .set("session:abc", Vec::new(), Duration::from_secs(60))
            .await?;

        assert_eq!(cache.invalidate_all().await, 3);
        assert_eq!(store.len(), 1);
        assert_eq!(cache.get(&cache.key(&query("harry"))).await, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_namespace_without_separator_stays_in_its_keys() -> Result<()> {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = SearchCache::new(store.clone(), CacheConfig::default().namespace("search"));

        let key = cache.key(&query("harry"));
        assert!(key.as_str().starts_with("search:"));
        cache.put(&key, &result(1)).await;
        store
            .set("searchHistory:42", Vec::new(), Duration::from_secs(60))
            .await?;

        assert_eq!(cache.invalidate_all().await, 1);
        assert!(store.contains_key("searchHistory:42"));

        Ok(())
    }

    #[tokio::test]
    async fn test_namespace_glob_characters_match_literally() -> Result<()> {
        let store = Arc::new(MemoryCacheStore::new());
        let cache = SearchCache::new(store.clone(), CacheConfig::default().namespace("s*:"));

        cache.put(&cache.key(&query("harry")), &result(1)).await;
        store
            .set("sessions:abc", Vec::new(), Duration::from_secs(60))
            .await?;

        assert_eq!(cache.invalidate_all().await, 1);
        assert!(store.contains_key("sessions:abc"));
        assert_eq!(store.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_disabled_cache() {
        let store = Arc::new(MemoryCacheStore::new());
        let config = CacheConfig::default().enabled(false);
        let cache = SearchCache::new(store.clone(), config);
        let key = cache.key(&query("harry"));

        cache.put(&key, &result(1)).await;
        assert!(store.is_empty());
        assert_eq!(cache.get(&key).await, None);
    }
}
