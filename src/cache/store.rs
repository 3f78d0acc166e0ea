//! Contract of the external key-value cache.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Opaque position in a key-space scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCursor(pub String);

/// One step of a key-space scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Matching keys found in this step. May be empty even if the scan is not over.
    pub keys: Vec<String>,
    /// Where to resume, `None` once the whole key space has been visited.
    pub next: Option<ScanCursor>,
}

/// A key-value store with per-entry expiry and incremental key scans.
///
/// Scans must be incremental: each call examines a bounded slice of the key
/// space, so removing a large namespace never blocks the store for long.
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Fetch a value, `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a value that expires after `ttl`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Examine up to `count` keys after `cursor`, returning those matching
    /// the glob `pattern` (`*` any run, `?` any one character).
    async fn scan(&self, pattern: &str, cursor: Option<ScanCursor>, count: usize)
    -> Result<ScanPage>;

    /// Remove keys, returning how many existed.
    async fn delete(&self, keys: &[String]) -> Result<usize>;

    /// Remove every key matching `pattern`, one scan step at a time.
    async fn scan_delete(&self, pattern: &str, page_size: usize) -> Result<usize> {
        let mut cursor = None;
        let mut deleted = 0;

        loop {
            let page = self.scan(pattern, cursor, page_size.max(1)).await?;
            if !page.keys.is_empty() {
                deleted += self.delete(&page.keys).await?;
            }
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(deleted)
    }

    /// Get the name of this store (for logging).
    fn name(&self) -> &str {
        "cache-store"
    }
}
