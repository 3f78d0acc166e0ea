//! In-memory cache store for testing and single-process deployments.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;

use crate::cache::store::{CacheStore, ScanCursor, ScanPage};
use crate::error::{FolioError, Result};

/// Cache entry with its expiry deadline.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Compile a glob pattern (`*`, `?`, `\` escapes) into an anchored regex.
fn compile_glob(pattern: &str) -> Result<Regex> {
    let mut regex_pattern = String::with_capacity(pattern.len() + 8);
    regex_pattern.push('^');

    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => regex_pattern.push_str(&regex::escape(&escaped.to_string())),
                None => regex_pattern.push_str(r"\\"),
            },
            '*' => regex_pattern.push_str(".*"),
            '?' => regex_pattern.push('.'),
            c => regex_pattern.push_str(&regex::escape(&c.to_string())),
        }
    }

    regex_pattern.push('$');
    Regex::new(&regex_pattern)
        .map_err(|e| FolioError::cache_store(format!("Invalid key pattern: {e}")))
}

/// A [`CacheStore`] backed by an ordered map.
///
/// Keys are kept sorted, so a scan cursor is simply the last key examined;
/// deleting keys between scan steps never makes the scan skip anything.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<BTreeMap<String, CacheEntry>>,
    scans: AtomicUsize,
}

impl MemoryCacheStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a live entry exists under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired(Instant::now()))
    }

    /// Number of scan steps served so far.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: remove on access.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    async fn scan(
        &self,
        pattern: &str,
        cursor: Option<ScanCursor>,
        count: usize,
    ) -> Result<ScanPage> {
        self.scans.fetch_add(1, Ordering::Relaxed);
        let matcher = compile_glob(pattern)?;
        let now = Instant::now();

        let entries = self.entries.read();
        let lower = match &cursor {
            Some(ScanCursor(last)) => Bound::Excluded(last.clone()),
            None => Bound::Unbounded,
        };

        let mut examined = entries.range((lower, Bound::Unbounded));
        let mut keys = Vec::new();
        let mut last = None;

        for (key, entry) in examined.by_ref().take(count.max(1)) {
            if !entry.is_expired(now) && matcher.is_match(key) {
                keys.push(key.clone());
            }
            last = Some(key.clone());
        }

        let next = match (examined.next(), last) {
            (Some(_), Some(last)) => Some(ScanCursor(last)),
            _ => None,
        };

        Ok(ScanPage { keys, next })
    }

    async fn delete(&self, keys: &[String]) -> Result<usize> {
        let mut entries = self.entries.write();
        Ok(keys.iter().filter(|key| entries.remove(*key).is_some()).count())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
