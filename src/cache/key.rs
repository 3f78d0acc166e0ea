//! Canonical cache keys.
//!
//! A key is a pure function of the logical request: the query lowercased,
//! trimmed and with whitespace runs collapsed, the page, the page size and
//! the highlight flag. Highlighted responses embed the markers, so the marker
//! pair is part of the key whenever highlighting is on.

use std::fmt;

use crate::analysis::canonicalize_whitespace;
use crate::query::{MarkerPair, Pagination, SearchQuery};

/// Key of one cached search response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for a request.
    ///
    /// Fixed-format fields come first and the query last, so no query text
    /// can make two different requests collide.
    pub fn new(
        namespace: &str,
        query: &str,
        pagination: Pagination,
        highlight: bool,
        markers: &MarkerPair,
    ) -> Self {
        let mut key = format!(
            "{namespace}p{}:l{}:h{}:",
            pagination.page,
            pagination.limit,
            u8::from(highlight)
        );
        if highlight {
            key.push_str(&format!(
                "m{},{}:{}{}:",
                markers.start.len(),
                markers.end.len(),
                markers.start,
                markers.end
            ));
        }
        key.push_str(&Self::canonical_query(query));
        CacheKey(key)
    }

    /// Key for a compiled request.
    pub fn for_query(namespace: &str, query: &SearchQuery) -> Self {
        Self::new(
            namespace,
            &query.raw,
            query.pagination,
            query.highlight,
            &query.markers,
        )
    }

    /// Lowercase, trim and collapse whitespace.
    pub fn canonical_query(query: &str) -> String {
        canonicalize_whitespace(&query.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
