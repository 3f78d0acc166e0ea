//! Runtime configuration for the search core.
//!
//! Every section has sensible defaults, so an empty JSON object is a valid
//! configuration file:
//!
//! ```
//! use folio::config::FolioConfig;
//!
//! let config: FolioConfig = serde_json::from_str("{}").unwrap();
//! assert_eq!(config.cache.ttl_secs, 300);
//! assert_eq!(config.pagination.max_limit, 100);
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::query::MarkerPair;

/// Default opening highlight marker.
pub const DEFAULT_START_MARKER: &str = "<mark>";
/// Default closing highlight marker.
pub const DEFAULT_END_MARKER: &str = "</mark>";

/// Separator closing the cache namespace.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Characters with special meaning in cache store glob patterns.
const GLOB_METACHARACTERS: [char; 5] = ['\\', '*', '?', '[', ']'];

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    /// Page and page-size limits for searches.
    pub pagination: PaginationConfig,
    /// Search cache settings.
    pub cache: CacheConfig,
    /// Highlighting and snippet settings.
    pub highlight: HighlightConfig,
    /// Autocomplete settings.
    pub suggestion: SuggestionConfig,
}

impl FolioConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: FolioConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the cache section.
    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the highlight section.
    pub fn highlight(mut self, highlight: HighlightConfig) -> Self {
        self.highlight = highlight;
        self
    }

    /// Replace the suggestion section.
    pub fn suggestion(mut self, suggestion: SuggestionConfig) -> Self {
        self.suggestion = suggestion;
        self
    }

    /// Replace the pagination section.
    pub fn pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<()> {
        let p = &self.pagination;
        if p.default_limit == 0 || p.max_limit == 0 {
            return Err(FolioError::config("pagination limits must be positive"));
        }
        if p.default_limit > p.max_limit {
            return Err(FolioError::config(format!(
                "default limit {} exceeds max limit {}",
                p.default_limit, p.max_limit
            )));
        }

        let s = &self.suggestion;
        if s.default_limit == 0 || s.max_limit == 0 || s.default_limit > s.max_limit {
            return Err(FolioError::config(
                "suggestion limits must be positive and default <= max",
            ));
        }
        if !(0.0..=1.0).contains(&s.similarity_threshold) {
            return Err(FolioError::config(
                "similarity threshold must be within [0, 1]",
            ));
        }

        if self.cache.namespace.is_empty() {
            return Err(FolioError::config("cache namespace must not be empty"));
        }
        if self.cache.scan_page_size == 0 {
            return Err(FolioError::config("cache scan page size must be positive"));
        }

        let h = &self.highlight;
        if !(h.word_boundary_ratio > 0.0 && h.word_boundary_ratio <= 1.0) {
            return Err(FolioError::config(
                "word boundary ratio must be within (0, 1]",
            ));
        }
        if !h.marker_pair().is_well_formed() {
            return Err(FolioError::config(
                "highlight markers must be non-empty and must not contain each other",
            ));
        }

        Ok(())
    }
}

/// Pagination limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    /// Page size used when the caller does not supply one.
    pub default_limit: usize,
    /// Largest page size a caller may request.
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

/// Search cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether search responses are memoized at all.
    pub enabled: bool,
    /// Lifetime of a cached response in seconds.
    pub ttl_secs: u64,
    /// Key prefix shared by every search cache entry. A trailing `:` is
    /// added when missing, so `search` and `search:` name the same keys.
    pub namespace: String,
    /// Number of keys requested per cursor step during invalidation.
    pub scan_page_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            ttl_secs: 300,
            namespace: "search:".to_string(),
            scan_page_size: 100,
        }
    }
}

impl CacheConfig {
    /// Entry lifetime as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Set the TTL in seconds.
    pub fn ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Set the key namespace.
    pub fn namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the invalidation scan page size.
    pub fn scan_page_size(mut self, scan_page_size: usize) -> Self {
        self.scan_page_size = scan_page_size;
        self
    }

    /// Enable or disable caching.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Namespace as it prefixes keys, always ending in the separator.
    pub fn key_prefix(&self) -> String {
        let mut prefix = self.namespace.clone();
        if !prefix.ends_with(NAMESPACE_SEPARATOR) {
            prefix.push(NAMESPACE_SEPARATOR);
        }
        prefix
    }

    /// Glob pattern matching every entry in the namespace and nothing else.
    pub fn key_pattern(&self) -> String {
        let prefix = self.key_prefix();
        let mut pattern = String::with_capacity(prefix.len() + 2);
        for c in prefix.chars() {
            if GLOB_METACHARACTERS.contains(&c) {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('*');
        pattern
    }
}

/// Highlighting and snippet settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
    /// Marker inserted before a matched word when the request names none.
    pub start_marker: String,
    /// Marker inserted after a matched word when the request names none.
    pub end_marker: String,
    /// Plain-text length a highlighted description is cut down to.
    pub description_max_length: usize,
    /// Plain-text length for titles; `None` leaves titles whole.
    pub title_max_length: Option<usize>,
    /// Cut at a word boundary only if it lies at or past this share of the limit.
    pub word_boundary_ratio: f64,
    /// Text appended to a truncated snippet.
    pub ellipsis: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        HighlightConfig {
            start_marker: DEFAULT_START_MARKER.to_string(),
            end_marker: DEFAULT_END_MARKER.to_string(),
            description_max_length: 200,
            title_max_length: None,
            word_boundary_ratio: 0.7,
            ellipsis: "...".to_string(),
        }
    }
}

impl HighlightConfig {
    /// Create a new highlight configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured markers as a pair.
    pub fn marker_pair(&self) -> MarkerPair {
        MarkerPair::new(self.start_marker.as_str(), self.end_marker.as_str())
    }

    /// Set the default markers.
    pub fn markers<S: Into<String>, E: Into<String>>(mut self, start: S, end: E) -> Self {
        self.start_marker = start.into();
        self.end_marker = end.into();
        self
    }

    /// Set the description snippet length.
    pub fn description_max_length(mut self, max_length: usize) -> Self {
        self.description_max_length = max_length;
        self
    }

    /// Truncate titles to the given plain-text length.
    pub fn title_max_length(mut self, max_length: usize) -> Self {
        self.title_max_length = Some(max_length);
        self
    }

    /// Set the word boundary ratio.
    pub fn word_boundary_ratio(mut self, ratio: f64) -> Self {
        self.word_boundary_ratio = ratio;
        self
    }

    /// Set the ellipsis string.
    pub fn ellipsis<S: Into<String>>(mut self, ellipsis: S) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }
}

/// Autocomplete settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuggestionConfig {
    /// Number of suggestions returned when the caller does not ask for a count.
    pub default_limit: usize,
    /// Largest number of suggestions a caller may request.
    pub max_limit: usize,
    /// Queries shorter than this (in characters, after trimming) yield nothing.
    pub min_query_chars: usize,
    /// Minimum similarity a fuzzy candidate must reach.
    pub similarity_threshold: f32,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig {
            default_limit: 10,
            max_limit: 20,
            min_query_chars: 2,
            similarity_threshold: 0.3,
        }
    }
}

impl SuggestionConfig {
    /// Set the similarity threshold.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }
}
