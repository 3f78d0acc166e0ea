//! Caller-facing search parameters and their compiled per-request form.

use serde::{Deserialize, Serialize};

use crate::config::{PaginationConfig, DEFAULT_END_MARKER, DEFAULT_START_MARKER};
use crate::error::{FolioError, Result};
use crate::query::compiler::{CompiledQuery, QueryCompiler};

/// Start/end strings wrapped around highlighted words.
///
/// The two strings must not be substrings of one another; snippet truncation
/// recognizes markers by literal comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerPair {
    pub start: String,
    pub end: String,
}

impl MarkerPair {
    pub fn new<S: Into<String>, E: Into<String>>(start: S, end: E) -> Self {
        MarkerPair {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Markers that can be told apart while scanning text.
    pub fn is_well_formed(&self) -> bool {
        !self.start.is_empty()
            && !self.end.is_empty()
            && !self.start.contains(&self.end)
            && !self.end.contains(&self.start)
    }
}

impl Default for MarkerPair {
    fn default() -> Self {
        MarkerPair::new(DEFAULT_START_MARKER, DEFAULT_END_MARKER)
    }
}

/// 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Pagination {
    pub fn new(page: usize, limit: usize) -> Self {
        Pagination { page, limit }
    }

    /// Number of ranked documents skipped before this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Force the values into the accepted range.
    pub fn clamped(self, max_limit: usize) -> Self {
        Pagination {
            page: self.page.max(1),
            limit: self.limit.clamp(1, max_limit.max(1)),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::new(1, PaginationConfig::default().default_limit)
    }
}

/// Parameters of one `search` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub pagination: Pagination,
    pub highlight: bool,
    /// Caller-chosen markers; the configured pair applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markers: Option<MarkerPair>,
}

impl SearchRequest {
    /// Page 1, default limit, no highlighting.
    pub fn new<S: Into<String>>(query: S) -> Self {
        SearchRequest {
            query: query.into(),
            pagination: Pagination::default(),
            highlight: false,
            markers: None,
        }
    }

    pub fn page(mut self, page: usize) -> Self {
        self.pagination.page = page;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.pagination.limit = limit;
        self
    }

    pub fn highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn markers(mut self, markers: MarkerPair) -> Self {
        self.markers = Some(markers);
        self
    }

    /// The markers this request highlights with, given the configured pair.
    pub fn markers_or(&self, default: &MarkerPair) -> MarkerPair {
        self.markers.clone().unwrap_or_else(|| default.clone())
    }

    /// Reject parameters the calling layer must not forward.
    ///
    /// The search core itself clamps out-of-range values rather than failing;
    /// this is the check an outer surface (HTTP handler, CLI) runs first.
    pub fn validate(&self, config: &PaginationConfig) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(FolioError::validation("query must not be empty"));
        }
        if self.pagination.page < 1 {
            return Err(FolioError::validation("page must be at least 1"));
        }
        if self.pagination.limit < 1 || self.pagination.limit > config.max_limit {
            return Err(FolioError::validation(format!(
                "limit must be between 1 and {}",
                config.max_limit
            )));
        }
        if self.highlight
            && let Some(markers) = &self.markers
            && !markers.is_well_formed()
        {
            return Err(FolioError::validation(
                "highlight markers must be non-empty and must not contain each other",
            ));
        }
        Ok(())
    }
}

/// Caller-boundary check for autocomplete input.
pub fn validate_suggest_query(query: &str, min_chars: usize) -> Result<()> {
    if query.trim().chars().count() < min_chars {
        return Err(FolioError::validation(format!(
            "suggestion query must be at least {min_chars} characters"
        )));
    }
    Ok(())
}

/// A request after compilation; lives for the duration of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Input exactly as the caller sent it.
    pub raw: String,
    /// Surviving normalized tokens.
    pub tokens: Vec<String>,
    pub compiled: CompiledQuery,
    pub pagination: Pagination,
    pub highlight: bool,
    pub markers: MarkerPair,
}

impl SearchQuery {
    /// Compile a request, clamping pagination into `1..=max_limit` and
    /// falling back to `default_markers` when the request names none.
    pub fn compile(
        request: &SearchRequest,
        compiler: &QueryCompiler,
        max_limit: usize,
        default_markers: &MarkerPair,
    ) -> Self {
        let compiled = compiler.compile(&request.query);
        let tokens = compiled.tokens().into_iter().map(str::to_string).collect();

        SearchQuery {
            raw: request.query.clone(),
            tokens,
            compiled,
            pagination: request.pagination.clamped(max_limit),
            highlight: request.highlight,
            markers: request.markers_or(default_markers),
        }
    }

    /// True when nothing searchable survived normalization.
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_offset() {
        assert_eq!(Pagination::new(1, 20).offset(), 0);
        assert_eq!(Pagination::new(3, 20).offset(), 40);
        assert_eq!(Pagination::new(0, 20).offset(), 0);
    }

    #[test]
    fn test_pagination_clamped() {
        assert_eq!(Pagination::new(0, 0).clamped(100), Pagination::new(1, 1));
        assert_eq!(Pagination::new(2, 500).clamped(100), Pagination::new(2, 100));
        assert_eq!(Pagination::new(4, 30).clamped(100), Pagination::new(4, 30));
    }

    #[test]
    fn test_request_defaults() {
        let request = SearchRequest::new("harry");
        assert_eq!(request.pagination, Pagination::new(1, 20));
        assert!(!request.highlight);
        assert_eq!(request.markers, None);
        assert_eq!(
            request.markers_or(&MarkerPair::new("<b>", "</b>")),
            MarkerPair::new("<b>", "</b>")
        );

        let request = request.markers(MarkerPair::new("[", "]"));
        assert_eq!(
            request.markers_or(&MarkerPair::default()),
            MarkerPair::new("[", "]")
        );
    }

    #[test]
    fn test_request_validation() {
        let config = PaginationConfig::default();

        assert!(SearchRequest::new("harry").validate(&config).is_ok());
        assert!(SearchRequest::new("   ").validate(&config).is_err());
        assert!(SearchRequest::new("harry").page(0).validate(&config).is_err());
        assert!(SearchRequest::new("harry").limit(0).validate(&config).is_err());
        assert!(SearchRequest::new("harry").limit(101).validate(&config).is_err());
        assert!(SearchRequest::new("harry").limit(100).validate(&config).is_ok());

        let overlapping = SearchRequest::new("harry")
            .highlight(true)
            .markers(MarkerPair::new("*", "**"));
        assert!(matches!(
            overlapping.validate(&config),
            Err(FolioError::Validation(_))
        ));
        assert!(SearchRequest::new("harry").highlight(true).validate(&config).is_ok());
    }

    #[test]
    fn test_marker_well_formed() {
        assert!(MarkerPair::default().is_well_formed());
        assert!(MarkerPair::new("[", "]").is_well_formed());
        assert!(!MarkerPair::new("", "]").is_well_formed());
        assert!(!MarkerPair::new("<b>", "<b>").is_well_formed());
    }

    #[test]
    fn test_validate_suggest_query() {
        assert!(validate_suggest_query("a", 2).is_err());
        assert!(validate_suggest_query("  a  ", 2).is_err());
        assert!(validate_suggest_query("ab", 2).is_ok());
        assert!(validate_suggest_query("żó", 2).is_ok());
    }

    #[test]
    fn test_search_query_compile() {
        let request = SearchRequest::new("  Harry   potter ").limit(500);
        let defaults = MarkerPair::new("<em>", "</em>");
        let query = SearchQuery::compile(&request, &QueryCompiler::new(), 100, &defaults);

        assert_eq!(query.tokens, vec!["harry", "potter"]);
        assert_eq!(query.pagination.limit, 100);
        assert_eq!(query.markers, defaults);
        assert!(!query.is_empty());

        let query = SearchQuery::compile(
            &SearchRequest::new("!!!"),
            &QueryCompiler::new(),
            100,
            &defaults,
        );
        assert!(query.is_empty());
        assert!(query.tokens.is_empty());
    }
}
