//! # Folio
//!
//! The search core of a book catalog: relevance-ranked lookups, highlighted
//! snippets and autocomplete suggestions, with a best-effort result cache
//! that is invalidated on every catalog change.
//!
//! ## Features
//!
//! - Query normalization with diacritic folding and prefix matching
//! - Score normalization into `[0, 1]`
//! - Marker-safe snippet truncation
//! - Title and author autocomplete from two independent corpora
//! - Pluggable index and cache stores, with in-memory implementations
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use folio::cache::MemoryCacheStore;
//! use folio::catalog::CatalogDocument;
//! use folio::config::FolioConfig;
//! use folio::query::SearchRequest;
//! use folio::service::SearchService;
//! use folio::store::MemoryIndexStore;
//!
//! # async fn run() -> folio::error::Result<()> {
//! let index = Arc::new(MemoryIndexStore::with_documents(vec![
//!     CatalogDocument::new("1", "Lalka").with_author("Bolesław Prus"),
//! ]));
//! let service = SearchService::new(index, Arc::new(MemoryCacheStore::new()), FolioConfig::default());
//!
//! let result = service.search(&SearchRequest::new("lalka").highlight(true)).await?;
//! assert_eq!(result.total, 1);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod highlight;
pub mod query;
pub mod ranking;
pub mod service;
pub mod store;
pub mod suggest;
pub mod util;

pub mod prelude {
    pub use crate::cache::{CacheStore, MemoryCacheStore};
    pub use crate::catalog::{CatalogDocument, CatalogEvent};
    pub use crate::config::FolioConfig;
    pub use crate::error::{FolioError, Result};
    pub use crate::query::{MarkerPair, SearchRequest};
    pub use crate::service::{SearchResult, SearchService};
    pub use crate::store::{IndexStore, MemoryIndexStore};
    pub use crate::suggest::{Suggestion, SuggestionKind};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
