//! Error types for the Folio library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`FolioError`] enum. Errors raised by the index store collaborator are
//! propagated to callers unchanged; errors raised by the cache store are
//! absorbed by [`crate::cache::SearchCache`] and never surface from a search.
//!
//! # Examples
//!
//! ```
//! use folio::error::{FolioError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FolioError::validation("page must be at least 1"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Folio operations.
#[derive(Error, Debug)]
pub enum FolioError {
    /// I/O errors (config files, catalog files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failures reported by the ranked-match collaborator (timeouts, lost connections).
    #[error("Index store error: {0}")]
    IndexStore(String),

    /// Failures reported by the key-value cache collaborator.
    #[error("Cache store error: {0}")]
    CacheStore(String),

    /// Caller supplied parameters outside the accepted range.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid configuration values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cached payloads that could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with FolioError.
pub type Result<T> = std::result::Result<T, FolioError>;

impl FolioError {
    /// Create a new index store error.
    pub fn index_store<S: Into<String>>(msg: S) -> Self {
        FolioError::IndexStore(msg.into())
    }

    /// Create a new cache store error.
    pub fn cache_store<S: Into<String>>(msg: S) -> Self {
        FolioError::CacheStore(msg.into())
    }

    /// Create a new validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        FolioError::Validation(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        FolioError::Config(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        FolioError::Serialization(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FolioError::Other(msg.into())
    }

    /// Create a new timeout error, reported as an index store failure.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        FolioError::IndexStore(format!("Timeout: {}", msg.into()))
    }

    /// Whether this error belongs to the best-effort cache layer.
    pub fn is_cache_error(&self) -> bool {
        matches!(self, FolioError::CacheStore(_) | FolioError::Serialization(_))
    }
}
