//! The caller-facing search service.
//!
//! [`SearchService`] is built once at startup from the collaborator handles
//! and shared by every request. It owns no mutable state of its own.

pub mod result;
pub mod search_service;

pub use self::result::SearchResult;
pub use self::search_service::SearchService;
