//! The ranked-match collaborator and an in-memory implementation of it.

pub mod index_store;
pub mod memory;

pub use self::index_store::{IndexStore, SimilarityCandidate, SimilarityRequest};
pub use self::memory::MemoryIndexStore;
