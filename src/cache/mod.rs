//! Memoization of search responses.
//!
//! [`SearchCache`] sits between the service and a key-value [`CacheStore`].
//! It is strictly best-effort: every cache failure is logged and treated as a
//! miss, so a broken cache slows searches down but never fails them.

pub mod key;
pub mod memory;
pub mod search_cache;
pub mod store;

pub use self::key::CacheKey;
pub use self::memory::MemoryCacheStore;
pub use self::search_cache::SearchCache;
pub use self::store::{CacheStore, ScanCursor, ScanPage};
