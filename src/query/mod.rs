//! Query compilation and per-request search parameters.

pub mod compiler;
pub mod request;

pub use self::compiler::{CompiledQuery, QueryCompiler, QueryTerm, RESERVED_OPERATORS};
pub use self::request::{
    validate_suggest_query, MarkerPair, Pagination, SearchQuery, SearchRequest,
};
