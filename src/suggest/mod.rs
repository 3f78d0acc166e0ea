//! Autocomplete suggestions from the title and author corpora.

pub mod engine;

pub use self::engine::{Suggestion, SuggestionEngine, SuggestionKind};
