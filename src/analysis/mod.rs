//! Text analysis shared by the query compiler, the highlighter and the cache.
//!
//! The pieces here are small and pure: a char filter that folds diacritics to
//! base Latin letters, a whitespace canonicalizer and a word segmenter that
//! reports byte spans.

pub mod char_filter;
pub mod word;

pub use char_filter::diacritic_folding::DiacriticFoldingCharFilter;
pub use char_filter::CharFilter;
pub use word::{canonicalize_whitespace, word_spans, WordSpan};

/// Fold diacritics and lowercase, the normalization applied to every query token.
pub fn normalize_term(text: &str) -> String {
    DiacriticFoldingCharFilter::new().filter(text).to_lowercase()
}
