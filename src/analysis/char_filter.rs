//! Char filter implementations for text normalization.
//!
//! Char filters rewrite a string before it is split into words.
//!
//! # Available Filters
//!
//! - [`diacritic_folding::DiacriticFoldingCharFilter`] - fold accented and stroked letters to base Latin

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod diacritic_folding;
