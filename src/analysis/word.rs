//! Word segmentation and whitespace canonicalization.
//!
//! Words are located with the Unicode word boundary rules (UAX #29), so
//! punctuation and whitespace never end up inside a word span and accented
//! letters stay part of the word they belong to.
//!
//! # Examples
//!
//! ```
//! use folio::analysis::word::{canonicalize_whitespace, word_spans};
//!
//! assert_eq!(canonicalize_whitespace("  Harry   potter "), "Harry potter");
//!
//! let spans = word_spans("café, résumé!");
//! assert_eq!(spans.len(), 2);
//! assert_eq!(spans[1].as_str("café, résumé!"), "résumé");
//! ```

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// Byte range of one word within a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
}

impl WordSpan {
    pub fn new(start: usize, end: usize) -> Self {
        WordSpan { start, end }
    }

    /// The slice of `text` this span covers.
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Locate every word in `text`.
pub fn word_spans(text: &str) -> Vec<WordSpan> {
    text.unicode_word_indices()
        .map(|(start, word)| WordSpan::new(start, start + word.len()))
        .collect()
}

/// Trim and collapse every run of whitespace into a single space.
pub fn canonicalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
