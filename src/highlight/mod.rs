//! Highlighting of matched words and marker-safe snippet truncation.

pub mod highlighter;
pub mod snippet;

pub use self::highlighter::Highlighter;
pub use self::snippet::{plain_text, plain_text_len, truncate};
