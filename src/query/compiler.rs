//! Compilation of raw user input into an engine-agnostic query expression.
//!
//! Compilation never fails. Input that contains nothing searchable (only
//! whitespace or operator characters) compiles to [`CompiledQuery::Empty`],
//! which callers treat as "zero matches".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::char_filter::CharFilter;
use crate::analysis::{DiacriticFoldingCharFilter, word_spans};

/// Characters with operator meaning in ranked-match query languages.
/// `*` is the prefix marker.
pub const RESERVED_OPERATORS: [char; 7] = ['&', '|', '!', '(', ')', ':', '*'];

/// A single normalized token of a compiled query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryTerm {
    /// Lowercased, diacritic-folded token text.
    pub text: String,
    /// Match any indexed term beginning with `text`.
    pub prefix: bool,
}

impl QueryTerm {
    pub fn new<S: Into<String>>(text: S, prefix: bool) -> Self {
        QueryTerm {
            text: text.into(),
            prefix,
        }
    }

    /// Check whether an indexed term (already normalized) satisfies this term.
    pub fn matches(&self, indexed_term: &str) -> bool {
        if self.prefix {
            indexed_term.starts_with(&self.text)
        } else {
            indexed_term == self.text
        }
    }

    /// Split into the word units indexed text is segmented into.
    ///
    /// `spider-man` yields `spider` and `man`, `harry,` yields `harry`. A
    /// term made only of punctuation yields nothing.
    pub fn word_units(&self) -> Vec<QueryTerm> {
        word_spans(&self.text)
            .into_iter()
            .map(|span| QueryTerm::new(span.as_str(&self.text), self.prefix))
            .collect()
    }
}

/// The normalized representation handed to the index store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompiledQuery {
    /// Nothing searchable survived normalization.
    Empty,
    /// Every term must match.
    Conjunction(Vec<QueryTerm>),
}

impl CompiledQuery {
    pub fn is_empty(&self) -> bool {
        matches!(self, CompiledQuery::Empty)
    }

    pub fn terms(&self) -> &[QueryTerm] {
        match self {
            CompiledQuery::Empty => &[],
            CompiledQuery::Conjunction(terms) => terms,
        }
    }

    /// Token texts in query order.
    pub fn tokens(&self) -> Vec<&str> {
        self.terms().iter().map(|t| t.text.as_str()).collect()
    }

    /// Render as `harry:* & potter:*`. The empty sentinel renders as `""`.
    pub fn to_expression(&self) -> String {
        self.terms()
            .iter()
            .map(|term| {
                if term.prefix {
                    format!("{}:*", term.text)
                } else {
                    term.text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" & ")
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_expression())
    }
}

/// Turns raw query strings into [`CompiledQuery`] values.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    prefix_match: bool,
    folder: DiacriticFoldingCharFilter,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCompiler {
    /// Create a compiler with prefix matching enabled.
    pub fn new() -> Self {
        QueryCompiler {
            prefix_match: true,
            folder: DiacriticFoldingCharFilter::new(),
        }
    }

    /// Enable or disable prefix expansion of every token.
    pub fn with_prefix_match(mut self, prefix_match: bool) -> Self {
        self.prefix_match = prefix_match;
        self
    }

    pub fn prefix_match(&self) -> bool {
        self.prefix_match
    }

    /// Split, strip, fold and lowercase `raw` into its surviving tokens.
    pub fn tokenize(&self, raw: &str) -> Vec<String> {
        raw.split_whitespace()
            .filter_map(|word| {
                let stripped: String = word
                    .chars()
                    .filter(|c| !RESERVED_OPERATORS.contains(c))
                    .collect();
                if stripped.is_empty() {
                    return None;
                }

                // Folding can only shrink a token to nothing if it was all
                // combining marks.
                let folded = self.folder.filter(&stripped).to_lowercase();
                if folded.is_empty() { None } else { Some(folded) }
            })
            .collect()
    }

    /// Compile `raw` into a conjunctive expression.
    pub fn compile(&self, raw: &str) -> CompiledQuery {
        let tokens = self.tokenize(raw);
        if tokens.is_empty() {
            return CompiledQuery::Empty;
        }

        CompiledQuery::Conjunction(
            tokens
                .into_iter()
                .map(|text| QueryTerm::new(text, self.prefix_match))
                .collect(),
        )
    }
}
