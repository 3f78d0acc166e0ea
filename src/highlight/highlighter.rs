//! Wrapping of matched words in caller-supplied markers.

use std::collections::HashSet;

use crate::analysis::{normalize_term, word_spans};
use crate::config::HighlightConfig;
use crate::highlight::snippet;
use crate::query::MarkerPair;
use crate::ranking::ScoredDocument;

/// Highlights query tokens in document fields.
///
/// A word is highlighted when its folded, lowercased form starts with any of
/// the query tokens, so `pot` highlights `Potter` and `lodz` highlights
/// `Łódź`. The whole word is wrapped; matches from different tokens on the
/// same word produce a single marker pair.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    config: HighlightConfig,
}

impl Highlighter {
    /// Create a new highlighter.
    pub fn new(config: HighlightConfig) -> Self {
        Highlighter { config }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Split tokens into the word units the text is segmented into, so that
    /// a token like `spider-man` can still highlight `Spider` and `Man`.
    fn match_terms(tokens: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();
        for token in tokens {
            for span in word_spans(token) {
                let term = span.as_str(token);
                if seen.insert(term) {
                    terms.push(term.to_string());
                }
            }
        }
        terms
    }

    /// Wrap every word of `text` that matches a token.
    pub fn wrap(&self, text: &str, tokens: &[String], markers: &MarkerPair) -> String {
        if text.is_empty() {
            return String::new();
        }

        let terms = Self::match_terms(tokens);
        if terms.is_empty() {
            return text.to_string();
        }

        let mut output = String::with_capacity(text.len() + 16);
        let mut last = 0;

        for span in word_spans(text) {
            let word = normalize_term(span.as_str(text));
            if !terms.iter().any(|term| word.starts_with(term.as_str())) {
                continue;
            }

            output.push_str(&text[last..span.start]);
            output.push_str(&markers.start);
            output.push_str(span.as_str(text));
            output.push_str(&markers.end);
            last = span.end;
        }

        output.push_str(&text[last..]);
        output
    }

    /// Shorten a wrapped string to `max_length` plain characters.
    pub fn truncate(&self, text: &str, max_length: usize, markers: &MarkerPair) -> String {
        snippet::truncate(text, max_length, markers, &self.config)
    }

    /// Wrap, then truncate.
    pub fn snippet(
        &self,
        text: &str,
        tokens: &[String],
        markers: &MarkerPair,
        max_length: usize,
    ) -> String {
        self.truncate(&self.wrap(text, tokens, markers), max_length, markers)
    }

    /// Fill the highlighted title and description of a ranked document.
    pub fn highlight_document(
        &self,
        document: &mut ScoredDocument,
        tokens: &[String],
        markers: &MarkerPair,
    ) {
        let title = &document.document.title;
        document.highlighted_title = Some(match self.config.title_max_length {
            Some(max_length) => self.snippet(title, tokens, markers, max_length),
            None => self.wrap(title, tokens, markers),
        });

        document.highlighted_description = document
            .document
            .description
            .as_deref()
            .map(|description| {
                self.snippet(
                    description,
                    tokens,
                    markers,
                    self.config.description_max_length,
                )
            });
    }
}
