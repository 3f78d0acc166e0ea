//! Marker-aware snippet truncation.
//!
//! Truncation runs in two passes over the marker-wrapped text. The first pass
//! measures the plain text (markers excluded) and picks the cut position; the
//! second copies the input up to that position, passing markers through
//! verbatim and closing a marker pair left open by the cut. The output
//! therefore never contains half a marker or an unbalanced pair.
//!
//! ```
//! use folio::config::HighlightConfig;
//! use folio::highlight::truncate;
//! use folio::query::MarkerPair;
//!
//! let markers = MarkerPair::new("[", "]");
//! let snippet = truncate("a [quick] brown fox", 7, &markers, &HighlightConfig::default());
//! assert_eq!(snippet, "a [quick]...");
//! ```

use crate::config::HighlightConfig;
use crate::query::MarkerPair;

/// One unit of a marker-wrapped string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Start(&'a str),
    End(&'a str),
    Char(char),
}

/// Walks a marker-wrapped string, yielding markers whole and text one char at a time.
struct Segments<'a, 'm> {
    rest: &'a str,
    start: &'m str,
    end: &'m str,
}

impl<'a, 'm> Segments<'a, 'm> {
    fn new(text: &'a str, markers: &'m MarkerPair) -> Self {
        Segments {
            rest: text,
            start: &markers.start,
            end: &markers.end,
        }
    }

    fn take(&mut self, len: usize) -> &'a str {
        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        head
    }
}

impl<'a> Iterator for Segments<'a, '_> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Empty markers would match everywhere; they are treated as absent.
        if !self.start.is_empty() && self.rest.starts_with(self.start) {
            return Some(Segment::Start(self.take(self.start.len())));
        }
        if !self.end.is_empty() && self.rest.starts_with(self.end) {
            return Some(Segment::End(self.take(self.end.len())));
        }

        let c = self.rest.chars().next()?;
        self.take(c.len_utf8());
        Some(Segment::Char(c))
    }
}

/// Text with every marker removed.
pub fn plain_text(text: &str, markers: &MarkerPair) -> String {
    Segments::new(text, markers)
        .filter_map(|segment| match segment {
            Segment::Char(c) => Some(c),
            _ => None,
        })
        .collect()
}

/// Number of characters outside markers.
pub fn plain_text_len(text: &str, markers: &MarkerPair) -> usize {
    Segments::new(text, markers)
        .filter(|segment| matches!(segment, Segment::Char(_)))
        .count()
}

/// Cut position in plain-text characters.
///
/// The nearest whitespace at or before `max_length` wins when it lies no
/// earlier than `ratio * max_length`; otherwise the cut is exactly at the
/// limit. Whitespace left in front of the cut is dropped.
fn cutoff(plain: &[char], max_length: usize, ratio: f64) -> usize {
    let boundary = plain[..=max_length.min(plain.len() - 1)]
        .iter()
        .rposition(|c| c.is_whitespace());

    let mut cut = match boundary {
        Some(pos) if pos as f64 >= max_length as f64 * ratio => pos,
        _ => max_length,
    };

    while cut > 0 && plain[cut - 1].is_whitespace() {
        cut -= 1;
    }
    cut
}

/// Shorten a marker-wrapped string to at most `max_length` plain characters.
///
/// Strings that already fit are returned unchanged. Otherwise the cut text is
/// followed by the configured ellipsis, which does not count towards the limit.
pub fn truncate(
    text: &str,
    max_length: usize,
    markers: &MarkerPair,
    config: &HighlightConfig,
) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Pass 1: measure.
    let plain: Vec<char> = plain_text(text, markers).chars().collect();
    if plain.len() <= max_length {
        return text.to_string();
    }
    let cut = cutoff(&plain, max_length, config.word_boundary_ratio);

    // Pass 2: copy with marker passthrough.
    let mut output = String::with_capacity(text.len().min(cut * 4) + config.ellipsis.len());
    let mut copied = 0;
    let mut open = false;

    for segment in Segments::new(text, markers) {
        match segment {
            Segment::Char(c) => {
                if copied == cut {
                    break;
                }
                output.push(c);
                copied += 1;
            }
            Segment::Start(marker) => {
                if copied == cut {
                    break;
                }
                output.push_str(marker);
                open = true;
            }
            Segment::End(marker) => {
                output.push_str(marker);
                open = false;
            }
        }
    }

    if open {
        output.push_str(&markers.end);
    }
    output.push_str(&config.ellipsis);
    output
}
