//! Trigram similarity.
//!
//! Each word is lowercased and padded with two spaces in front and one behind,
//! then cut into overlapping three-character windows. The similarity of two
//! strings is the size of the intersection of their trigram sets divided by
//! the size of the union, so identical strings score `1.0` and strings with no
//! trigram in common score `0.0`.

use ahash::AHashSet;

/// Collect the trigram set of `text`.
pub fn trigrams(text: &str) -> AHashSet<String> {
    let mut set = AHashSet::new();

    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = "  "
            .chars()
            .chain(word.to_lowercase().chars())
            .chain(std::iter::once(' '))
            .collect();

        for window in padded.windows(3) {
            set.insert(window.iter().collect());
        }
    }

    set
}

/// Similarity of two strings in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f32 {
    let left = trigrams(a);
    let right = trigrams(b);

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;

    shared as f32 / union as f32
}
