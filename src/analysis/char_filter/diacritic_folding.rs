use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::CharFilter;

/// A char filter that folds diacritic-bearing letters to their base Latin form.
///
/// Letters that carry a combining accent are decomposed (NFD) and the marks
/// dropped. Letters whose diacritic is part of the glyph itself (a stroke, a
/// bar, a ligature) have no decomposition, so they go through a fixed table:
/// `ł` folds to `l`, `ø` to `o`, `æ` to `ae`, `ß` to `ss` and so on. Case is
/// preserved; lowercasing is a separate step.
#[derive(Clone, Debug, Default)]
pub struct DiacriticFoldingCharFilter;

impl DiacriticFoldingCharFilter {
    pub fn new() -> Self {
        DiacriticFoldingCharFilter
    }

    fn fold_undecomposable(c: char) -> Option<&'static str> {
        let folded = match c {
            'ł' => "l",
            'Ł' => "L",
            'ŀ' => "l",
            'Ŀ' => "L",
            'đ' | 'ð' => "d",
            'Đ' | 'Ð' => "D",
            'ø' => "o",
            'Ø' => "O",
            'ħ' => "h",
            'Ħ' => "H",
            'ŧ' => "t",
            'Ŧ' => "T",
            'ı' => "i",
            'ƚ' => "l",
            'ß' => "ss",
            'ẞ' => "SS",
            'æ' => "ae",
            'Æ' => "AE",
            'œ' => "oe",
            'Œ' => "OE",
            'þ' => "th",
            'Þ' => "TH",
            _ => return None,
        };
        Some(folded)
    }
}

impl CharFilter for DiacriticFoldingCharFilter {
    fn filter(&self, input: &str) -> String {
        if input.is_ascii() {
            return input.to_string();
        }

        let mut output = String::with_capacity(input.len());
        for c in input.nfd().filter(|c| !is_combining_mark(*c)) {
            match Self::fold_undecomposable(c) {
                Some(folded) => output.push_str(folded),
                None => output.push(c),
            }
        }
        output
    }

    fn name(&self) -> &'static str {
        "diacritic_folding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combining_accents() {
        let filter = DiacriticFoldingCharFilter::new();
        assert_eq!(filter.filter("Amélie"), "Amelie");
        assert_eq!(filter.filter("ąęśćżźń"), "aesczzn");
        // decomposed input folds the same way as composed input
        assert_eq!(filter.filter("Am\u{0065}\u{0301}lie"), "Amelie");
    }

    #[test]
    fn test_stroked_letters() {
        let filter = DiacriticFoldingCharFilter::new();
        assert_eq!(filter.filter("Łódź"), "Lodz");
        assert_eq!(filter.filter("Ørsted"), "Orsted");
        assert_eq!(filter.filter("Đorđe"), "Dorde");
    }

    #[test]
    fn test_ligatures() {
        let filter = DiacriticFoldingCharFilter::new();
        assert_eq!(filter.filter("Æsop"), "AEsop");
        assert_eq!(filter.filter("cœur"), "coeur");
        assert_eq!(filter.filter("Straße"), "Strasse");
    }

    #[test]
    fn test_ascii_untouched() {
        let filter = DiacriticFoldingCharFilter::new();
        assert_eq!(filter.filter("Harry Potter"), "Harry Potter");
        assert_eq!(filter.filter(""), "");
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(DiacriticFoldingCharFilter::new().name(), "diacritic_folding");
    }
}
