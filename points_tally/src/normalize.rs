//! Folding of free-text titles into comparable keys.

use unicode_normalization::UnicodeNormalization;

/// Canonical composition (NFC), without surrounding whitespace.
pub fn normalize_unicode(s: &str) -> String {
    s.nfc().collect::<String>().trim().to_string()
}

fn fold_char(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{2032}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
        '\u{00A0}' => ' ',
        _ => c,
    }
}

/// Replaces the typographic variants of quotes, dashes and spaces by their
/// plain equivalents, and collapses the runs of whitespace.
pub fn fold_punctuation(s: &str) -> String {
    let folded: String = s.chars().map(fold_char).collect();
    folded.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// The lookup key of a title. Two titles are the same if their keys are equal.
///
/// ```
/// use points_tally::normalize::norm_key;
///
/// assert_eq!(norm_key("  Baldur\u{2019}s   Gate "), norm_key("baldur's gate"));
/// ```
pub fn norm_key(s: &str) -> String {
    fold_punctuation(&normalize_unicode(s)).to_lowercase()
}
