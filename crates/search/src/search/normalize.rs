//! Case and accent folding for text matching.
//!
//! Both repositories fold text through these functions so that
//! `PatternContains` behaves identically in memory and in SQLite.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Lowercases and strips diacritics (NFKD, combining marks removed).
///
/// ```
/// use civica_search::search::normalize::fold_text;
///
/// assert_eq!(fold_text("México"), "mexico");
/// assert_eq!(fold_text("PEÑA"), "pena");
/// ```
pub fn fold_text(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercases without touching diacritics.
pub fn fold_case(input: &str) -> String {
    input.chars().flat_map(char::to_lowercase).collect()
}

/// Folds `input` according to `accent_insensitive`.
pub fn fold(input: &str, accent_insensitive: bool) -> String {
    if accent_insensitive {
        fold_text(input)
    } else {
        fold_case(input)
    }
}

/// Case-insensitive substring test, optionally ignoring diacritics.
pub fn contains_folded(haystack: &str, needle: &str, accent_insensitive: bool) -> bool {
    fold(haystack, accent_insensitive).contains(&fold(needle, accent_insensitive))
}
