//! Natural-language name comparison
//!
//! Names are compared the way a person reading a recipe list would: case and
//! diacritics do not matter ("Crème" and "creme" are the same name). Text is
//! decomposed first so precomposed and combining-mark spellings agree, then
//! folded with nucleo's character tables so that search and uniqueness agree.

use nucleo_matcher::chars;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a string to its comparison key (diacritics stripped, lowercased)
pub fn fold(s: &str) -> String {
    s.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| chars::to_lower_case(chars::normalize(c)))
        .collect()
}

/// Two names are equivalent when their folded keys are equal
pub fn equivalent(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

/// Case/diacritic-insensitive containment. An empty needle matches everything.
pub fn contains(haystack: &str, needle: &str) -> bool {
    let needle = fold(needle);
    needle.is_empty() || fold(haystack).contains(&needle)
}

/// Ordering for name listings: folded key first, raw text as a tie-breaker
pub fn compare(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_case_and_diacritics() {
        assert_eq!(fold("Crème Brûlée"), "creme brulee");
        assert_eq!(fold("  SALT "), "salt");
    }

    #[test]
    fn test_fold_decomposed_input() {
        assert_eq!(fold("Cre\u{300}me frai\u{302}che"), "creme fraiche");
        assert!(equivalent("Crème fraîche", "Cre\u{300}me frai\u{302}che"));
        assert!(contains("Cre\u{300}me", "creme"));
        assert!(contains("Crème", "cre\u{300}me"));
    }

    #[test]
    fn test_equivalent() {
        assert!(equivalent("Jalapeño", "jalapeno"));
        assert!(equivalent("Salt", "salt"));
        assert!(!equivalent("Salt", "Sugar"));
    }

    #[test]
    fn test_contains() {
        assert!(contains("Crème fraîche", "FRAICHE"));
        assert!(contains("Tiramisu", ""));
        assert!(!contains("Tiramisu", "cake"));
    }

    #[test]
    fn test_compare_orders_case_insensitively() {
        let mut names = vec!["banana", "Apple", "éclair", "cherry"];
        names.sort_by(|a, b| compare(a, b));
        assert_eq!(names, vec!["Apple", "banana", "cherry", "éclair"]);
    }
}
