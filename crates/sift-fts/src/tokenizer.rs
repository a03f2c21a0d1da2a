//! Word extraction.
//!
//! Splits text on every non-alphanumeric character (Unicode aware),
//! lowercases, and drops single-character fragments.

use std::collections::BTreeMap;

/// Shortest word kept by the tokenizer.
pub const MIN_WORD_LENGTH: usize = 2;

/// Split text into lowercase words.
///
/// ```
/// use sift_fts::tokenizer::tokenize;
///
/// assert_eq!(tokenize("Größe & Maß: 42cm!"), vec!["größe", "maß", "42cm"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    words(text).collect()
}

/// Lazily split text into lowercase words.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_WORD_LENGTH)
        .map(str::to_lowercase)
}

/// Count occurrences of each word, ordered by word.
pub fn term_frequencies(text: &str) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for word in words(text) {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("Hello, World"), vec!["hello", "world"]);
    }

    #[test]
    fn test_tokenize_drops_single_chars() {
        assert_eq!(tokenize("a b cd"), vec!["cd"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" -- !! ").is_empty());
    }

    #[test]
    fn test_tokenize_hyphenated_words_split() {
        assert_eq!(tokenize("full-text"), vec!["full", "text"]);
    }

    #[test]
    fn test_term_frequencies() {
        let counts = term_frequencies("the cat and the hat");
        assert_eq!(counts["the"], 2);
        assert_eq!(counts["cat"], 1);
        assert_eq!(counts.keys().next().map(String::as_str), Some("and"));
    }
}
