//! Per-language stop word lists.
//!
//! Stop words are not removed from the index; they are flagged on the stored
//! word rows so ranking can weigh them down, and they are never candidates for
//! nerf-word classification.
//!
//! A list is resolved per language code in this order:
//!
//! 1. a search-domain override (`[domains.<key>.stop_words]`)
//! 2. the built-in table (backed by the `stop-words` crate) for the ISO code
//! 3. an empty list
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use sift_fts::stopwords::StopWordList;
//!
//! let list = StopWordList::for_language("en", &BTreeMap::new());
//! assert!(list.contains("the"));
//! assert!(!list.contains("cadence"));
//!
//! let unknown = StopWordList::for_language("tlh", &BTreeMap::new());
//! assert!(unknown.is_empty());
//! ```

use std::collections::{BTreeMap, HashSet};

use stop_words::{get, LANGUAGE};

/// Stop word list for one language.
#[derive(Clone)]
pub struct StopWordList {
    language: String,
    words: HashSet<String>,
}

impl StopWordList {
    /// Resolve the list for a language code.
    pub fn for_language(code: &str, overrides: &BTreeMap<String, Vec<String>>) -> Self {
        let code = code.to_lowercase();
        if let Some(words) = overrides.get(&code) {
            log::debug!("Using {} overridden stop words for '{code}'", words.len());
            return Self::from_words(&code, words);
        }
        Self::builtin(&code).unwrap_or_else(|| Self::empty(&code))
    }

    /// The built-in list for an ISO 639-1 code, if one ships with Sift.
    pub fn builtin(code: &str) -> Option<Self> {
        let language = match code {
            "en" => LANGUAGE::English,
            "de" => LANGUAGE::German,
            "fr" => LANGUAGE::French,
            "es" => LANGUAGE::Spanish,
            "it" => LANGUAGE::Italian,
            "nl" => LANGUAGE::Dutch,
            "pt" => LANGUAGE::Portuguese,
            _ => return None,
        };
        let words = get(language).iter().map(|s| s.to_lowercase()).collect();
        Some(Self {
            language: code.to_string(),
            words,
        })
    }

    /// A list with the given words.
    pub fn from_words<I, S>(code: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            language: code.to_string(),
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// A list matching nothing.
    pub fn empty(code: &str) -> Self {
        Self {
            language: code.to_string(),
            words: HashSet::new(),
        }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, term: &str) -> bool {
        if self.words.is_empty() {
            return false;
        }
        self.words.contains(&term.to_lowercase())
    }

    /// Remove stop words from a list of terms.
    ///
    /// If every term is a stop word the input is returned unchanged, so a
    /// query made only of stop words still searches for something.
    pub fn filter_terms(&self, terms: &[String]) -> Vec<String> {
        let kept: Vec<String> = terms
            .iter()
            .filter(|t| !self.contains(t))
            .cloned()
            .collect();
        if kept.is_empty() {
            terms.to_vec()
        } else {
            kept
        }
    }

    /// Language code the list was resolved for.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Number of words in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl std::fmt::Debug for StopWordList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopWordList")
            .field("language", &self.language)
            .field("stopword_count", &self.words.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
