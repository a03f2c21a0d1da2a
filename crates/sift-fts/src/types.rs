//! Common types for the text analysis modules.

use serde::{Deserialize, Serialize};

use crate::tokenizer::tokenize;

/// Structured form of a raw search query.
///
/// Produced by [`crate::lexer::parse`]. Word groups are phrases: every word
/// of a required group must co-occur in a matching node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInput {
    /// The query as typed.
    pub original: String,
    /// Groups that must match, in query order.
    pub required_groups: Vec<String>,
    /// Groups that must not match, in query order.
    pub denied_groups: Vec<String>,
    /// Tags a result must carry.
    pub required_tags: Vec<String>,
    /// Tags a result must not carry.
    pub denied_tags: Vec<String>,
    /// Most recently completed group of any kind.
    pub last_group: Option<String>,
}

impl ParsedInput {
    /// True when the query carries no predicate at all.
    pub fn is_empty(&self) -> bool {
        self.required_groups.is_empty()
            && self.denied_groups.is_empty()
            && self.required_tags.is_empty()
            && self.denied_tags.is_empty()
    }

    /// Tokenized words of every required group, in order, deduplicated.
    pub fn required_words(&self) -> Vec<String> {
        words_of(&self.required_groups)
    }

    /// Tokenized words of every denied group, in order, deduplicated.
    pub fn denied_words(&self) -> Vec<String> {
        words_of(&self.denied_groups)
    }
}

fn words_of(groups: &[String]) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for group in groups {
        for word in tokenize(group) {
            if !words.contains(&word) {
                words.push(word);
            }
        }
    }
    words
}

// ============================================================================
// Tests
// ============================================================================
