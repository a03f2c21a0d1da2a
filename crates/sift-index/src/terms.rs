//! Term extraction for a finished node.

use std::collections::{BTreeMap, HashSet};

use sift_core::{DomainConfig, IndexNode, WordRow};
use sift_fts::{NodeTermStat, SoundexGenerator, StopWordList, term_frequencies, tokenize};

/// Stop words and phonetic encoder for one (domain, language) pair.
#[derive(Debug, Clone)]
pub struct Analyzer {
    stop_words: StopWordList,
    soundex: SoundexGenerator,
}

/// Terms of one node.
#[derive(Debug, Clone, Default)]
pub struct NodeTerms {
    /// Rows to persist, one per distinct term.
    pub rows: Vec<WordRow>,
    /// Statistics fed to the term weight learner.
    pub stats: BTreeMap<String, NodeTermStat>,
}

impl Analyzer {
    /// Resolve stop words and encoder for a language of a domain.
    pub fn for_language(domain: &DomainConfig, language: &str) -> Self {
        Self {
            stop_words: StopWordList::for_language(language, &domain.stop_words),
            soundex: SoundexGenerator::for_language(language, &domain.phonetic),
        }
    }

    /// Build from explicit parts.
    pub fn new(stop_words: StopWordList, soundex: SoundexGenerator) -> Self {
        Self {
            stop_words,
            soundex,
        }
    }

    /// Stop word list.
    pub fn stop_words(&self) -> &StopWordList {
        &self.stop_words
    }

    /// Phonetic encoder.
    pub fn soundex(&self) -> &SoundexGenerator {
        &self.soundex
    }

    /// Tokenize the node text and build its word rows and statistics.
    pub fn analyze(&self, node: &IndexNode) -> NodeTerms {
        let keywords: HashSet<String> = node
            .keywords
            .iter()
            .flat_map(|keyword| tokenize(keyword))
            .collect();

        let mut terms = NodeTerms::default();
        for (word, count) in term_frequencies(&node.indexable_text()) {
            let stop_word = self.stop_words.contains(&word);
            let keyword = keywords.contains(&word);
            terms.stats.insert(
                word.clone(),
                NodeTermStat {
                    occurrences: count,
                    is_stop_word: stop_word,
                    is_keyword: keyword,
                },
            );
            terms.rows.push(WordRow {
                guid: node.guid().to_string(),
                soundex: self.soundex.encode(&word),
                word,
                count,
                stop_word,
                keyword,
            });
        }
        terms
    }
}
