//! One immutable set of index rows.
//!
//! A [`Generation`] is built once, when pending rows are activated or a
//! snapshot is loaded, and never changes afterwards. Readers share it through
//! an `Arc`, so a swap never disturbs a search that is already running.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use sift_core::{NodeRow, WordRow};

/// Occurrence of a word in one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Position of the node in [`Generation::nodes`].
    pub node: usize,
    /// Occurrences in the node.
    pub count: u32,
    /// Stop word in the node language.
    pub stop_word: bool,
    /// Keyword of the node.
    pub keyword: bool,
}

/// Serialized form of a generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationData {
    /// Generation number.
    pub number: u64,
    /// Node rows.
    pub nodes: Vec<NodeRow>,
    /// Word rows.
    pub words: Vec<WordRow>,
    /// Terms classified as too common to rank on.
    #[serde(default)]
    pub nerf_words: BTreeSet<String>,
}

/// An immutable, indexed generation.
#[derive(Debug, Default)]
pub struct Generation {
    data: GenerationData,
    positions: HashMap<String, usize>,
    postings: HashMap<String, Vec<Posting>>,
    phonetic: HashMap<(usize, String), Vec<String>>,
}

impl Generation {
    /// Index the rows of a generation.
    ///
    /// Duplicate node guids keep their first row; word rows of unknown
    /// nodes are dropped.
    pub fn build(mut data: GenerationData) -> Self {
        let mut seen = HashSet::new();
        data.nodes.retain(|node| seen.insert(node.guid.clone()));

        let positions: HashMap<String, usize> = data
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.guid.clone(), index))
            .collect();

        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut phonetic: HashMap<(usize, String), Vec<String>> = HashMap::new();
        let mut dropped = 0usize;
        data.words.retain(|row| {
            let Some(&node) = positions.get(&row.guid) else {
                dropped += 1;
                return false;
            };
            postings.entry(row.word.clone()).or_default().push(Posting {
                node,
                count: row.count,
                stop_word: row.stop_word,
                keyword: row.keyword,
            });
            if !row.soundex.is_empty() {
                phonetic
                    .entry((node, row.soundex.clone()))
                    .or_default()
                    .push(row.word.clone());
            }
            true
        });
        if dropped > 0 {
            log::warn!("Dropped {dropped} word row(s) without a node");
        }

        Self {
            data,
            positions,
            postings,
            phonetic,
        }
    }

    /// Empty generation 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Generation number; 0 before the first activation.
    pub fn number(&self) -> u64 {
        self.data.number
    }

    /// Node rows.
    pub fn nodes(&self) -> &[NodeRow] {
        &self.data.nodes
    }

    /// Number of word rows.
    pub fn word_count(&self) -> usize {
        self.data.words.len()
    }

    /// Node by guid.
    pub fn node(&self, guid: &str) -> Option<&NodeRow> {
        self.positions
            .get(guid)
            .map(|&index| &self.data.nodes[index])
    }

    /// Postings of a word.
    pub fn postings(&self, word: &str) -> &[Posting] {
        self.postings
            .get(word)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Posting of a word in one node.
    pub fn posting(&self, word: &str, node: usize) -> Option<&Posting> {
        self.postings(word).iter().find(|p| p.node == node)
    }

    /// Whether a node carries a word with the given phonetic code.
    pub fn has_phonetic(&self, node: usize, code: &str) -> bool {
        self.phonetic.contains_key(&(node, code.to_string()))
    }

    /// All indexed words.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// Whether a term is a nerf word.
    pub fn is_nerf_word(&self, word: &str) -> bool {
        self.data.nerf_words.contains(word)
    }

    /// Nerf words.
    pub fn nerf_words(&self) -> &BTreeSet<String> {
        &self.data.nerf_words
    }

    /// Serialized form.
    pub fn data(&self) -> &GenerationData {
        &self.data
    }
}
