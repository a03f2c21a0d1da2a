//! Corpus-wide term statistics and nerf-word classification.
//!
//! A nerf word is a term so common across the indexed corpus that ranking
//! should weigh it down: navigation labels, legal boilerplate, the site name.
//! The learner accumulates per-term statistics node by node during one
//! indexing run, merges near-duplicate spellings, and classifies the buckets
//! sitting far above the corpus median.
//!
//! A learner belongs to exactly one run. Create it fresh (or [`flush`] it)
//! before walking records.
//!
//! [`flush`]: TermWeightLearner::flush

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::similarity::{max_similarity, similarity};

/// Keys this short are never merged.
pub const MIN_MERGE_LENGTH: usize = 4;

/// Similarity a short key must exceed to merge.
pub const MERGE_THRESHOLD: f64 = 98.0;

/// Similarity a key longer than [`LONG_KEY_LENGTH`] must exceed to merge.
pub const LONG_MERGE_THRESHOLD: f64 = 93.0;

/// Keys longer than this use [`LONG_MERGE_THRESHOLD`].
pub const LONG_KEY_LENGTH: usize = 5;

/// A bucket must exceed this multiple of the median occurrences.
pub const OCCURRENCE_FACTOR: f64 = 5.0;

/// A bucket must exceed this multiple of the median node count.
pub const NODE_COUNT_FACTOR: f64 = 8.0;

/// Statistics for one term within one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTermStat {
    /// Occurrences of the term in the node.
    pub occurrences: u32,
    /// The term is a stop word for the node's language.
    pub is_stop_word: bool,
    /// The term is one of the node's keywords.
    pub is_keyword: bool,
}

/// Aggregate statistics for one term (or a merged group of spellings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermStat {
    /// Nodes containing the term.
    pub node_count: u64,
    /// Total occurrences across all nodes.
    pub occurrences: u64,
    /// Literal spellings folded into this statistic.
    pub spellings: Vec<String>,
}

impl TermStat {
    fn absorb(&mut self, other: &TermStat) {
        self.node_count += other.node_count;
        self.occurrences += other.occurrences;
        self.spellings.extend(other.spellings.iter().cloned());
    }
}

/// Learns term statistics for one indexing run.
#[derive(Debug, Default)]
pub struct TermWeightLearner {
    order: Vec<String>,
    stats: HashMap<String, TermStat>,
}

impl TermWeightLearner {
    /// Create an empty learner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the term statistics of one node.
    pub fn learn(&mut self, terms: &BTreeMap<String, NodeTermStat>) {
        for (term, stat) in terms {
            if stat.is_stop_word || stat.is_keyword || stat.occurrences == 0 {
                continue;
            }
            match self.stats.get_mut(term) {
                Some(existing) => {
                    existing.node_count += 1;
                    existing.occurrences += u64::from(stat.occurrences);
                }
                None => {
                    self.order.push(term.clone());
                    self.stats.insert(
                        term.clone(),
                        TermStat {
                            node_count: 1,
                            occurrences: u64::from(stat.occurrences),
                            spellings: vec![term.clone()],
                        },
                    );
                }
            }
        }
    }

    /// Forget everything learned so far.
    pub fn flush(&mut self) {
        self.order.clear();
        self.stats.clear();
    }

    /// Number of distinct terms learned.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing was learned yet.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Statistics of a single, unmerged term.
    pub fn stat(&self, term: &str) -> Option<&TermStat> {
        self.stats.get(term)
    }

    /// Buckets after near-duplicate merging, in first-seen order.
    ///
    /// Each key is compared to the buckets built so far and folded into the
    /// most similar one above the threshold. Among equally similar buckets
    /// the earliest wins.
    pub fn merged(&self) -> Vec<(String, TermStat)> {
        let mut buckets: Vec<(String, TermStat)> = Vec::with_capacity(self.order.len());

        for key in &self.order {
            let Some(stat) = self.stats.get(key) else {
                continue;
            };

            let target = merge_target(key, &buckets);
            match target {
                Some(index) => buckets[index].1.absorb(stat),
                None => buckets.push((key.clone(), stat.clone())),
            }
        }

        buckets
    }

    /// Terms judged over-common for the learned corpus.
    pub fn classify(&self) -> impl Iterator<Item = String> {
        let buckets = self.merged();
        let median_occurrences = median(buckets.iter().map(|(_, s)| s.occurrences));
        let median_nodes = median(buckets.iter().map(|(_, s)| s.node_count));

        log::debug!(
            "Classifying {} term buckets (median occurrences {}, median nodes {})",
            buckets.len(),
            median_occurrences,
            median_nodes
        );

        buckets
            .into_iter()
            .filter(move |(_, stat)| {
                stat.occurrences as f64 > OCCURRENCE_FACTOR * median_occurrences
                    && stat.node_count as f64 > NODE_COUNT_FACTOR * median_nodes
            })
            .flat_map(|(_, stat)| stat.spellings)
    }
}

fn merge_target(key: &str, buckets: &[(String, TermStat)]) -> Option<usize> {
    let key_len = key.chars().count();
    if key_len < MIN_MERGE_LENGTH {
        return None;
    }
    let threshold = if key_len > LONG_KEY_LENGTH {
        LONG_MERGE_THRESHOLD
    } else {
        MERGE_THRESHOLD
    };

    let mut best: Option<(usize, f64)> = None;
    for (index, (bucket_key, _)) in buckets.iter().enumerate() {
        let bucket_len = bucket_key.chars().count();
        if bucket_len < MIN_MERGE_LENGTH || max_similarity(key_len, bucket_len) <= threshold {
            continue;
        }
        let score = similarity(key, bucket_key);
        if score > threshold && best.is_none_or(|(_, s)| score > s) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

/// Median of a sequence; the mean of the two middle values for even counts.
pub fn median(values: impl Iterator<Item = u64>) -> f64 {
    let mut values: Vec<u64> = values.collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] as f64 + values[mid] as f64) / 2.0
    } else {
        values[mid] as f64
    }
}

// ============================================================================
// Tests
// ============================================================================
