//! Reference ranking over one generation.
//!
//! A node matches when it lies in the requested partition, passes the tag
//! filters, contains every word of every required group and does not contain
//! all words of any denied group. A required word matches literally or,
//! failing that, by phonetic code.
//!
//! Score per required word:
//!
//! | Match | Points |
//! |-------|--------|
//! | literal | occurrences, ×0.1 for nerf words, ×0.2 for stop words |
//! | keyword | +1 |
//! | phonetic only | 0.5 |
//! | in title | +3 |
//!
//! The node priority adds `priority / 100`. Ties are broken by guid so that
//! result windows of the same search never overlap.

use std::collections::{BTreeMap, HashMap};

use sift_core::NodeRow;
use sift_fts::{SoundexGenerator, tokenize};
use sift_query::SearchOptions;
use strsim::jaro_winkler;

use crate::generation::Generation;

const NERF_FACTOR: f64 = 0.1;
const STOP_WORD_FACTOR: f64 = 0.2;
const KEYWORD_BONUS: f64 = 1.0;
const PHONETIC_POINTS: f64 = 0.5;
const TITLE_BONUS: f64 = 3.0;

/// Phonetic encoder overrides: domain → language → encoder name.
pub type PhoneticOverrides = BTreeMap<String, BTreeMap<String, String>>;

/// A matching node and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Position in the generation.
    pub node: usize,
    /// Score; higher ranks first.
    pub score: f64,
}

/// Whether a row lies in the domain, site and language of the options.
pub fn in_partition(node: &NodeRow, options: &SearchOptions) -> bool {
    node.scope.domain == options.domain
        && options
            .site
            .as_deref()
            .is_none_or(|site| node.scope.site == site)
        && options
            .language
            .as_deref()
            .is_none_or(|language| node.scope.language.eq_ignore_ascii_case(language))
}

fn passes_tags(node: &NodeRow, options: &SearchOptions) -> bool {
    let input = &options.input;
    options.allows_tag(&node.tag)
        && (input.required_tags.is_empty()
            || input
                .required_tags
                .iter()
                .any(|t| t.eq_ignore_ascii_case(&node.tag)))
        && !input
            .denied_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&node.tag))
}

fn groups(raw: &[String]) -> Vec<Vec<String>> {
    raw.iter()
        .map(|group| tokenize(group))
        .filter(|words| !words.is_empty())
        .collect()
}

/// Rank the matching nodes, best first.
pub fn rank(
    generation: &Generation,
    options: &SearchOptions,
    phonetic: &PhoneticOverrides,
) -> Vec<Hit> {
    let required = groups(&options.input.required_groups);
    let denied = groups(&options.input.denied_groups);
    if required.is_empty() && options.input.required_tags.is_empty() {
        return Vec::new();
    }

    let no_overrides = BTreeMap::new();
    let overrides = phonetic.get(&options.domain).unwrap_or(&no_overrides);
    let mut encoders: HashMap<String, SoundexGenerator> = HashMap::new();

    let mut hits = Vec::new();
    for (index, node) in generation.nodes().iter().enumerate() {
        if !in_partition(node, options) || !passes_tags(node, options) {
            continue;
        }
        if denied
            .iter()
            .any(|group| group.iter().all(|word| generation.posting(word, index).is_some()))
        {
            continue;
        }

        let encoder = encoders
            .entry(node.scope.language.clone())
            .or_insert_with(|| SoundexGenerator::for_language(&node.scope.language, overrides));

        let mut score = 0.0;
        let mut matched = true;
        for word in required.iter().flatten() {
            match word_score(generation, index, word, encoder) {
                Some(points) => score += points,
                None => {
                    matched = false;
                    break;
                }
            }
        }
        if !matched {
            continue;
        }

        let title = tokenize(&node.title);
        let in_title = required
            .iter()
            .flatten()
            .filter(|w| title.contains(w))
            .count();
        score += in_title as f64 * TITLE_BONUS;
        score += f64::from(node.priority) / 100.0;
        hits.push(Hit { node: index, score });
    }

    let nodes = generation.nodes();
    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| nodes[a.node].guid.cmp(&nodes[b.node].guid))
    });
    hits
}

fn word_score(
    generation: &Generation,
    node: usize,
    word: &str,
    encoder: &SoundexGenerator,
) -> Option<f64> {
    if let Some(posting) = generation.posting(word, node) {
        let mut points = f64::from(posting.count);
        if generation.is_nerf_word(word) {
            points *= NERF_FACTOR;
        }
        if posting.stop_word {
            points *= STOP_WORD_FACTOR;
        }
        if posting.keyword {
            points += KEYWORD_BONUS;
        }
        return Some(points);
    }
    let code = encoder.encode(word);
    (!code.is_empty() && generation.has_phonetic(node, &code)).then_some(PHONETIC_POINTS)
}

/// Words completing `prefix`, best first.
///
/// Candidates are active words of the partition starting with the prefix,
/// excluding nerf and stop words. They are ordered by the number of nodes
/// containing them, then by Jaro-Winkler closeness to the prefix.
pub fn complete(generation: &Generation, prefix: &str, options: &SearchOptions) -> Vec<String> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Vec::new();
    }

    let nodes = generation.nodes();
    let mut candidates: Vec<(&str, usize)> = generation
        .words()
        .filter(|word| word.starts_with(&prefix) && !generation.is_nerf_word(word))
        .filter_map(|word| {
            let postings = generation.postings(word);
            if postings.iter().any(|p| p.stop_word) {
                return None;
            }
            let frequency = postings
                .iter()
                .filter(|p| {
                    in_partition(&nodes[p.node], options) && options.allows_tag(&nodes[p.node].tag)
                })
                .count();
            (frequency > 0).then_some((word, frequency))
        })
        .collect();

    candidates.sort_by(|(a, fa), (b, fb)| {
        fb.cmp(fa)
            .then_with(|| jaro_winkler(&prefix, b).total_cmp(&jaro_winkler(&prefix, a)))
            .then_with(|| a.cmp(b))
    });
    candidates
        .into_iter()
        .take(options.max_items)
        .map(|(word, _)| word.to_string())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
