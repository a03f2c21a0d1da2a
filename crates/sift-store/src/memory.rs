//! Generation-swapped in-memory index.
//!
//! Writes from the pipeline go to a pending buffer; readers only ever see
//! the active [`Generation`]. Activation builds the next generation from the
//! pending rows and replaces the active `Arc` under a short write lock, so a
//! reader observes either the complete old or the complete new generation.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use async_trait::async_trait;
use sift_core::{ActivationStats, IndexRepository, NodeRow, Result, SiftConfig, WordRow};
use sift_query::{SearchCounts, SearchOptions, SearchProvider, SearchResultRow};

use crate::generation::{Generation, GenerationData};
use crate::ranking::{PhoneticOverrides, complete, rank};
use crate::snapshot;
use crate::snippet::content_match;

#[derive(Debug, Default)]
struct Pending {
    nodes: Vec<NodeRow>,
    words: Vec<WordRow>,
    nerf_words: Vec<String>,
}

/// Sizes of the active and pending generations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Active generation number.
    pub generation: u64,
    /// Active nodes.
    pub nodes: usize,
    /// Active word rows.
    pub words: usize,
    /// Nerf words of the active generation.
    pub nerf_words: usize,
    /// Nodes waiting for activation.
    pub pending_nodes: usize,
}

/// In-memory index implementing both the write and the read contract.
pub struct MemoryIndex {
    active: RwLock<Arc<Generation>>,
    pending: Mutex<Pending>,
    snapshot_path: Option<PathBuf>,
    phonetic: PhoneticOverrides,
}

impl MemoryIndex {
    /// Empty index without persistence.
    pub fn new() -> Self {
        Self {
            active: RwLock::new(Arc::new(Generation::empty())),
            pending: Mutex::new(Pending::default()),
            snapshot_path: None,
            phonetic: PhoneticOverrides::new(),
        }
    }

    /// Index persisted to a JSON snapshot at `path`.
    ///
    /// The last activated generation is loaded when the file exists; every
    /// activation rewrites it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let generation = match snapshot::load(path)? {
            Some(data) => Generation::build(data),
            None => Generation::empty(),
        };
        Ok(Self {
            active: RwLock::new(Arc::new(generation)),
            pending: Mutex::new(Pending::default()),
            snapshot_path: Some(path.to_path_buf()),
            phonetic: PhoneticOverrides::new(),
        })
    }

    /// Open the snapshot configured in `[store]`, or an empty index.
    ///
    /// Phonetic overrides of the configured domains are applied to queries.
    pub fn from_config(config: &SiftConfig, base_dir: &Path) -> Result<Self> {
        let index = match &config.store.snapshot_path {
            Some(path) => Self::open(base_dir.join(path))?,
            None => Self::new(),
        };
        Ok(index.with_phonetic_overrides(
            config
                .domains
                .iter()
                .map(|(key, domain)| (key.clone(), domain.phonetic.clone()))
                .collect(),
        ))
    }

    /// Phonetic encoder overrides used to encode query words.
    pub fn with_phonetic_overrides(mut self, phonetic: PhoneticOverrides) -> Self {
        self.phonetic = phonetic;
        self
    }

    /// Snapshot file, if persistent.
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// The active generation.
    pub fn active(&self) -> Arc<Generation> {
        Arc::clone(&self.active.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Current sizes.
    pub fn stats(&self) -> IndexStats {
        let active = self.active();
        IndexStats {
            generation: active.number(),
            nodes: active.nodes().len(),
            words: active.word_count(),
            nerf_words: active.nerf_words().len(),
            pending_nodes: self.pending().nodes.len(),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ranked rows of the active generation for `options`.
    pub fn search(&self, options: &SearchOptions) -> Vec<SearchResultRow> {
        let generation = self.active();
        let words = options.input.required_words();
        rank(&generation, options, &self.phonetic)
            .into_iter()
            .skip(options.offset)
            .take(options.max_items)
            .map(|hit| {
                let node = &generation.nodes()[hit.node];
                SearchResultRow {
                    guid: node.guid.clone(),
                    title: node.title.clone(),
                    description: node.description.clone(),
                    url: node.url.clone(),
                    tag: node.tag.clone(),
                    language: node.scope.language.clone(),
                    timestamp: node.timestamp,
                    image: node.image.clone(),
                    content_match: content_match(
                        &node.content,
                        &words,
                        options.content_match_length,
                    ),
                    score: hit.score,
                }
            })
            .collect()
    }

    /// Match counts of the active generation for `options`.
    pub fn counts(&self, options: &SearchOptions) -> SearchCounts {
        let generation = self.active();
        let hits = rank(&generation, options, &self.phonetic);
        let mut per_tag: BTreeMap<String, usize> = BTreeMap::new();
        for hit in &hits {
            *per_tag
                .entry(generation.nodes()[hit.node].tag.clone())
                .or_default() += 1;
        }
        SearchCounts {
            total: hits.len(),
            per_tag,
        }
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryIndex")
            .field("stats", &self.stats())
            .field("snapshot_path", &self.snapshot_path)
            .finish()
    }
}

impl IndexRepository for MemoryIndex {
    fn remove_inactive_nodes(&self) -> Result<usize> {
        let mut pending = self.pending();
        let removed = pending.nodes.len();
        *pending = Pending::default();
        Ok(removed)
    }

    fn persist(&self, nodes: Vec<NodeRow>, words: Vec<WordRow>) -> Result<()> {
        let mut pending = self.pending();
        pending.nodes.extend(nodes);
        pending.words.extend(words);
        Ok(())
    }

    fn persist_nerf_words(&self, words: Vec<String>) -> Result<()> {
        self.pending().nerf_words = words;
        Ok(())
    }

    fn activate_new_and_remove_old(&self) -> Result<ActivationStats> {
        let mut pending = self.pending();
        let previous = self.active();

        let data = GenerationData {
            number: previous.number() + 1,
            nodes: std::mem::take(&mut pending.nodes),
            words: std::mem::take(&mut pending.words),
            nerf_words: std::mem::take(&mut pending.nerf_words)
                .into_iter()
                .collect::<BTreeSet<_>>(),
        };

        if let Some(path) = &self.snapshot_path
            && let Err(e) = snapshot::save(path, &data)
        {
            pending.nodes = data.nodes;
            pending.words = data.words;
            pending.nerf_words = data.nerf_words.into_iter().collect();
            return Err(sift_core::Error::persistence(format!(
                "snapshot could not be written: {e}"
            )));
        }

        let next = Generation::build(data);
        let current: HashSet<&str> = next.nodes().iter().map(|n| n.guid.as_str()).collect();
        let stats = ActivationStats {
            generation: next.number(),
            activated: next.nodes().len(),
            removed: previous
                .nodes()
                .iter()
                .filter(|n| !current.contains(n.guid.as_str()))
                .count(),
        };

        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
        log::info!(
            "Activated generation {} with {} node(s), retired {}",
            stats.generation,
            stats.activated,
            stats.removed
        );
        Ok(stats)
    }
}

#[async_trait]
impl SearchProvider for MemoryIndex {
    async fn find_search_results(&self, options: &SearchOptions) -> Result<Vec<SearchResultRow>> {
        Ok(self.search(options))
    }

    async fn find_search_counts(&self, options: &SearchOptions) -> Result<SearchCounts> {
        Ok(self.counts(options))
    }

    async fn find_autocomplete_results(
        &self,
        prefix: &str,
        options: &SearchOptions,
    ) -> Result<Vec<String>> {
        Ok(complete(&self.active(), prefix, options))
    }

    async fn find_sitemap_rows(&self, domain: &str) -> Result<Vec<NodeRow>> {
        let generation = self.active();
        Ok(generation
            .nodes()
            .iter()
            .filter(|node| node.add_to_sitemap && node.scope.domain == domain)
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// Tests
// ============================================================================
