//! Mutable state of one indexing run.
//!
//! A [`RunState`] is created fresh for every run and dropped at its end, so
//! term statistics, sitemap buckets and buffered rows never leak from one run
//! into the next.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sift_core::{DomainConfig, Error, IndexRepository, NodeRow, Result, SiftConfig, WordRow};
use sift_fts::TermWeightLearner;
use sift_sitemap::{SitemapAccumulator, SitemapFiles};

use crate::hooks::IndexerHooks;
use crate::logger::IndexLogger;
use crate::request::QueueRequest;
use crate::terms::Analyzer;

/// Counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Nodes converted and buffered.
    pub nodes_indexed: usize,
    /// Records that failed to read or convert.
    pub records_failed: usize,
    /// Records skipped by the `before_convert` hook.
    pub records_skipped: usize,
    /// Word rows written.
    pub words_persisted: usize,
    /// Repository writes.
    pub batches: usize,
}

/// Per-run state shared by the pipeline stages.
pub struct RunState {
    repository: Arc<dyn IndexRepository>,
    hooks: Arc<dyn IndexerHooks>,
    batch_size: usize,
    sitemap_enabled: bool,
    today: NaiveDate,
    learner: TermWeightLearner,
    sitemap: SitemapAccumulator,
    sitemap_files: SitemapFiles,
    logger: IndexLogger,
    analyzers: HashMap<(String, String), Arc<Analyzer>>,
    pending_nodes: Vec<NodeRow>,
    pending_words: Vec<WordRow>,
    stats: RunStats,
}

impl RunState {
    /// Fresh state for a run over `config`.
    pub fn new(
        config: &SiftConfig,
        repository: Arc<dyn IndexRepository>,
        hooks: Arc<dyn IndexerHooks>,
    ) -> Self {
        Self {
            repository,
            hooks,
            batch_size: config.indexer.batch_size.max(1),
            sitemap_enabled: config.sitemap.enabled,
            today: config
                .indexer
                .today
                .unwrap_or_else(|| Utc::now().date_naive()),
            learner: TermWeightLearner::new(),
            sitemap: SitemapAccumulator::from_settings(&config.sitemap),
            sitemap_files: SitemapFiles::default(),
            logger: IndexLogger::new(),
            analyzers: HashMap::new(),
            pending_nodes: Vec::new(),
            pending_words: Vec::new(),
            stats: RunStats::default(),
        }
    }

    /// Date priority decay is measured against.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Registered hooks.
    pub fn hooks(&self) -> Arc<dyn IndexerHooks> {
        Arc::clone(&self.hooks)
    }

    /// Whether sitemap collection is on.
    pub fn sitemap_enabled(&self) -> bool {
        self.sitemap_enabled
    }

    /// Sitemap accumulator.
    pub fn sitemap(&self) -> &SitemapAccumulator {
        &self.sitemap
    }

    /// Mutable sitemap accumulator.
    pub fn sitemap_mut(&mut self) -> &mut SitemapAccumulator {
        &mut self.sitemap
    }

    /// Render the accumulated sitemap, running the `before_sitemap` hook.
    pub fn generate_sitemap(&mut self) {
        self.hooks.before_sitemap(&mut self.sitemap);
        self.sitemap_files = self.sitemap.generate();
    }

    /// Files rendered by [`Self::generate_sitemap`].
    pub fn take_sitemap_files(&mut self) -> SitemapFiles {
        std::mem::take(&mut self.sitemap_files)
    }

    /// Term weight learner of this run.
    pub fn learner(&self) -> &TermWeightLearner {
        &self.learner
    }

    /// Mutable term weight learner.
    pub fn learner_mut(&mut self) -> &mut TermWeightLearner {
        &mut self.learner
    }

    /// Indexer log.
    pub fn logger(&self) -> &IndexLogger {
        &self.logger
    }

    /// Mutable indexer log.
    pub fn logger_mut(&mut self) -> &mut IndexLogger {
        &mut self.logger
    }

    /// Counters.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Mutable counters.
    pub fn stats_mut(&mut self) -> &mut RunStats {
        &mut self.stats
    }

    /// Analyzer for a language of a domain, cached for the run.
    pub fn analyzer(
        &mut self,
        domain_key: &str,
        domain: &DomainConfig,
        language: &str,
    ) -> Arc<Analyzer> {
        let key = (domain_key.to_string(), language.to_string());
        Arc::clone(
            self.analyzers
                .entry(key)
                .or_insert_with(|| Arc::new(Analyzer::for_language(domain, language))),
        )
    }

    /// Buffer a node row with its word rows, writing a batch when full.
    pub fn buffer(&mut self, node: NodeRow, words: Vec<WordRow>) -> Result<()> {
        self.pending_nodes.push(node);
        self.pending_words.extend(words);
        if self.pending_nodes.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Write buffered rows.
    pub fn flush(&mut self) -> Result<()> {
        if self.pending_nodes.is_empty() && self.pending_words.is_empty() {
            return Ok(());
        }
        let nodes = std::mem::take(&mut self.pending_nodes);
        let words = std::mem::take(&mut self.pending_words);
        let (node_count, word_count) = (nodes.len(), words.len());

        self.repository
            .persist(nodes, words)
            .map_err(into_persistence)?;

        self.stats.words_persisted += word_count;
        self.stats.batches += 1;
        log::debug!("Persisted batch of {node_count} node(s), {word_count} word(s)");
        Ok(())
    }

    /// Contain a non-fatal failure of one scope value.
    ///
    /// Fatal errors are passed through; anything else is logged with the
    /// tags of `request` and swallowed so siblings keep running.
    pub fn isolate(
        &mut self,
        request: &QueueRequest,
        result: Result<()>,
        context: &str,
    ) -> Result<()> {
        match result {
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                self.logger.error(request, format!("{context}: {e}"));
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }
}

impl std::fmt::Debug for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunState")
            .field("batch_size", &self.batch_size)
            .field("today", &self.today)
            .field("pending_nodes", &self.pending_nodes.len())
            .field("errors", &self.logger.error_count())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Classify a repository failure as fatal.
pub(crate) fn into_persistence(error: Error) -> Error {
    if matches!(error, Error::Persistence { .. }) {
        error
    } else {
        Error::persistence(error.to_string())
    }
}
