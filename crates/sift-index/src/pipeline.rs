//! The indexing run.
//!
//! [`Indexer::run`] drives one complete pass:
//!
//! 1. validate the configuration and the registered record indexers
//! 2. drop rows left pending by an earlier, unfinished run
//! 3. walk sites, domains, languages, environments, indexers and records
//! 4. write the remaining buffered rows and the learned nerf words
//! 5. `before_activate` hook, atomic activation, `after_activate` hook
//!
//! Failures of single records or branches are collected in the
//! [`RunReport`]; configuration and persistence failures abort the run
//! before anything is activated.

use std::collections::HashSet;
use std::sync::Arc;

use sift_core::{ActivationStats, Error, IndexRepository, Result, SiftConfig};
use sift_sitemap::SitemapFiles;

use crate::hooks::{ActivationSummary, IndexerHooks, NoHooks};
use crate::logger::LogEntry;
use crate::record::RecordIndexer;
use crate::request::QueueRequest;
use crate::stages::{
    ConfiguredLanguages, DomainStage, EnvironmentStage, IndexerStage, LanguageProvider,
    LanguageStage, Next, NodeStage, QueueHandler, SiteStage, SitemapStage,
};
use crate::state::{RunState, into_persistence};

/// Outcome of an indexing run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Retained error entries, one per failed record or branch.
    pub errors: Vec<LogEntry>,
    /// Nodes written.
    pub nodes_indexed: usize,
    /// Records that failed to read or convert.
    pub records_failed: usize,
    /// Records skipped by the `before_convert` hook.
    pub records_skipped: usize,
    /// Word rows written.
    pub words_persisted: usize,
    /// Pending nodes of an earlier run removed before the walk.
    pub removed_inactive: usize,
    /// Terms classified as too common to rank on.
    pub nerf_words: Vec<String>,
    /// Rendered sitemap files; empty when sitemaps are disabled.
    pub sitemap: SitemapFiles,
    /// Result of the activation swap.
    pub activation: ActivationStats,
}

impl RunReport {
    /// Whether no error was retained.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Process exit code: 0 without errors, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    /// Human-readable error lines.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// In development mode, turn retained errors into a failure.
    ///
    /// The run has already activated; this only decides how the caller
    /// reports it.
    pub fn escalate(&self, development: bool) -> Result<()> {
        if development && !self.is_success() {
            return Err(Error::operation(format!(
                "indexing finished with {} error(s):\n{}",
                self.errors.len(),
                self.error_messages().join("\n")
            )));
        }
        Ok(())
    }
}

/// Runs indexing passes against a repository.
///
/// # Example
///
/// ```ignore
/// let indexer = Indexer::new(config, repository)
///     .with_record_indexers(record_indexers(&config, base_dir)?);
/// let report = indexer.run()?;
/// std::process::exit(report.exit_code());
/// ```
pub struct Indexer {
    config: Arc<SiftConfig>,
    repository: Arc<dyn IndexRepository>,
    indexers: Vec<Arc<dyn RecordIndexer>>,
    languages: Arc<dyn LanguageProvider>,
    hooks: Arc<dyn IndexerHooks>,
}

impl Indexer {
    /// Indexer without record indexers, using configured languages and no
    /// hooks.
    pub fn new(config: impl Into<Arc<SiftConfig>>, repository: Arc<dyn IndexRepository>) -> Self {
        Self {
            config: config.into(),
            repository,
            indexers: Vec::new(),
            languages: Arc::new(ConfiguredLanguages),
            hooks: Arc::new(NoHooks),
        }
    }

    /// Register a record indexer.
    pub fn with_record_indexer(mut self, indexer: Arc<dyn RecordIndexer>) -> Self {
        self.indexers.push(indexer);
        self
    }

    /// Register several record indexers.
    pub fn with_record_indexers(
        mut self,
        indexers: impl IntoIterator<Item = Arc<dyn RecordIndexer>>,
    ) -> Self {
        self.indexers.extend(indexers);
        self
    }

    /// Replace the language provider.
    pub fn with_language_provider(mut self, provider: Arc<dyn LanguageProvider>) -> Self {
        self.languages = provider;
        self
    }

    /// Replace the hooks.
    pub fn with_hooks(mut self, hooks: Arc<dyn IndexerHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Run configuration.
    pub fn config(&self) -> &SiftConfig {
        &self.config
    }

    /// The stage chain in canonical order.
    pub fn stages(&self) -> Vec<Box<dyn QueueHandler>> {
        vec![
            Box::new(SitemapStage),
            Box::new(SiteStage),
            Box::new(DomainStage),
            Box::new(LanguageStage::new(Arc::clone(&self.languages))),
            Box::new(EnvironmentStage),
            Box::new(IndexerStage::new(self.indexers.clone())),
            Box::new(NodeStage),
        ]
    }

    /// Check that every indexer named by a domain is registered.
    fn check_indexers(&self) -> Result<()> {
        let mut registered = HashSet::new();
        for indexer in &self.indexers {
            if !registered.insert(indexer.name()) {
                return Err(Error::config(format!(
                    "record indexer '{}' registered twice",
                    indexer.name()
                )));
            }
        }
        for (key, domain) in &self.config.domains {
            if let Some(missing) = domain
                .indexers
                .iter()
                .find(|name| !registered.contains(name.as_str()))
            {
                return Err(Error::config(format!(
                    "domain '{key}' references unregistered indexer '{missing}'"
                )));
            }
        }
        Ok(())
    }

    /// Run one indexing pass.
    ///
    /// Returns the report even when records failed; only configuration,
    /// persistence and `before_activate` failures are errors. In those cases
    /// nothing is activated.
    pub fn run(&self) -> Result<RunReport> {
        self.config.validate_settings()?;
        self.check_indexers()?;

        let removed_inactive = self
            .repository
            .remove_inactive_nodes()
            .map_err(into_persistence)?;
        if removed_inactive > 0 {
            log::info!("Removed {removed_inactive} leftover pending node(s)");
        }

        let mut state = RunState::new(
            &self.config,
            Arc::clone(&self.repository),
            Arc::clone(&self.hooks),
        );
        state.learner_mut().flush();

        let stages = self.stages();
        let mut request = QueueRequest::new(Arc::clone(&self.config));
        Next::new(&stages).run(&mut request, &mut state)?;
        state.flush()?;

        let nerf_words: Vec<String> = state.learner().classify().collect();
        state.learner_mut().flush();
        log::debug!("Classified {} nerf word(s)", nerf_words.len());
        self.repository
            .persist_nerf_words(nerf_words.clone())
            .map_err(into_persistence)?;

        let stats = *state.stats();
        let summary = ActivationSummary {
            nodes_indexed: stats.nodes_indexed,
            records_failed: stats.records_failed,
            words_persisted: stats.words_persisted,
            nerf_words: nerf_words.len(),
            errors: state.logger().error_count(),
        };
        self.hooks.before_activate(&summary)?;

        let activation = self
            .repository
            .activate_new_and_remove_old()
            .map_err(into_persistence)?;
        self.hooks.after_activate(&summary, &activation);

        log::info!(
            "Activated generation {}: {} node(s), {} removed, {} error(s)",
            activation.generation,
            activation.activated,
            activation.removed,
            summary.errors
        );

        Ok(RunReport {
            errors: state.logger().errors().to_vec(),
            nodes_indexed: stats.nodes_indexed,
            records_failed: stats.records_failed,
            records_skipped: stats.records_skipped,
            words_persisted: stats.words_persisted,
            removed_inactive,
            nerf_words,
            sitemap: state.take_sitemap_files(),
            activation,
        })
    }
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.indexers.iter().map(|i| i.name()).collect();
        f.debug_struct("Indexer")
            .field("sites", &self.config.sites.len())
            .field("indexers", &names)
            .finish_non_exhaustive()
    }
}
