//! Extension points of an indexing run.
//!
//! All methods have no-op defaults; implement the ones you need and register
//! the hooks with [`crate::Indexer::with_hooks`].

use sift_core::{ActivationStats, IndexNode, Result};
use sift_sitemap::SitemapAccumulator;

use crate::record::Record;
use crate::request::QueueRequest;

/// What a run produced, handed to the activation hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationSummary {
    /// Nodes written.
    pub nodes_indexed: usize,
    /// Records that failed to convert.
    pub records_failed: usize,
    /// Word rows written.
    pub words_persisted: usize,
    /// Nerf words classified.
    pub nerf_words: usize,
    /// Retained error entries so far.
    pub errors: usize,
}

/// Callbacks invoked around conversion, sitemap generation and activation.
pub trait IndexerHooks: Send + Sync {
    /// Called before a record is converted. Returning `false` skips it.
    fn before_convert(&self, _record: &Record, _request: &QueueRequest) -> bool {
        true
    }

    /// Called after a record was converted, before its terms are extracted.
    fn after_convert(&self, _node: &mut IndexNode, _request: &QueueRequest) {}

    /// Called once after the walk, before sitemap files are rendered.
    fn before_sitemap(&self, _sitemap: &mut SitemapAccumulator) {}

    /// Called before activation. An error aborts the run without activating.
    fn before_activate(&self, _summary: &ActivationSummary) -> Result<()> {
        Ok(())
    }

    /// Called after the new generation was activated.
    fn after_activate(&self, _summary: &ActivationSummary, _stats: &ActivationStats) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl IndexerHooks for NoHooks {}
