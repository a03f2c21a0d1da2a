//! Read side of the index.
//!
//! A [`SearchProvider`] answers queries against the *active* generation
//! only; rows still pending activation are never visible. Ranking is up to
//! the implementation, but results must be ordered deterministically so
//! that windows of the same search never overlap.

use async_trait::async_trait;
use sift_core::{NodeRow, Result};

use crate::options::{SearchCounts, SearchOptions, SearchResultRow};

/// Search backend contract.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Ranked rows for the window `options.offset .. offset + max_items`.
    async fn find_search_results(&self, options: &SearchOptions) -> Result<Vec<SearchResultRow>>;

    /// Match counts for the same predicate, independent of the window.
    async fn find_search_counts(&self, options: &SearchOptions) -> Result<SearchCounts>;

    /// Words completing `prefix`, best first, at most `options.max_items`.
    async fn find_autocomplete_results(
        &self,
        prefix: &str,
        options: &SearchOptions,
    ) -> Result<Vec<String>>;

    /// Active rows of a domain that belong in a sitemap.
    async fn find_sitemap_rows(&self, domain: &str) -> Result<Vec<NodeRow>>;

    /// Provider name for diagnostics.
    fn name(&self) -> &str;
}
