//! Collects sitemap entries during an indexing run.
//!
//! Every node handed to the accumulator is deduplicated by the hash of its
//! rendered URL (the first node seen for a URL wins, so a record indexed into
//! several search domains appears once) and bucketed by `(host, language)`.
//! [`SitemapAccumulator::generate`] renders the buckets into chunk files of at
//! most `chunk_size` URLs plus one index file per host.

use std::collections::{BTreeMap, HashSet};

use sift_core::config::{MAX_SITEMAP_CHUNK, SitemapSettings};
use sift_core::{IndexNode, NodeRow, url_hash};

use crate::entry::SitemapEntry;
use crate::files::{HostSitemap, SitemapFiles};
use crate::xml::{render_index, render_urlset};

/// Per-run sitemap collector.
#[derive(Debug)]
pub struct SitemapAccumulator {
    chunk_size: usize,
    change_frequency: bool,
    seen: HashSet<String>,
    buckets: BTreeMap<(String, String), Vec<SitemapEntry>>,
}

impl SitemapAccumulator {
    /// Create an accumulator with the given chunk size (clamped to
    /// `1..=50_000`).
    pub fn new(chunk_size: usize, change_frequency: bool) -> Self {
        Self {
            chunk_size: chunk_size.clamp(1, MAX_SITEMAP_CHUNK),
            change_frequency,
            seen: HashSet::new(),
            buckets: BTreeMap::new(),
        }
    }

    /// Create an accumulator from the `[sitemap]` settings.
    pub fn from_settings(settings: &SitemapSettings) -> Self {
        Self::new(settings.chunk_size, settings.change_frequency)
    }

    /// Add a node rendered at `url`.
    ///
    /// Returns `false` when the node is not listed (flag off, empty URL) or
    /// the URL was already added.
    pub fn add_node(&mut self, node: &IndexNode, url: &str) -> bool {
        if !node.add_to_sitemap {
            return false;
        }
        let scope = node.scope();
        self.add_entry(
            &scope.host,
            &scope.language,
            SitemapEntry::new(
                url,
                node.priority(),
                node.timestamp,
                node.image.clone(),
                self.change_frequency,
            ),
        )
    }

    /// Add a stored node row (used when regenerating from the repository).
    pub fn add_row(&mut self, row: &NodeRow) -> bool {
        if !row.add_to_sitemap {
            return false;
        }
        self.add_entry(
            &row.scope.host,
            &row.scope.language,
            SitemapEntry::from_row(row, self.change_frequency),
        )
    }

    fn add_entry(&mut self, host: &str, language: &str, entry: SitemapEntry) -> bool {
        if entry.url.trim().is_empty() {
            return false;
        }
        if !self.seen.insert(url_hash(&entry.url)) {
            log::debug!("Skipping duplicate sitemap URL {}", entry.url);
            return false;
        }
        self.buckets
            .entry((host.to_string(), language.to_string()))
            .or_default()
            .push(entry);
        true
    }

    /// Number of distinct URLs collected.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Entries collected for a host and language, in insertion order.
    pub fn entries(&self, host: &str, language: &str) -> &[SitemapEntry] {
        self.buckets
            .get(&(host.to_string(), language.to_string()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Render all buckets.
    ///
    /// Chunks are named `<language>-<n>` with `n` starting at 1.
    pub fn generate(&self) -> SitemapFiles {
        let mut files = SitemapFiles::default();

        for ((host, language), entries) in &self.buckets {
            let host_files = files
                .hosts
                .entry(host.clone())
                .or_insert_with(HostSitemap::default);
            for (n, chunk) in entries.chunks(self.chunk_size).enumerate() {
                let id = format!("{language}-{}", n + 1);
                host_files.chunks.insert(id, render_urlset(chunk));
            }
        }

        for host_files in files.hosts.values_mut() {
            host_files.index = render_index(host_files.chunks.keys().map(String::as_str));
        }

        log::info!(
            "Generated sitemaps for {} host(s), {} URL(s)",
            files.hosts.len(),
            self.len()
        );
        files
    }

    /// Drop everything collected.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.buckets.clear();
    }
}

impl Default for SitemapAccumulator {
    fn default() -> Self {
        Self::from_settings(&SitemapSettings::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
