//! XML sitemaps derived from the indexing pass.
//!
//! The indexer feeds every node it produces into a [`SitemapAccumulator`].
//! After the walk the accumulator renders chunk files per host and language
//! plus one index file per host; [`server`] answers requests for them.
//!
//! # Modules
//!
//! - [`entry`]: [`SitemapEntry`] and the priority / change frequency mapping
//! - [`accumulator`]: Deduplicating, bucketing collector
//! - [`xml`]: Document rendering
//! - [`files`]: Generated files and their on-disk layout
//! - [`server`]: Request parsing and child reference rewriting

#![forbid(unsafe_code)]

pub mod accumulator;
pub mod entry;
pub mod files;
pub mod server;
pub mod xml;

pub use accumulator::SitemapAccumulator;
pub use entry::{ChangeFrequency, SitemapEntry, sitemap_priority};
pub use files::{HostSitemap, SitemapFiles};
pub use server::{SitemapRequest, rewrite_child_references, serve};
