//! Integration tests for the indexing pipeline.

mod hooks;
mod pipeline;
mod sitemap;
mod sources;
