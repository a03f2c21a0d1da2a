//! Shared fixtures for the store tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use sift_core::SiftConfig;
use sift_fts::parse;
use sift_index::{Indexer, RunReport, record_indexers};
use sift_query::SearchOptions;
use sift_store::MemoryIndex;

pub const CONFIG: &str = r#"
[indexer]
today = "2024-06-01"

[store]
snapshot_path = "data/index.json"

[[sites]]
id = "main"
host = "www.example.org"
base_url = "https://www.example.org"
domains = ["default"]

[[sites.languages]]
code = "en"

[domains.default]
indexers = ["pages", "news"]

[[sources]]
name = "pages"
kind = "pages"
path = "records.json"

[[sources]]
name = "news"
kind = "records"
path = "records.json"
"#;

/// A store with `count` news records all mentioning "rust".
pub fn news_store(count: usize) -> String {
    let news: Vec<String> = (1..=count)
        .map(|n| {
            format!(
                r#"{{ "id": {n}, "title": "Release {n:02}", "body": "Rust release notes number {n}" }}"#
            )
        })
        .collect();
    format!(
        r#"{{
            "pages": [
                {{ "id": 1, "pid": 0, "title": "Rust handbook", "slug": "", "content": "Learn the borrow checker" }},
                {{ "id": 2, "pid": 1, "title": "Cooking", "slug": "cooking", "content": "Recipes for checker boards" }}
            ],
            "news": [{}]
        }}"#,
        news.join(",\n")
    )
}

/// Write `store` and run a complete indexing pass into `index`.
pub fn index_into(dir: &Path, store: &str, index: Arc<MemoryIndex>) -> RunReport {
    fs::write(dir.join("records.json"), store).unwrap();
    let config = config();
    Indexer::new(config.clone(), index)
        .with_record_indexers(record_indexers(&config, dir).unwrap())
        .run()
        .unwrap()
}

pub fn config() -> SiftConfig {
    SiftConfig::from_toml_str(CONFIG).unwrap()
}

pub fn options(input: &str) -> SearchOptions {
    SearchOptions::new(parse(input), "default")
}
