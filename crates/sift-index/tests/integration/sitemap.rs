//! Sitemap output of a run.

use sift_index::Indexer;

use crate::common::{StaticIndexer, TestHarness, news, site};

#[test]
fn test_sitemap_per_host_and_language() {
    let mut harness = TestHarness::new();
    harness.config.sites.push(site("shop", "shop.example.org", &["en"]));

    let report = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(
            StaticIndexer::new("news", vec![news("1", "A", "b c"), news("2", "D", "e f")])
                .into_arc(),
        )
        .run()
        .unwrap();

    let hosts: Vec<&str> = report.sitemap.hosts.keys().map(String::as_str).collect();
    assert_eq!(hosts, vec!["shop.example.org", "www.example.org"]);

    let main = &report.sitemap.hosts["www.example.org"];
    let chunks: Vec<&str> = main.chunks.keys().map(String::as_str).collect();
    assert_eq!(chunks, vec!["de-1", "en-1"]);
    assert!(main.chunks["de-1"].contains("<loc>https://www.example.org/de/news/2</loc>"));
    assert!(main.index.contains("{{child:en-1}}"));
}

#[test]
fn test_sitemap_chunking() {
    let mut harness = TestHarness::new();
    harness.config.sites = vec![site("main", "www.example.org", &["en"])];
    harness.config.sitemap.chunk_size = 2;
    let records = (1..=5).map(|i| news(&i.to_string(), "T", "x y")).collect();

    let report = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", records).into_arc())
        .run()
        .unwrap();

    assert_eq!(report.sitemap.chunk_count(), 3);
}

#[test]
fn test_hidden_domain_and_disabled_sitemap() {
    let mut harness = TestHarness::new();
    if let Some(domain) = harness.config.domains.get_mut("default") {
        domain.hide_from_sitemap = true;
    }
    let indexer = StaticIndexer::new("news", vec![news("1", "A", "b c")]).into_arc();

    let report = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(indexer.clone())
        .run()
        .unwrap();
    assert!(report.sitemap.is_empty());
    assert!(harness.repository.active_nodes().iter().all(|n| !n.add_to_sitemap));

    harness
        .config
        .domains
        .get_mut("default")
        .unwrap()
        .hide_from_sitemap = false;
    harness.config.sitemap.enabled = false;
    let report = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(indexer)
        .run()
        .unwrap();
    assert!(report.sitemap.is_empty());
    assert_eq!(report.nodes_indexed, 2);
}
