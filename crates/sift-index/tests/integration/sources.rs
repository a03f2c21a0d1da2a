//! Runs over the JSON record store sources.

use std::fs;

use sift_core::{SiftConfig, SourceConfig, SourceKind};
use sift_index::{Indexer, record_indexers};
use tempfile::TempDir;

use crate::common::{RecordingRepository, site};

const STORE: &str = r#"{
    "pages": [
        { "id": 1, "pid": 0, "title": "Home", "slug": "" },
        { "id": 2, "pid": 1, "title": "Products", "slug": "products", "keywords": "catalog" },
        { "id": 3, "pid": 2, "title": "Internal", "slug": "internal", "no_search": true },
        { "id": 4, "pid": 3, "title": "Gadgets", "slug": "products/gadgets" },
        { "id": 5, "pid": 1, "title": "Archive", "slug": "archive", "no_search_sub": true },
        { "id": 6, "pid": 5, "title": "Old", "slug": "archive/old" }
    ],
    "content": [
        { "id": 20, "pid": 2, "kind": "text", "header": "Range", "bodytext": "<p>Widgets and gizmos</p>" },
        { "id": 21, "pid": 4, "kind": "table", "bodytext": "Gadget|Price\nPhone|99" }
    ],
    "news": [
        { "id": 7, "title": "Spring release", "teaser": "Gizmos ship", "updated": "2024-05-01", "priority": 20 },
        { "id": 8, "title": "Broken", "updated": "yesterday" }
    ]
}"#;

const CONFIG: &str = r#"
[indexer]
today = "2024-06-01"

[[sites]]
id = "main"
host = "www.example.org"
base_url = "https://www.example.org"
domains = ["default", "news"]

[[sites.languages]]
code = "en"

[domains.default]
indexers = ["pages"]

[domains.news]
indexers = ["news"]

[[sources]]
name = "pages"
kind = "pages"
path = "records.json"

[[sources]]
name = "news"
kind = "records"
path = "records.json"
tag = "press"
"#;

#[test]
fn test_json_store_end_to_end() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("records.json"), STORE).unwrap();
    let config = SiftConfig::from_toml_str(CONFIG).unwrap();
    let repository = RecordingRepository::new();

    let report = Indexer::new(config.clone(), repository.clone())
        .with_record_indexers(record_indexers(&config, dir.path()).unwrap())
        .run()
        .unwrap();

    assert_eq!(
        repository.active_titles(),
        vec!["Home", "Products", "Gadgets", "Archive", "Spring release"]
    );
    assert_eq!(report.records_failed, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].to_string().contains("record=news:8"));

    let nodes = repository.active_nodes();
    let products = &nodes[1];
    assert_eq!(products.url, "https://www.example.org/products");
    assert!(products.content.contains("Widgets and gizmos"));
    let gadgets = &nodes[2];
    assert!(gadgets.content.contains("Phone 99"));

    let spring = &nodes[4];
    assert_eq!(spring.tag, "press");
    assert_eq!(spring.url, "https://www.example.org/news/7");
    assert_eq!(spring.priority, 16);

    let keywords: Vec<String> = repository
        .pending_words()
        .into_iter()
        .filter(|w| w.keyword)
        .map(|w| w.word)
        .collect();
    assert_eq!(keywords, vec!["catalog".to_string()]);
}

#[test]
fn test_sources_cover_multiple_sites() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("records.json"),
        r#"{ "pages": [
            { "id": 1, "pid": 0, "title": "Main only", "site": "main" },
            { "id": 2, "pid": 0, "title": "Everywhere" }
        ] }"#,
    )
    .unwrap();

    let mut config = SiftConfig::default();
    config.sites.push(site("shop", "shop.example.org", &["en"]));
    config.sources = vec![SourceConfig {
        name: "pages".to_string(),
        kind: SourceKind::Pages,
        path: "records.json".to_string(),
        table: None,
        tag: None,
    }];
    if let Some(domain) = config.domains.get_mut("default") {
        domain.indexers = vec!["pages".to_string()];
    }
    let repository = RecordingRepository::new();

    let report = Indexer::new(config.clone(), repository.clone())
        .with_record_indexers(record_indexers(&config, dir.path()).unwrap())
        .run()
        .unwrap();

    assert!(report.is_success());
    assert_eq!(
        repository.active_titles(),
        vec!["Main only", "Everywhere", "Everywhere"]
    );
}
