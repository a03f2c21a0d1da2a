//! Queries against an indexed generation.

use std::collections::BTreeSet;
use std::sync::Arc;

use sift_query::{SearchPaginator, SearchProvider};
use sift_store::MemoryIndex;
use tempfile::TempDir;

use crate::common::{index_into, news_store, options};

fn indexed(news: usize) -> (TempDir, Arc<MemoryIndex>) {
    let dir = TempDir::new().unwrap();
    let index = Arc::new(MemoryIndex::new());
    let report = index_into(dir.path(), &news_store(news), Arc::clone(&index));
    assert!(report.is_success(), "{:?}", report.error_messages());
    (dir, index)
}

#[tokio::test]
async fn test_pages_are_disjoint_in_any_order() {
    let (_dir, index) = indexed(23);
    let paginator = SearchPaginator::new(index, options("rust"));

    let third = paginator.page(3, 10).await.unwrap();
    let first = paginator.page(1, 10).await.unwrap();
    let second = paginator.page(2, 10).await.unwrap();

    assert_eq!(first.total, 24);
    assert_eq!(first.page_count, 3);
    assert_eq!(third.items.len(), 4);

    let mut seen = BTreeSet::new();
    for row in first
        .items
        .iter()
        .chain(&second.items)
        .chain(&third.items)
    {
        assert!(seen.insert(row.guid.clone()), "{} listed twice", row.guid);
    }
    assert_eq!(seen.len(), 24);
    assert_eq!(first.items[0].title, "Rust handbook");
}

#[tokio::test]
async fn test_counts_per_tag() {
    let (_dir, index) = indexed(3);

    let counts = index.find_search_counts(&options("rust")).await.unwrap();
    assert_eq!(counts.total, 4);
    assert_eq!(counts.per_tag["news"], 3);
    assert_eq!(counts.per_tag["pages"], 1);

    let map = counts.as_map();
    assert_eq!(map["_total"], 4);

    let filtered = options("rust").with_tags(vec!["pages".to_string()]);
    assert_eq!(index.find_search_counts(&filtered).await.unwrap().total, 1);
}

#[tokio::test]
async fn test_denied_words_and_content_match() {
    let (_dir, index) = indexed(2);

    let rows = index
        .find_search_results(&options("checker"))
        .await
        .unwrap();
    let titles: BTreeSet<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, BTreeSet::from(["Cooking", "Rust handbook"]));
    assert!(
        rows.iter()
            .all(|r| r.content_match.to_lowercase().contains("checker"))
    );

    let rows = index
        .find_search_results(&options("checker -recipes"))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Rust handbook");
}

#[tokio::test]
async fn test_partition_is_respected() {
    let (_dir, index) = indexed(2);
    let other_site = options("rust").with_site("shop");
    assert!(index.find_search_results(&other_site).await.unwrap().is_empty());

    let other_domain = sift_query::SearchOptions::new(sift_fts::parse("rust"), "news");
    assert!(index.find_search_results(&other_domain).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_autocomplete_and_sitemap_rows() {
    let (_dir, index) = indexed(2);

    let words = index
        .find_autocomplete_results("re", &options(""))
        .await
        .unwrap();
    assert_eq!(words.first().map(String::as_str), Some("release"));
    assert!(words.contains(&"recipes".to_string()));

    let rows = index.find_sitemap_rows("default").await.unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().any(|r| r.url == "https://www.example.org/cooking"));
}
