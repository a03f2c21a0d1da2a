//! End-to-end runs of the stage chain.

use std::sync::Arc;

use sift_core::{DomainConfig, Error, LanguageConfig, Result, SiteConfig};
use sift_index::{ConfiguredLanguages, Indexer, LanguageProvider};

use crate::common::{Call, RecordingRepository, StaticIndexer, TestHarness, news, site};

// ----------------------------------------------------------------------------
// Happy path
// ----------------------------------------------------------------------------

#[test]
fn test_run_indexes_every_language() {
    let harness = TestHarness::new();
    let indexer = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(
            StaticIndexer::new("news", vec![news("1", "Launch", "We shipped sift")]).into_arc(),
        );

    let report = indexer.run().unwrap();

    assert!(report.is_success());
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.nodes_indexed, 2);
    assert_eq!(report.activation.activated, 2);
    assert_eq!(report.activation.generation, 1);

    let urls: Vec<String> = harness
        .repository
        .active_nodes()
        .into_iter()
        .map(|n| n.url)
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://www.example.org/news/1".to_string(),
            "https://www.example.org/de/news/1".to_string(),
        ]
    );
}

#[test]
fn test_call_order() {
    let harness = TestHarness::new();
    Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", vec![news("1", "A", "b c")]).into_arc())
        .run()
        .unwrap();

    let calls = harness.repository.calls();
    assert_eq!(calls.first(), Some(&Call::RemoveInactive));
    assert_eq!(calls.last(), Some(&Call::Activate));
    assert_eq!(calls.iter().filter(|c| **c == Call::RemoveInactive).count(), 1);
    let nerf = calls.iter().position(|c| matches!(c, Call::PersistNerf(_)));
    let activate = calls.iter().position(|c| *c == Call::Activate);
    assert!(nerf < activate);
}

#[test]
fn test_batches_follow_batch_size() {
    let mut harness = TestHarness::new();
    harness.config.indexer.batch_size = 2;
    harness.config.sites = vec![site("main", "www.example.org", &["en"])];
    let records = (1..=5).map(|i| news(&i.to_string(), "T", "body")).collect();

    let report = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", records).into_arc())
        .run()
        .unwrap();

    let persists: Vec<usize> = harness
        .repository
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Persist { nodes, .. } => Some(nodes),
            _ => None,
        })
        .collect();
    assert_eq!(persists, vec![2, 2, 1]);
    assert_eq!(report.nodes_indexed, 5);
}

#[test]
fn test_second_run_replaces_generation() {
    let harness = TestHarness::new();
    let first = Indexer::new(harness.config.clone(), harness.repository()).with_record_indexer(
        StaticIndexer::new(
            "news",
            vec![news("1", "Old", "x y"), news("2", "Gone", "x y")],
        )
        .into_arc(),
    );
    first.run().unwrap();

    let second = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", vec![news("1", "New", "x y")]).into_arc());
    let report = second.run().unwrap();

    assert_eq!(report.activation.generation, 2);
    assert_eq!(report.activation.removed, 4);
    assert_eq!(harness.repository.active_titles(), vec!["New", "New"]);
}

#[test]
fn test_priority_decay_unless_disabled() {
    let mut harness = TestHarness::new();
    harness.config.sites = vec![site("main", "www.example.org", &["en"])];
    let record = news("1", "Old news", "text")
        .with_field("priority", 50)
        .with_field("timestamp", "2024-05-04");

    Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", vec![record.clone()]).into_arc())
        .run()
        .unwrap();
    assert_eq!(harness.repository.active_nodes()[0].priority, 46);

    if let Some(domain) = harness.config.domains.get_mut("default") {
        domain.disable_priority_decay = true;
    }
    Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", vec![record]).into_arc())
        .run()
        .unwrap();
    assert_eq!(harness.repository.active_nodes()[0].priority, 50);
}

#[test]
fn test_nerf_words_classified_and_persisted() {
    let mut harness = TestHarness::new();
    harness.config.sites = vec![site("main", "www.example.org", &["en"])];
    let records = (0..20)
        .map(|i| {
            let body = format!("{} a{i:02}", "widget ".repeat(10));
            news(&i.to_string(), "", &body)
        })
        .collect();

    let report = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", records).into_arc())
        .run()
        .unwrap();

    assert_eq!(report.nerf_words, vec!["widget".to_string()]);
    assert_eq!(harness.repository.nerf_words(), vec!["widget".to_string()]);
}

// ----------------------------------------------------------------------------
// Failure isolation
// ----------------------------------------------------------------------------

#[test]
fn test_failing_record_is_isolated() {
    let mut harness = TestHarness::new();
    harness.config.sites = vec![site("main", "www.example.org", &["en"])];
    let records = vec![
        news("1", "One", "a b"),
        news("2", "Two", "c d"),
        news("3", "Three", "e f"),
    ];

    let report = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", records).failing_on("2").into_arc())
        .run()
        .unwrap();

    assert_eq!(report.nodes_indexed, 2);
    assert_eq!(report.records_failed, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.exit_code(), 1);

    let message = report.errors[0].to_string();
    assert!(message.contains("site=main"), "{message}");
    assert!(message.contains("language=en"), "{message}");
    assert!(message.contains("indexer=news"), "{message}");
    assert!(message.contains("record=news:2"), "{message}");
    assert!(message.contains("record 2 is corrupt"), "{message}");
    assert_eq!(harness.repository.active_titles(), vec!["One", "Three"]);
}

#[test]
fn test_failing_source_does_not_stop_others() {
    let mut harness = TestHarness::new();
    harness.config.sites = vec![site("main", "www.example.org", &["en"])];
    if let Some(domain) = harness.config.domains.get_mut("default") {
        domain.indexers = vec!["news".to_string(), "events".to_string(), "jobs".to_string()];
    }

    let report = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexers([
            StaticIndexer::new("news", vec![news("1", "News", "a b")])
                .into_arc(),
            StaticIndexer::new("events", Vec::new())
                .failing_resolve()
                .into_arc(),
            StaticIndexer::new("jobs", vec![news("9", "Job", "c d")])
                .into_arc(),
        ])
        .run()
        .unwrap();

    assert_eq!(report.nodes_indexed, 2);
    assert_eq!(report.errors.len(), 1);
    let message = report.errors[0].to_string();
    assert!(message.contains("indexer=events"), "{message}");
    assert!(!message.contains("record="), "{message}");
}

struct BrokenSite;

impl LanguageProvider for BrokenSite {
    fn languages(
        &self,
        site: &SiteConfig,
        domain_key: &str,
        domain: &DomainConfig,
    ) -> Result<Vec<LanguageConfig>> {
        if site.id == "broken" {
            return Err(Error::operation("language overlay table missing"));
        }
        ConfiguredLanguages.languages(site, domain_key, domain)
    }
}

#[test]
fn test_language_failure_aborts_only_its_branch() {
    let mut harness = TestHarness::new();
    harness.config.sites = vec![
        site("broken", "broken.example.org", &["en"]),
        site("main", "www.example.org", &["en"]),
    ];

    let report = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", vec![news("1", "A", "b c")]).into_arc())
        .with_language_provider(Arc::new(BrokenSite))
        .run()
        .unwrap();

    assert_eq!(report.nodes_indexed, 1);
    assert_eq!(report.errors.len(), 1);
    let message = report.errors[0].to_string();
    assert!(message.contains("site=broken"), "{message}");
    assert!(message.contains("language overlay table missing"), "{message}");
}

#[test]
fn test_site_without_base_url_is_isolated() {
    let mut harness = TestHarness::new();
    let mut relative = site("relative", "relative.example.org", &["en"]);
    relative.base_url = "relative.example.org".to_string();
    harness.config.sites = vec![relative, site("main", "www.example.org", &["en"])];

    let report = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", vec![news("1", "A", "b c")]).into_arc())
        .run()
        .unwrap();

    assert_eq!(report.nodes_indexed, 1);
    assert_eq!(report.errors.len(), 1);
}

// ----------------------------------------------------------------------------
// Fatal failures
// ----------------------------------------------------------------------------

#[test]
fn test_unregistered_indexer_is_config_error() {
    let harness = TestHarness::new();
    let err = Indexer::new(harness.config.clone(), harness.repository())
        .run()
        .unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(harness.repository.calls().is_empty());
}

#[test]
fn test_persist_failure_prevents_activation() {
    let harness = TestHarness::new().with_repository(RecordingRepository::failing_persist());
    let err = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", vec![news("1", "A", "b c")]).into_arc())
        .run()
        .unwrap_err();

    assert!(matches!(err, Error::Persistence { .. }));
    assert!(!harness.repository.calls().contains(&Call::Activate));
    assert_eq!(harness.repository.generation(), 0);
}

#[test]
fn test_activation_failure_is_fatal() {
    let harness = TestHarness::new().with_repository(RecordingRepository::failing_activate());
    let err = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", vec![news("1", "A", "b c")]).into_arc())
        .run()
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(harness.repository.active_nodes().is_empty());
}

#[test]
fn test_development_mode_escalates_errors() {
    let mut harness = TestHarness::new();
    harness.config.indexer.development = true;
    harness.config.sites = vec![site("main", "www.example.org", &["en"])];

    let indexer = Indexer::new(harness.config.clone(), harness.repository()).with_record_indexer(
        StaticIndexer::new("news", vec![news("1", "A", "b c")])
            .failing_on("1")
            .into_arc(),
    );

    let report = indexer.run().unwrap();
    assert!(report.escalate(false).is_ok());
    let err = report.escalate(true).unwrap_err();
    assert!(err.to_string().contains("1 error(s)"));
    assert!(!err.is_fatal());
}
