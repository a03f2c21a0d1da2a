//! Hook invocation during a run.

use std::sync::{Arc, Mutex};

use sift_core::{ActivationStats, Error, IndexNode, Result};
use sift_index::{ActivationSummary, Indexer, IndexerHooks, QueueRequest, Record};
use sift_sitemap::SitemapAccumulator;

use crate::common::{Call, StaticIndexer, TestHarness, news, site};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
    veto_activation: bool,
}

impl Recorder {
    fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl IndexerHooks for Recorder {
    fn before_convert(&self, record: &Record, _request: &QueueRequest) -> bool {
        self.push(format!("before_convert:{}", record.id));
        !record.flag("skip")
    }

    fn after_convert(&self, node: &mut IndexNode, _request: &QueueRequest) {
        self.push(format!("after_convert:{}", node.record_id()));
        node.title = node.title.to_uppercase();
    }

    fn before_sitemap(&self, sitemap: &mut SitemapAccumulator) {
        self.push(format!("before_sitemap:{}", sitemap.len()));
    }

    fn before_activate(&self, summary: &ActivationSummary) -> Result<()> {
        self.push(format!("before_activate:{}", summary.nodes_indexed));
        if self.veto_activation {
            return Err(Error::operation("vetoed"));
        }
        Ok(())
    }

    fn after_activate(&self, _summary: &ActivationSummary, stats: &ActivationStats) {
        self.push(format!("after_activate:{}", stats.activated));
    }
}

fn harness() -> TestHarness {
    let mut harness = TestHarness::new();
    harness.config.sites = vec![site("main", "www.example.org", &["en"])];
    harness
}

#[test]
fn test_hook_order_and_effects() {
    let harness = harness();
    let recorder = Arc::new(Recorder::default());
    let records = vec![
        news("1", "First", "a b"),
        news("2", "Second", "c d").with_field("skip", true),
    ];

    let report = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", records).into_arc())
        .with_hooks(Arc::clone(&recorder) as Arc<dyn IndexerHooks>)
        .run()
        .unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            "before_convert:1",
            "after_convert:1",
            "before_convert:2",
            "before_sitemap:1",
            "before_activate:1",
            "after_activate:1",
        ]
    );
    assert_eq!(report.records_skipped, 1);
    assert_eq!(harness.repository.active_titles(), vec!["FIRST"]);
}

#[test]
fn test_before_activate_veto() {
    let harness = harness();
    let recorder = Arc::new(Recorder {
        veto_activation: true,
        ..Default::default()
    });

    let err = Indexer::new(harness.config.clone(), harness.repository())
        .with_record_indexer(StaticIndexer::new("news", vec![news("1", "A", "b c")]).into_arc())
        .with_hooks(Arc::clone(&recorder) as Arc<dyn IndexerHooks>)
        .run()
        .unwrap_err();

    assert!(err.to_string().contains("vetoed"));
    assert!(!harness.repository.calls().contains(&Call::Activate));
    assert!(!recorder.events().iter().any(|e| e.starts_with("after_activate")));
}
