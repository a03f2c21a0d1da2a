//! Common test utilities and harness for indexing pipeline tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sift_core::{
    ActivationStats, Error, IndexNode, IndexRepository, LanguageConfig, NodeRow, Result,
    SiftConfig, SiteConfig, WordRow,
};
use sift_index::{QueueRequest, Record, RecordIndexer, RecordIter};

/// Repository calls in the order they arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RemoveInactive,
    Persist { nodes: usize, words: usize },
    PersistNerf(usize),
    Activate,
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<Call>,
    pending_nodes: Vec<NodeRow>,
    pending_words: Vec<WordRow>,
    active_nodes: Vec<NodeRow>,
    nerf_words: Vec<String>,
    generation: u64,
    fail_persist: bool,
    fail_activate: bool,
}

/// In-memory repository recording every call.
#[derive(Debug, Default)]
pub struct RecordingRepository {
    inner: Mutex<Inner>,
}

impl RecordingRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_persist() -> Arc<Self> {
        let repository = Self::default();
        repository.inner.lock().unwrap().fail_persist = true;
        Arc::new(repository)
    }

    pub fn failing_activate() -> Arc<Self> {
        let repository = Self::default();
        repository.inner.lock().unwrap().fail_activate = true;
        Arc::new(repository)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn active_nodes(&self) -> Vec<NodeRow> {
        self.inner.lock().unwrap().active_nodes.clone()
    }

    pub fn active_titles(&self) -> Vec<String> {
        self.active_nodes().into_iter().map(|n| n.title).collect()
    }

    pub fn pending_words(&self) -> Vec<WordRow> {
        self.inner.lock().unwrap().pending_words.clone()
    }

    pub fn nerf_words(&self) -> Vec<String> {
        self.inner.lock().unwrap().nerf_words.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().unwrap().generation
    }
}

impl IndexRepository for RecordingRepository {
    fn remove_inactive_nodes(&self) -> Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::RemoveInactive);
        let removed = inner.pending_nodes.len();
        inner.pending_nodes.clear();
        inner.pending_words.clear();
        Ok(removed)
    }

    fn persist(&self, nodes: Vec<NodeRow>, words: Vec<WordRow>) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_persist {
            return Err(Error::operation("disk full"));
        }
        inner.calls.push(Call::Persist {
            nodes: nodes.len(),
            words: words.len(),
        });
        inner.pending_nodes.extend(nodes);
        inner.pending_words.extend(words);
        Ok(())
    }

    fn persist_nerf_words(&self, words: Vec<String>) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::PersistNerf(words.len()));
        inner.nerf_words = words;
        Ok(())
    }

    fn activate_new_and_remove_old(&self) -> Result<ActivationStats> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_activate {
            return Err(Error::persistence("activation refused"));
        }
        inner.calls.push(Call::Activate);
        let removed = inner.active_nodes.len();
        inner.active_nodes = std::mem::take(&mut inner.pending_nodes);
        inner.generation += 1;
        Ok(ActivationStats {
            generation: inner.generation,
            activated: inner.active_nodes.len(),
            removed,
        })
    }
}

/// Record indexer serving fixed records, optionally failing on some ids.
pub struct StaticIndexer {
    name: String,
    records: Vec<Record>,
    fail_on: Vec<String>,
    fail_resolve: bool,
}

impl StaticIndexer {
    pub fn new(name: &str, records: Vec<Record>) -> Self {
        Self {
            name: name.to_string(),
            records,
            fail_on: Vec::new(),
            fail_resolve: false,
        }
    }

    pub fn failing_on(mut self, id: &str) -> Self {
        self.fail_on.push(id.to_string());
        self
    }

    pub fn failing_resolve(mut self) -> Self {
        self.fail_resolve = true;
        self
    }

    pub fn into_arc(self) -> Arc<dyn RecordIndexer> {
        Arc::new(self)
    }
}

impl RecordIndexer for StaticIndexer {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve<'a>(&'a self, _request: &QueueRequest) -> Result<RecordIter<'a>> {
        if self.fail_resolve {
            return Err(Error::operation(format!("{} is offline", self.name)));
        }
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }

    fn index(&self, record: &Record, node: &mut IndexNode, _request: &QueueRequest) -> Result<()> {
        if self.fail_on.contains(&record.id) {
            return Err(Error::conversion(format!("record {} is corrupt", record.id)));
        }
        node.title = record.text("title").unwrap_or_default().to_string();
        node.append_content(record.text("body").unwrap_or_default());
        node.link = format!("{}/{}", self.name, record.id);
        if let Some(priority) = record.integer("priority") {
            node.set_priority(priority as i32);
        }
        node.timestamp = record.timestamp("timestamp")?;
        Ok(())
    }
}

/// Test harness for pipeline runs.
pub struct TestHarness {
    pub config: SiftConfig,
    pub repository: Arc<RecordingRepository>,
}

impl TestHarness {
    /// One site `main` with English and German, one `default` domain using
    /// the `news` indexer.
    pub fn new() -> Self {
        let mut config = SiftConfig::default();
        config.sources.clear();
        config.indexer.today = chrono::NaiveDate::from_ymd_opt(2024, 6, 1);
        config.sites = vec![site("main", "www.example.org", &["en", "de"])];
        if let Some(domain) = config.domains.get_mut("default") {
            domain.indexers = vec!["news".to_string()];
        }
        Self {
            config,
            repository: RecordingRepository::new(),
        }
    }

    pub fn with_repository(mut self, repository: Arc<RecordingRepository>) -> Self {
        self.repository = repository;
        self
    }

    pub fn repository(&self) -> Arc<dyn IndexRepository> {
        Arc::clone(&self.repository) as Arc<dyn IndexRepository>
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A site with one language per code; `de` gets the `/de/` prefix.
pub fn site(id: &str, host: &str, languages: &[&str]) -> SiteConfig {
    SiteConfig {
        id: id.to_string(),
        host: host.to_string(),
        base_url: format!("https://{host}"),
        domains: vec!["default".to_string()],
        languages: languages
            .iter()
            .map(|code| {
                let mut language = LanguageConfig::new(*code);
                if *code != "en" {
                    language.path_prefix = format!("/{code}/");
                }
                language
            })
            .collect(),
    }
}

/// A news record.
pub fn news(id: &str, title: &str, body: &str) -> Record {
    Record::new("news", id)
        .with_field("title", title)
        .with_field("body", body)
}
