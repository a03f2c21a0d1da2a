//! Flat table indexer.

use std::sync::Arc;

use sift_core::{IndexNode, Result};

use super::{JsonRecordStore, populate_common};
use crate::record::{Record, RecordIndexer, RecordIter};
use crate::request::QueueRequest;
use crate::transform::TransformerRegistry;

/// Indexes every visible row of one table, such as news or events.
///
/// The node link is the `link` field of the row, or `{table}/{id}`.
pub struct RecordTableIndexer {
    name: String,
    store: Arc<JsonRecordStore>,
    table: String,
    tag: String,
    transformers: TransformerRegistry,
}

impl RecordTableIndexer {
    /// Indexer over `table` of a store.
    pub fn new(
        name: impl Into<String>,
        store: Arc<JsonRecordStore>,
        table: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            tag: name.clone(),
            name,
            store,
            table: table.into(),
            transformers: TransformerRegistry::new(),
        }
    }

    /// Tag for rows without a `tag` field.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Replace the transformer registry.
    pub fn with_transformers(mut self, transformers: TransformerRegistry) -> Self {
        self.transformers = transformers;
        self
    }
}

impl RecordIndexer for RecordTableIndexer {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve<'a>(&'a self, request: &QueueRequest) -> Result<RecordIter<'a>> {
        let site = request.site()?.id.clone();
        let language = request.language()?.code.clone();

        let rows = self
            .store
            .table(&self.table)
            .iter()
            .filter(move |row| row.in_site(&site) && row.in_language(&language))
            .filter(|row| !row.flag("hidden") && !row.flag("no_search"))
            .cloned()
            .map(Ok);
        Ok(Box::new(rows))
    }

    fn index(&self, record: &Record, node: &mut IndexNode, _request: &QueueRequest) -> Result<()> {
        populate_common(record, node, &self.tag)?;
        node.link = record
            .text("link")
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}/{}", self.table, record.id));
        let text = self.transformers.convert(record)?;
        node.append_content(&text);
        Ok(())
    }
}

impl std::fmt::Debug for RecordTableIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordTableIndexer")
            .field("name", &self.name)
            .field("table", &self.table)
            .field("tag", &self.tag)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sift_core::{LanguageConfig, NodeScope, SiftConfig};

    const STORE: &str = r#"{
        "news": [
            { "id": 1, "title": "Release", "bodytext": "<p>Version two</p>", "updated": "2024-03-01" },
            { "id": 2, "title": "Draft", "hidden": true },
            { "id": 3, "title": "Deutsch", "language": "de" },
            { "id": 4, "title": "Moved", "link": "https://blog.example.org/moved", "tag": "blog" }
        ]
    }"#;

    fn indexer() -> RecordTableIndexer {
        let store = Arc::new(JsonRecordStore::from_json_str(STORE).unwrap());
        RecordTableIndexer::new("news", store, "news").with_tag("press")
    }

    fn request() -> QueueRequest {
        let mut request = QueueRequest::new(Arc::new(SiftConfig::default()));
        request.set_site(Some(0));
        request.set_language(Some(LanguageConfig::new("en")));
        request
    }

    fn node(id: &str) -> IndexNode {
        IndexNode::new(
            "news",
            id,
            NodeScope {
                site: "main".to_string(),
                host: "www.example.org".to_string(),
                language: "en".to_string(),
                domain: "default".to_string(),
            },
        )
    }

    #[test]
    fn test_resolve_filters_rows() {
        let indexer = indexer();
        let ids: Vec<String> = indexer
            .resolve(&request())
            .unwrap()
            .map(|r| r.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_index_row() {
        let indexer = indexer();
        let row = indexer.store.table("news")[0].clone();
        let mut node = node("1");
        indexer.index(&row, &mut node, &request()).unwrap();

        assert_eq!(node.link, "news/1");
        assert_eq!(node.tag, "press");
        assert_eq!(node.content(), "Version two");
        assert!(node.timestamp.is_some());
    }

    #[test]
    fn test_index_keeps_explicit_link_and_tag() {
        let indexer = indexer();
        let row = indexer.store.table("news")[3].clone();
        let mut node = node("4");
        indexer.index(&row, &mut node, &request()).unwrap();
        assert_eq!(node.link, "https://blog.example.org/moved");
        assert_eq!(node.tag, "blog");
    }
}
