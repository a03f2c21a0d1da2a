//! Page tree indexer.

use std::sync::Arc;

use serde_json::Value;
use sift_core::{Error, IndexNode, Result};

use super::{JsonRecordStore, populate_common};
use crate::record::{Record, RecordIndexer, RecordIter};
use crate::request::QueueRequest;
use crate::transform::{TransformerRegistry, strip_html};
use crate::tree::ContentTree;

const DEFAULT_PAGES_TABLE: &str = "pages";
const DEFAULT_CONTENT_TABLE: &str = "content";

/// Indexes the pages of a site in tree order.
///
/// Pages are read from the pages table, linked by `pid` and walked depth
/// first, so parents are always indexed before their children. A hidden
/// page hides its subpages too. The text of
/// a page is its own `content` field followed by its content elements:
/// rows of the content table whose `pid` is the page id, converted with the
/// transformer registered for their kind.
pub struct PageIndexer {
    name: String,
    store: Arc<JsonRecordStore>,
    pages_table: String,
    content_table: String,
    tag: String,
    transformers: TransformerRegistry,
}

impl PageIndexer {
    /// Indexer over the `pages` and `content` tables of a store.
    pub fn new(name: impl Into<String>, store: Arc<JsonRecordStore>) -> Self {
        let name = name.into();
        Self {
            tag: name.clone(),
            name,
            store,
            pages_table: DEFAULT_PAGES_TABLE.to_string(),
            content_table: DEFAULT_CONTENT_TABLE.to_string(),
            transformers: TransformerRegistry::new(),
        }
    }

    /// Read pages from another table.
    pub fn with_pages_table(mut self, table: impl Into<String>) -> Self {
        self.pages_table = table.into();
        self
    }

    /// Read content elements from another table.
    pub fn with_content_table(mut self, table: impl Into<String>) -> Self {
        self.content_table = table.into();
        self
    }

    /// Tag for pages without a `tag` field.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Replace the transformer registry.
    pub fn with_transformers(mut self, transformers: TransformerRegistry) -> Self {
        self.transformers = transformers;
        self
    }

    fn elements_of<'a>(&'a self, page: &Record, language: &str) -> Vec<&'a Record> {
        let mut elements: Vec<&Record> = self
            .store
            .table(&self.content_table)
            .iter()
            .filter(|element| element.string("pid").as_deref() == Some(page.id.as_str()))
            .filter(|element| element.in_language(language) && !element.flag("hidden"))
            .collect();
        elements.sort_by_key(|element| element.integer("sorting").unwrap_or(i64::MAX));
        elements
    }
}

impl RecordIndexer for PageIndexer {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve<'a>(&'a self, request: &QueueRequest) -> Result<RecordIter<'a>> {
        let site = request.site()?.id.as_str();
        let language = request.language()?.code.as_str();

        let pages: Vec<Record> = self
            .store
            .table(&self.pages_table)
            .iter()
            .filter(|page| page.in_site(site) && page.in_language(language))
            .cloned()
            .collect();

        let tree = ContentTree::from_records(pages);
        let ordered: Vec<Record> = tree.depth_first().cloned().collect();
        log::debug!(
            "Page indexer '{}' resolved {} of {} page(s)",
            self.name,
            ordered.len(),
            tree.len()
        );
        Ok(Box::new(ordered.into_iter().map(Ok)))
    }

    fn index(&self, record: &Record, node: &mut IndexNode, request: &QueueRequest) -> Result<()> {
        populate_common(record, node, &self.tag)?;

        node.link = match (record.text("link"), record.get("slug")) {
            (Some(link), _) => link.to_string(),
            (None, Some(Value::String(slug))) => slug.trim().to_string(),
            _ => record.id.clone(),
        };

        if let Some(content) = record.text("content") {
            node.append_content(&strip_html(content));
        }

        let language = request.language()?.code.as_str();
        for element in self.elements_of(record, language) {
            let text = self.transformers.convert(element).map_err(|e| {
                Error::conversion(format!(
                    "content element {}:{} of page {}: {e}",
                    element.kind, element.id, record.id
                ))
            })?;
            if !text.is_empty() {
                node.append_content(&text);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for PageIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageIndexer")
            .field("name", &self.name)
            .field("pages_table", &self.pages_table)
            .field("content_table", &self.content_table)
            .field("tag", &self.tag)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
