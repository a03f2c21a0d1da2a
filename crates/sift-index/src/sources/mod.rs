//! Record sources backed by JSON record stores.
//!
//! [`record_indexers`] builds one [`RecordIndexer`] per `[[sources]]` entry
//! of the configuration; sources sharing a store file share one loaded
//! [`JsonRecordStore`].

mod json;
mod pages;
mod table;

pub use json::JsonRecordStore;
pub use pages::PageIndexer;
pub use table::RecordTableIndexer;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use sift_core::node::{MAX_PRIORITY, MIN_PRIORITY};
use sift_core::{IndexNode, NodeImage, Result, SiftConfig, SourceKind};

use crate::record::{Record, RecordIndexer};
use crate::transform::strip_html;

/// Build the record indexers of every configured source.
///
/// Relative store paths are resolved against `base_dir`.
pub fn record_indexers(
    config: &SiftConfig,
    base_dir: &Path,
) -> Result<Vec<Arc<dyn RecordIndexer>>> {
    let mut stores: HashMap<PathBuf, Arc<JsonRecordStore>> = HashMap::new();
    let mut indexers: Vec<Arc<dyn RecordIndexer>> = Vec::with_capacity(config.sources.len());

    for source in &config.sources {
        let path = {
            let path = Path::new(&source.path);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base_dir.join(path)
            }
        };
        let store = match stores.get(&path) {
            Some(store) => Arc::clone(store),
            None => {
                let store = Arc::new(JsonRecordStore::open(&path)?);
                stores.insert(path, Arc::clone(&store));
                store
            }
        };

        let tag = source.tag.clone().unwrap_or_else(|| source.name.clone());
        let indexer: Arc<dyn RecordIndexer> = match source.kind {
            SourceKind::Pages => {
                let mut indexer = PageIndexer::new(&source.name, store).with_tag(tag);
                if let Some(table) = &source.table {
                    indexer = indexer.with_pages_table(table);
                }
                Arc::new(indexer)
            }
            SourceKind::Records => {
                let table = source.table.as_deref().unwrap_or(&source.name);
                Arc::new(RecordTableIndexer::new(&source.name, store, table).with_tag(tag))
            }
        };
        log::debug!("Registered record indexer '{}'", indexer.name());
        indexers.push(indexer);
    }

    Ok(indexers)
}

/// Copy the fields every record kind shares onto the node.
pub(crate) fn populate_common(
    record: &Record,
    node: &mut IndexNode,
    default_tag: &str,
) -> Result<()> {
    if let Some(title) = record.text("title") {
        node.title = strip_html(title);
    }
    if let Some(description) = record.text("description").or_else(|| record.text("teaser")) {
        node.description = strip_html(description);
    }
    node.tag = record.text("tag").unwrap_or(default_tag).to_string();

    if let Some(priority) = record.integer("priority") {
        let clamped = priority.clamp(i64::from(MIN_PRIORITY), i64::from(MAX_PRIORITY));
        node.set_priority(i32::try_from(clamped).unwrap_or_default());
    }

    node.timestamp = match record.timestamp("timestamp")? {
        Some(timestamp) => Some(timestamp),
        None => record.timestamp("updated")?,
    };
    node.image = image(record);

    for keyword in record.list("keywords") {
        node.keywords.insert(keyword.to_lowercase());
    }
    if record.flag("no_sitemap") {
        node.add_to_sitemap = false;
    }
    Ok(())
}

fn image(record: &Record) -> Option<NodeImage> {
    match record.get("image")? {
        Value::String(url) if !url.trim().is_empty() => Some(NodeImage {
            url: url.trim().to_string(),
            caption: record.text("image_caption").map(str::to_string),
        }),
        Value::Object(fields) => {
            let url = fields.get("url").and_then(Value::as_str)?.trim();
            if url.is_empty() {
                return None;
            }
            Some(NodeImage {
                url: url.to_string(),
                caption: fields
                    .get("caption")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        }
        _ => None,
    }
}
