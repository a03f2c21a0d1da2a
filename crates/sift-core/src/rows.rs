//! Persistable rows produced by the indexing pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::node::{IndexNode, NodeImage, NodeScope};

/// Stored form of an [`IndexNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRow {
    /// Node guid.
    pub guid: String,
    /// Partition.
    pub scope: NodeScope,
    /// Source record kind.
    pub kind: String,
    /// Source record id.
    pub record_id: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Content buffer.
    pub content: String,
    /// Classification tag.
    pub tag: String,
    /// Priority after decay.
    pub priority: i32,
    /// Last modification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<NodeImage>,
    /// Absolute URL the node was rendered to.
    pub url: String,
    /// Listed in the sitemap.
    pub add_to_sitemap: bool,
    /// Metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl NodeRow {
    /// Build the row for a finalized node rendered at `url`.
    pub fn from_node(node: &IndexNode, url: impl Into<String>) -> Self {
        Self {
            guid: node.guid().to_string(),
            scope: node.scope().clone(),
            kind: node.kind().to_string(),
            record_id: node.record_id().to_string(),
            title: node.title.clone(),
            description: node.description.clone(),
            content: node.content().to_string(),
            tag: node.tag.clone(),
            priority: node.priority(),
            timestamp: node.timestamp,
            image: node.image.clone(),
            url: url.into(),
            add_to_sitemap: node.add_to_sitemap,
            metadata: node.metadata.clone(),
        }
    }
}

/// One distinct term of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRow {
    /// Owning node guid.
    pub guid: String,
    /// Lowercase term.
    pub word: String,
    /// Phonetic code ("" when the language has no encoder).
    pub soundex: String,
    /// Occurrences of the term in the node.
    pub count: u32,
    /// Term is a stop word in the node language.
    pub stop_word: bool,
    /// Term is a node keyword.
    pub keyword: bool,
}
