//! In-memory representation of one searchable unit.
//!
//! An [`IndexNode`] is created once per record by a record indexer, filled
//! while the record is converted, and then handed to the term extraction,
//! sitemap accumulator and repository buffer. It belongs to exactly one
//! (site, language, domain) triple.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::node_guid;

/// Lowest allowed node priority.
pub const MIN_PRIORITY: i32 = -200;

/// Highest allowed node priority.
pub const MAX_PRIORITY: i32 = 200;

/// Optional image attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeImage {
    /// Image URL (absolute or site relative).
    pub url: String,
    /// Caption used in image sitemaps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Partition a node belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeScope {
    /// Site id.
    pub site: String,
    /// Site host.
    pub host: String,
    /// Language code.
    pub language: String,
    /// Search domain key.
    pub domain: String,
}

/// One indexed, searchable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexNode {
    guid: String,
    scope: NodeScope,
    kind: String,
    record_id: String,
    /// Node title.
    pub title: String,
    /// Short description.
    pub description: String,
    content: String,
    /// Single classification label.
    pub tag: String,
    priority: i32,
    /// Last modification instant.
    pub timestamp: Option<DateTime<Utc>>,
    /// Optional image.
    pub image: Option<NodeImage>,
    /// Link target, absolute or relative to the language root.
    pub link: String,
    /// Whether the node is listed in the sitemap.
    pub add_to_sitemap: bool,
    /// Lowercase terms flagged as keywords by the record indexer.
    pub keywords: BTreeSet<String>,
    /// Arbitrary metadata.
    pub metadata: BTreeMap<String, String>,
    decayed: bool,
}

impl IndexNode {
    /// Creates an empty node for a record in the given scope.
    pub fn new(kind: impl Into<String>, record_id: impl Into<String>, scope: NodeScope) -> Self {
        let kind = kind.into();
        let record_id = record_id.into();
        let guid = node_guid(
            &kind,
            &record_id,
            &scope.site,
            &scope.language,
            &scope.domain,
        );
        Self {
            guid,
            scope,
            kind,
            record_id,
            title: String::new(),
            description: String::new(),
            content: String::new(),
            tag: String::new(),
            priority: 0,
            timestamp: None,
            image: None,
            link: String::new(),
            add_to_sitemap: true,
            keywords: BTreeSet::new(),
            metadata: BTreeMap::new(),
            decayed: false,
        }
    }

    /// Globally unique key.
    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Site/language/domain the node belongs to.
    pub fn scope(&self) -> &NodeScope {
        &self.scope
    }

    /// Record kind the node was built from.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Id of the source record.
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// Accumulated free-text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Append one text fragment to the content buffer.
    ///
    /// Fragments are separated by a single space; blank fragments are ignored.
    pub fn append_content(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        if !self.content.is_empty() {
            self.content.push(' ');
        }
        self.content.push_str(fragment);
    }

    /// Current priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Set the priority, clamped to [`MIN_PRIORITY`]..=[`MAX_PRIORITY`].
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority.clamp(MIN_PRIORITY, MAX_PRIORITY);
    }

    /// Whether age decay has been applied already.
    pub fn is_decayed(&self) -> bool {
        self.decayed
    }

    /// Reduce the priority by one point per full week elapsed since the node
    /// timestamp.
    ///
    /// Applied at most once per node; nodes without timestamp and nodes dated
    /// in the future keep their priority. Returns the points removed.
    pub fn apply_priority_decay(&mut self, today: NaiveDate) -> i32 {
        if self.decayed {
            return 0;
        }
        self.decayed = true;
        let Some(timestamp) = self.timestamp else {
            return 0;
        };
        let weeks = (today - timestamp.date_naive()).num_weeks();
        if weeks <= 0 {
            return 0;
        }
        let before = self.priority;
        let loss = i32::try_from(weeks).unwrap_or(i32::MAX);
        self.set_priority(before.saturating_sub(loss));
        before - self.priority
    }

    /// All indexable text: title, description, content and keywords.
    pub fn indexable_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.description.len() + self.content.len() + 2,
        );
        for part in [&self.title, &self.description, &self.content] {
            if part.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(part);
        }
        for keyword in &self.keywords {
            text.push(' ');
            text.push_str(keyword);
        }
        text
    }
}

// ============================================================================
// Tests
// ============================================================================
