//! Search options and result shapes shared by providers and callers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sift_core::NodeImage;
use sift_fts::ParsedInput;

/// Results per page when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Snippet length when the caller does not ask for one.
pub const DEFAULT_CONTENT_MATCH_LENGTH: usize = 200;

/// Shortest snippet a caller may request.
pub const MIN_CONTENT_MATCH_LENGTH: usize = 10;

/// Longest snippet a caller may request.
pub const MAX_CONTENT_MATCH_LENGTH: usize = 10_000;

/// Key of the overall total in [`SearchCounts::as_map`].
pub const TOTAL_KEY: &str = "_total";

/// Everything a provider needs to run a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Lexed query.
    pub input: ParsedInput,
    /// Search domain.
    pub domain: String,
    /// Restrict to one site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// Restrict to one language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Allowed tags; empty allows every tag.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Maximum rows to return.
    pub max_items: usize,
    /// Rows to skip.
    #[serde(default)]
    pub offset: usize,
    /// Snippet length in characters.
    pub content_match_length: usize,
}

impl SearchOptions {
    /// Options for a query within a domain, with default limits.
    pub fn new(input: ParsedInput, domain: impl Into<String>) -> Self {
        Self {
            input,
            domain: domain.into(),
            site: None,
            language: None,
            tags: Vec::new(),
            max_items: DEFAULT_PAGE_SIZE,
            offset: 0,
            content_match_length: DEFAULT_CONTENT_MATCH_LENGTH,
        }
    }

    /// Builder-style site restriction.
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Builder-style language restriction.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builder-style tag restriction.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// The same search for another window of the result list.
    pub fn window(&self, offset: usize, limit: usize) -> Self {
        Self {
            offset,
            max_items: limit,
            ..self.clone()
        }
    }

    /// Whether a tag passes the allowed-tags filter.
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultRow {
    /// Node guid.
    pub guid: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Absolute URL.
    pub url: String,
    /// Result tag.
    pub tag: String,
    /// Language code.
    pub language: String,
    /// Node timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Representative image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<NodeImage>,
    /// Content excerpt around the first match.
    pub content_match: String,
    /// Ranking score; higher ranks first.
    pub score: f64,
}

/// Match counts of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCounts {
    /// All matching nodes.
    pub total: usize,
    /// Matching nodes per tag.
    pub per_tag: BTreeMap<String, usize>,
}

impl SearchCounts {
    /// Counts keyed like the query surface reports them: `_total` plus one
    /// entry per tag.
    pub fn as_map(&self) -> BTreeMap<String, usize> {
        let mut map = self.per_tag.clone();
        map.insert(TOTAL_KEY.to_string(), self.total);
        map
    }
}
