//! Validation of query surface parameters.
//!
//! Parameters arrive as strings from a query string or form. A
//! [`SearchRequest`] is the checked form of them; building it is the only
//! place where client input is rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sift_core::SiftConfig;
use sift_fts::{ParsedInput, parse};

use crate::error::{QueryError, Result};
use crate::options::{
    DEFAULT_CONTENT_MATCH_LENGTH, DEFAULT_PAGE_SIZE, MAX_CONTENT_MATCH_LENGTH, MAX_PAGE_SIZE,
    MIN_CONTENT_MATCH_LENGTH, SearchOptions,
};

/// Domain used when the caller names none.
pub const DEFAULT_DOMAIN: &str = "default";

/// Most completions an autocomplete request returns.
pub const AUTOCOMPLETE_LIMIT: usize = 10;

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    /// Lexed query.
    pub input: ParsedInput,
    /// Search domain.
    pub domain: String,
    /// Site restriction.
    pub site: Option<String>,
    /// Language restriction.
    pub language: Option<String>,
    /// Allowed tags.
    pub tags: Vec<String>,
    /// 1-based page number.
    pub page: usize,
    /// Rows per page, within 1..=100.
    pub page_size: usize,
    /// Snippet length, within 10..=10000.
    pub content_match_length: usize,
}

impl SearchRequest {
    /// Validate raw parameters.
    ///
    /// Recognized keys: `query` (required), `domain`, `site`, `language`,
    /// `tags` (comma list), `page`, `page.size` and `contentMatchLength`.
    /// Out-of-range sizes are clamped; unreadable numbers are rejected.
    pub fn from_params(params: &BTreeMap<String, String>, config: &SiftConfig) -> Result<Self> {
        let query = non_blank(params, "query").ok_or(QueryError::MissingParameter("query"))?;
        let domain = resolve_domain(non_blank(params, "domain"), config)?;

        let site = non_blank(params, "site").map(str::to_string);
        if let Some(site) = &site
            && !config.sites.iter().any(|s| &s.id == site)
        {
            return Err(QueryError::UnknownSite(site.clone()));
        }

        let tags = non_blank(params, "tags")
            .map(|tags| {
                tags.split(',')
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let page = number(params, "page")?.unwrap_or(1).max(1);
        let page_size = number(params, "page.size")?
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let content_match_length = number(params, "contentMatchLength")?
            .unwrap_or(DEFAULT_CONTENT_MATCH_LENGTH)
            .clamp(MIN_CONTENT_MATCH_LENGTH, MAX_CONTENT_MATCH_LENGTH);

        Ok(Self {
            input: parse(query),
            domain,
            site,
            language: non_blank(params, "language").map(str::to_lowercase),
            tags,
            page,
            page_size,
            content_match_length,
        })
    }

    /// Provider options for the requested page.
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            input: self.input.clone(),
            domain: self.domain.clone(),
            site: self.site.clone(),
            language: self.language.clone(),
            tags: self.tags.clone(),
            max_items: self.page_size,
            offset: (self.page - 1).saturating_mul(self.page_size),
            content_match_length: self.content_match_length,
        }
    }
}

/// Body of an autocomplete request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AutocompleteRequest {
    /// Text typed so far.
    #[serde(default)]
    pub search: String,
    /// Search domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Language restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl AutocompleteRequest {
    /// Read a JSON body.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| QueryError::invalid("body", e.to_string()))
    }

    /// The prefix to complete: the last group of the lexed input.
    pub fn prefix(&self) -> Option<String> {
        parse(&self.search).last_group
    }

    /// Validate against the configuration.
    pub fn options(&self, config: &SiftConfig) -> Result<SearchOptions> {
        if self.search.trim().is_empty() {
            return Err(QueryError::MissingParameter("search"));
        }
        let domain = resolve_domain(self.domain.as_deref().map(str::trim), config)?;
        let mut options = SearchOptions::new(parse(&self.search), domain);
        options.max_items = AUTOCOMPLETE_LIMIT;
        options.language = self
            .language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_lowercase);
        Ok(options)
    }
}

fn resolve_domain(domain: Option<&str>, config: &SiftConfig) -> Result<String> {
    let domain = match domain {
        Some(domain) if !domain.is_empty() => domain,
        _ => DEFAULT_DOMAIN,
    };
    if config.domains.contains_key(domain) {
        Ok(domain.to_string())
    } else {
        Err(QueryError::UnknownDomain(domain.to_string()))
    }
}

fn non_blank<'a>(params: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn number(params: &BTreeMap<String, String>, key: &str) -> Result<Option<usize>> {
    non_blank(params, key)
        .map(|v| {
            v.parse::<usize>().map_err(|_| {
                QueryError::invalid(key, format!("expected a non-negative number, got '{v}'"))
            })
        })
        .transpose()
}

// ============================================================================
// Tests
// ============================================================================
