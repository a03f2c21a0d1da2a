//! Serving stored sitemap files.
//!
//! Requests look like `/{host}/sitemap.xml`, `/{host}/sitemap.xml?child=en-2`
//! or `/{host}/en-2.xml`. Index files are served with every
//! `{{child:<id>}}` placeholder replaced by
//! `<base_url>/sitemap.xml?child=<id>`.

use std::sync::LazyLock;

use regex::Regex;
use sift_core::{Error, Result};

use crate::files::{HostSitemap, INDEX_FILE, check_segment};

static CHILD_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{child:([A-Za-z0-9_.-]+)\}\}").expect("Invalid child placeholder regex")
});

/// A parsed sitemap request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapRequest {
    /// Requested host.
    pub host: String,
    /// Requested chunk, `None` for the index.
    pub chunk: Option<String>,
}

impl SitemapRequest {
    /// Parse a request path (with optional query string).
    pub fn parse(path: &str) -> Result<Self> {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let [host, file] = segments.as_slice() else {
            return Err(Error::not_found(path, "sitemap"));
        };
        check_segment(host, "host")?;

        let child = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "child")
            .map(|(_, value)| value.to_string())
            .filter(|value| !value.is_empty());

        let chunk = if *file == INDEX_FILE {
            child
        } else if let Some(id) = file.strip_suffix(".xml") {
            Some(id.to_string())
        } else {
            return Err(Error::not_found(path, "sitemap"));
        };
        if let Some(id) = &chunk {
            check_segment(id, "chunk")?;
        }

        Ok(Self {
            host: host.to_string(),
            chunk,
        })
    }
}

/// Replace child placeholders with absolute URLs below `base_url`.
///
/// ```
/// use sift_sitemap::server::rewrite_child_references;
///
/// let xml = "<loc>{{child:en-1}}</loc>";
/// assert_eq!(
///     rewrite_child_references(xml, "https://www.example.org/"),
///     "<loc>https://www.example.org/sitemap.xml?child=en-1</loc>"
/// );
/// ```
pub fn rewrite_child_references(xml: &str, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    CHILD_PLACEHOLDER
        .replace_all(xml, |caps: &regex::Captures<'_>| {
            format!("{base}/{INDEX_FILE}?child={}", &caps[1])
        })
        .into_owned()
}

/// Answer a request from the files of its host.
pub fn serve(files: &HostSitemap, request: &SitemapRequest, base_url: &str) -> Result<String> {
    match &request.chunk {
        None => Ok(rewrite_child_references(&files.index, base_url)),
        Some(id) => files
            .chunks
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(id.as_str(), "sitemap chunk")),
    }
}
