//! The queue request threaded through the pipeline stages.
//!
//! Each stage pushes the value it enumerates (site, domain, language,
//! environment, record indexer, record) into the request before delegating
//! to the next stage and clears it afterwards. Reading a scope that no stage
//! has resolved yet fails with [`Error::NotResolved`].

use std::sync::Arc;

use sift_core::{DomainConfig, Error, LanguageConfig, NodeScope, Result, SiftConfig, SiteConfig};

use crate::record::{RecordIndexer, RecordRef};

/// Rendering context of one (site, language) pair.
///
/// Record indexers produce links relative to the language root; the context
/// turns them into the absolute URLs that are stored and listed in sitemaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    base_url: String,
    path_prefix: String,
    language: String,
}

impl RenderContext {
    /// Context for a site base URL and language.
    pub fn new(base_url: &str, language: &LanguageConfig) -> Self {
        let prefix = language.path_prefix.trim_matches('/');
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            path_prefix: if prefix.is_empty() {
                String::new()
            } else {
                format!("/{prefix}")
            },
            language: language.code.clone(),
        }
    }

    /// Site base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Language root URL, with trailing slash.
    pub fn language_root(&self) -> String {
        format!("{}{}/", self.base_url, self.path_prefix)
    }

    /// Language code.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Absolute URL for a link.
    ///
    /// Absolute links are kept, `/`-rooted links are resolved against the
    /// site, everything else against the language root.
    ///
    /// ```
    /// use sift_core::LanguageConfig;
    /// use sift_index::request::RenderContext;
    ///
    /// let mut de = LanguageConfig::new("de");
    /// de.path_prefix = "/de/".to_string();
    /// let ctx = RenderContext::new("https://example.org/", &de);
    ///
    /// assert_eq!(ctx.absolute_url("news/1"), "https://example.org/de/news/1");
    /// assert_eq!(ctx.absolute_url("/imprint"), "https://example.org/imprint");
    /// assert_eq!(ctx.absolute_url("https://other.org/x"), "https://other.org/x");
    /// assert_eq!(ctx.absolute_url(""), "https://example.org/de/");
    /// ```
    pub fn absolute_url(&self, link: &str) -> String {
        let link = link.trim();
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else if let Some(rooted) = link.strip_prefix('/') {
            format!("{}/{rooted}", self.base_url)
        } else {
            format!("{}{link}", self.language_root())
        }
    }
}

/// Ambient context of one path through the site × domain × language ×
/// environment × indexer × record walk.
pub struct QueueRequest {
    config: Arc<SiftConfig>,
    site: Option<usize>,
    domain: Option<String>,
    language: Option<LanguageConfig>,
    environment: Option<RenderContext>,
    indexer: Option<Arc<dyn RecordIndexer>>,
    record: Option<RecordRef>,
}

impl QueueRequest {
    /// A request with nothing resolved.
    pub fn new(config: Arc<SiftConfig>) -> Self {
        Self {
            config,
            site: None,
            domain: None,
            language: None,
            environment: None,
            indexer: None,
            record: None,
        }
    }

    /// The run configuration.
    pub fn config(&self) -> &SiftConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------------

    /// Current site.
    pub fn site(&self) -> Result<&SiteConfig> {
        self.site
            .and_then(|index| self.config.sites.get(index))
            .ok_or(Error::NotResolved { scope: "site" })
    }

    /// Current search domain key.
    pub fn domain_key(&self) -> Result<&str> {
        self.domain
            .as_deref()
            .ok_or(Error::NotResolved { scope: "domain" })
    }

    /// Current search domain configuration.
    pub fn domain(&self) -> Result<&DomainConfig> {
        self.config.domain(self.domain_key()?)
    }

    /// Current language.
    pub fn language(&self) -> Result<&LanguageConfig> {
        self.language
            .as_ref()
            .ok_or(Error::NotResolved { scope: "language" })
    }

    /// Current rendering context.
    pub fn environment(&self) -> Result<&RenderContext> {
        self.environment
            .as_ref()
            .ok_or(Error::NotResolved {
                scope: "environment",
            })
    }

    /// Current record indexer.
    pub fn indexer(&self) -> Result<&Arc<dyn RecordIndexer>> {
        self.indexer
            .as_ref()
            .ok_or(Error::NotResolved { scope: "indexer" })
    }

    /// Record currently being converted.
    pub fn record(&self) -> Result<&RecordRef> {
        self.record
            .as_ref()
            .ok_or(Error::NotResolved { scope: "record" })
    }

    /// Partition of nodes produced in the current scope.
    pub fn node_scope(&self) -> Result<NodeScope> {
        let site = self.site()?;
        Ok(NodeScope {
            site: site.id.clone(),
            host: site.host.clone(),
            language: self.language()?.code.clone(),
            domain: self.domain_key()?.to_string(),
        })
    }

    // ------------------------------------------------------------------------
    // Scope values, as far as resolved (for log tags)
    // ------------------------------------------------------------------------

    pub(crate) fn site_id(&self) -> Option<&str> {
        self.site().ok().map(|s| s.id.as_str())
    }

    pub(crate) fn domain_name(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub(crate) fn language_code(&self) -> Option<&str> {
        self.language.as_ref().map(|l| l.code.as_str())
    }

    pub(crate) fn indexer_name(&self) -> Option<&str> {
        self.indexer.as_ref().map(|i| i.name())
    }

    pub(crate) fn record_ref(&self) -> Option<&RecordRef> {
        self.record.as_ref()
    }

    // ------------------------------------------------------------------------
    // Stage setters
    // ------------------------------------------------------------------------

    pub(crate) fn set_site(&mut self, index: Option<usize>) {
        self.site = index;
    }

    pub(crate) fn set_domain(&mut self, key: Option<String>) {
        self.domain = key;
    }

    pub(crate) fn set_language(&mut self, language: Option<LanguageConfig>) {
        self.language = language;
    }

    pub(crate) fn set_environment(&mut self, environment: Option<RenderContext>) {
        self.environment = environment;
    }

    pub(crate) fn set_indexer(&mut self, indexer: Option<Arc<dyn RecordIndexer>>) {
        self.indexer = indexer;
    }

    pub(crate) fn set_record(&mut self, record: Option<RecordRef>) {
        self.record = record;
    }
}

impl std::fmt::Debug for QueueRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueRequest")
            .field("site", &self.site_id())
            .field("domain", &self.domain)
            .field("language", &self.language_code())
            .field("environment", &self.environment)
            .field("indexer", &self.indexer_name())
            .field("record", &self.record)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_scopes() {
        let request = QueueRequest::new(Arc::new(SiftConfig::default()));
        assert!(matches!(
            request.site(),
            Err(Error::NotResolved { scope: "site" })
        ));
        assert!(matches!(
            request.language(),
            Err(Error::NotResolved { scope: "language" })
        ));
        assert!(matches!(
            request.record(),
            Err(Error::NotResolved { scope: "record" })
        ));
        assert!(request.node_scope().is_err());
    }

    #[test]
    fn test_resolved_scopes() {
        let mut request = QueueRequest::new(Arc::new(SiftConfig::default()));
        request.set_site(Some(0));
        request.set_domain(Some("default".to_string()));
        request.set_language(Some(LanguageConfig::new("en")));

        let scope = request.node_scope().unwrap();
        assert_eq!(scope.site, "main");
        assert_eq!(scope.host, "www.example.org");
        assert_eq!(scope.language, "en");
        assert_eq!(scope.domain, "default");
        assert!(request.domain().is_ok());

        // Later scopes are still unresolved.
        assert!(request.environment().is_err());
        assert!(request.indexer().is_err());
    }

    #[test]
    fn test_clearing_scope() {
        let mut request = QueueRequest::new(Arc::new(SiftConfig::default()));
        request.set_site(Some(0));
        request.set_site(None);
        assert!(request.site().is_err());
    }

    #[test]
    fn test_render_context_without_prefix() {
        let ctx = RenderContext::new("https://example.org", &LanguageConfig::new("en"));
        assert_eq!(ctx.language_root(), "https://example.org/");
        assert_eq!(ctx.absolute_url("about"), "https://example.org/about");
        assert_eq!(ctx.language(), "en");
    }
}
