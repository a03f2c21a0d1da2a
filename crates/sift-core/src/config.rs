//! Configuration model.
//!
//! A [`SiftConfig`] describes what the indexer walks (sites, their languages
//! and search domains), where records come from (sources), and how the
//! by-products are written (sitemap, store snapshot). It is loaded from TOML:
//!
//! ```toml
//! [indexer]
//! batch_size = 100
//!
//! [[sites]]
//! id = "main"
//! host = "www.example.org"
//! base_url = "https://www.example.org"
//! domains = ["default", "news"]
//!
//! [[sites.languages]]
//! code = "en"
//!
//! [[sites.languages]]
//! code = "de"
//! path_prefix = "/de"
//!
//! [domains.default]
//! indexers = ["pages"]
//!
//! [domains.news]
//! indexers = ["news"]
//! disable_priority_decay = false
//!
//! [[sources]]
//! name = "pages"
//! kind = "pages"
//! path = "data/records.json"
//! ```
//!
//! Resolution order for the config file: explicit path, then the
//! `SIFT_CONFIG` environment variable, then `<config dir>/sift/config.toml`.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "SIFT_CONFIG";

/// Upper bound of URLs per sitemap file (sitemaps.org protocol limit).
pub const MAX_SITEMAP_CHUNK: usize = 50_000;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiftConfig {
    /// Pipeline settings.
    #[serde(default)]
    pub indexer: IndexerSettings,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapSettings,

    /// Index store settings.
    #[serde(default)]
    pub store: StoreSettings,

    /// Sites to index, in walk order.
    #[serde(default)]
    pub sites: Vec<SiteConfig>,

    /// Search domains keyed by name (e.g. "default", "news").
    #[serde(default)]
    pub domains: BTreeMap<String, DomainConfig>,

    /// Record sources, registered in this order.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Indexing pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexerSettings {
    /// Number of nodes buffered before rows are flushed to the repository.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Development mode: the caller escalates per-run errors as a hard failure.
    #[serde(default)]
    pub development: bool,

    /// Fixed "today" for priority decay, as `"YYYY-MM-DD"`. Defaults to the
    /// current UTC date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today: Option<NaiveDate>,
}

/// Sitemap generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SitemapSettings {
    /// Whether the accumulator runs during indexing.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum URLs per chunk file.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Emit `<changefreq>` elements.
    #[serde(default = "default_true")]
    pub change_frequency: bool,

    /// Directory the CLI writes sitemap files to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

/// Index store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    /// JSON snapshot of the active generation. In-memory only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<String>,
}

/// One site (host) of the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
    /// Stable site identifier.
    pub id: String,
    /// Host name used to bucket sitemaps.
    pub host: String,
    /// Absolute base URL, without trailing slash.
    pub base_url: String,
    /// Search domains indexed for this site.
    #[serde(default)]
    pub domains: Vec<String>,
    /// Languages the site is published in.
    #[serde(default)]
    pub languages: Vec<LanguageConfig>,
}

/// A site language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LanguageConfig {
    /// ISO 639-1 code ("en", "de").
    pub code: String,
    /// URL path prefix for this language ("" or "/de").
    #[serde(default)]
    pub path_prefix: String,
}

impl LanguageConfig {
    /// Creates a language without path prefix.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            path_prefix: String::new(),
        }
    }
}

/// A search domain: a named logical partition of the index.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DomainConfig {
    /// Record sources feeding this domain. Empty means all sources.
    #[serde(default)]
    pub indexers: Vec<String>,

    /// Restrict the domain to these language codes. Empty means all.
    #[serde(default)]
    pub languages: Vec<String>,

    /// Keep node priorities unchanged regardless of node age.
    #[serde(default)]
    pub disable_priority_decay: bool,

    /// Keep this domain's nodes out of the sitemap.
    #[serde(default)]
    pub hide_from_sitemap: bool,

    /// Stop-word overrides keyed by language code.
    #[serde(default)]
    pub stop_words: BTreeMap<String, Vec<String>>,

    /// Phonetic algorithm overrides keyed by language code
    /// (`"soundex"`, `"cologne"` or `"none"`).
    #[serde(default)]
    pub phonetic: BTreeMap<String, String>,
}

impl DomainConfig {
    /// Whether the given source feeds this domain.
    pub fn uses_indexer(&self, name: &str) -> bool {
        self.indexers.is_empty() || self.indexers.iter().any(|i| i == name)
    }

    /// Whether the given language is indexed in this domain.
    pub fn allows_language(&self, code: &str) -> bool {
        self.languages.is_empty() || self.languages.iter().any(|l| l == code)
    }
}

/// Kind of record source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Page tree with content elements.
    Pages,
    /// Flat record table (news, events, ...).
    Records,
}

/// A record source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Indexer name referenced by domains.
    pub name: String,
    /// Source kind.
    pub kind: SourceKind,
    /// JSON record store file.
    pub path: String,
    /// Table inside the store (defaults to the source name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Tag assigned to produced nodes (defaults to the source name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

fn default_batch_size() -> usize {
    100
}

fn default_chunk_size() -> usize {
    MAX_SITEMAP_CHUNK
}

fn default_true() -> bool {
    true
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            development: false,
            today: None,
        }
    }
}

impl Default for SitemapSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            chunk_size: default_chunk_size(),
            change_frequency: default_true(),
            output_dir: None,
        }
    }
}

impl Default for SiftConfig {
    fn default() -> Self {
        let mut domains = BTreeMap::new();
        domains.insert(
            "default".to_string(),
            DomainConfig {
                indexers: vec!["pages".to_string()],
                ..Default::default()
            },
        );
        Self {
            indexer: IndexerSettings::default(),
            sitemap: SitemapSettings::default(),
            store: StoreSettings::default(),
            sites: vec![SiteConfig {
                id: "main".to_string(),
                host: "www.example.org".to_string(),
                base_url: "https://www.example.org".to_string(),
                domains: vec!["default".to_string()],
                languages: vec![LanguageConfig::new("en")],
            }],
            domains,
            sources: vec![SourceConfig {
                name: "pages".to_string(),
                kind: SourceKind::Pages,
                path: "records.json".to_string(),
                table: None,
                tag: None,
            }],
        }
    }
}

impl SiftConfig {
    /// Load and validate configuration.
    ///
    /// `config_path` follows the usual resolution order (see module docs).
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = Self::resolve_config_path(config_path)
            .ok_or_else(|| Error::config("Could not determine config file location"))?;
        Self::load_from(&path)
    }

    /// Load and validate configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::parse(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Resolve the config file path.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        Self::default_config_path()
    }

    /// Platform default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sift").join("config.toml"))
    }

    /// Check cross references and bounds, including that every indexer a
    /// domain names is a configured source.
    pub fn validate(&self) -> Result<()> {
        self.validate_settings()?;

        let mut source_names = HashSet::new();
        for source in &self.sources {
            if !source_names.insert(source.name.as_str()) {
                return Err(Error::config(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
        }
        for (key, domain) in &self.domains {
            for indexer in &domain.indexers {
                if !source_names.contains(indexer.as_str()) {
                    return Err(Error::config(format!(
                        "domain '{key}' references unknown indexer '{indexer}'"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Check bounds and site/domain references, leaving indexer names to
    /// whoever registers the record indexers.
    pub fn validate_settings(&self) -> Result<()> {
        if self.indexer.batch_size == 0 {
            return Err(Error::config("indexer.batch_size must be at least 1"));
        }
        if self.sitemap.chunk_size == 0 || self.sitemap.chunk_size > MAX_SITEMAP_CHUNK {
            return Err(Error::config(format!(
                "sitemap.chunk_size must be within 1..={MAX_SITEMAP_CHUNK}"
            )));
        }

        let mut site_ids = HashSet::new();
        for site in &self.sites {
            if !site_ids.insert(site.id.as_str()) {
                return Err(Error::config(format!("duplicate site id '{}'", site.id)));
            }
            for domain in &site.domains {
                if !self.domains.contains_key(domain) {
                    return Err(Error::config(format!(
                        "site '{}' references unknown domain '{domain}'",
                        site.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Look up a search domain, failing with a configuration error.
    pub fn domain(&self, key: &str) -> Result<&DomainConfig> {
        self.domains
            .get(key)
            .ok_or_else(|| Error::config(format!("unknown domain '{key}'")))
    }

    /// Look up a site by id.
    pub fn site(&self, id: &str) -> Result<&SiteConfig> {
        self.sites
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found(id, "site"))
    }
}

// ============================================================================
// Tests
// ============================================================================
