//! Handlers for `sift index`, `search`, `autocomplete` and `sitemap`.
//!
//! Every handler works on a [`Workspace`]: the loaded configuration plus the
//! directory relative paths in it (record stores, snapshot, sitemap output)
//! are resolved against, which is the directory of the config file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sift_core::{Error as CoreError, SiftConfig};
use sift_index::{Indexer, RunReport, record_indexers};
use sift_query::{AutocompleteRequest, SearchPage, SearchPaginator, SearchProvider, SearchRequest};
use sift_sitemap::{SitemapAccumulator, SitemapFiles, SitemapRequest, serve};
use sift_store::MemoryIndex;

use crate::cli::{AutocompleteArgs, IndexArgs, SearchArgs};
use crate::error::Result;

/// Loaded configuration and the directory it was loaded from.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Validated configuration.
    pub config: SiftConfig,
    /// Base for relative paths in the configuration.
    pub base_dir: PathBuf,
}

impl Workspace {
    /// Resolve and load the configuration file.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = SiftConfig::resolve_config_path(config_path)
            .ok_or_else(|| CoreError::config("Could not determine config file location"))?;
        let config = SiftConfig::load_from(&path)?;
        Ok(Self::new(config, base_dir_of(&path)))
    }

    /// Workspace over an already loaded configuration.
    pub fn new(config: SiftConfig, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            base_dir: base_dir.into(),
        }
    }

    /// Open the index configured in `[store]`.
    pub fn open_index(&self) -> Result<MemoryIndex> {
        if self.config.store.snapshot_path.is_none() {
            log::warn!("No store.snapshot_path configured; the index lives only for this command");
        }
        Ok(MemoryIndex::from_config(&self.config, &self.base_dir)?)
    }

    /// Sitemap directory: the override, else `sitemap.output_dir`.
    pub fn sitemap_dir(&self, override_dir: Option<&Path>) -> Option<PathBuf> {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.config.sitemap.output_dir.as_ref().map(PathBuf::from))
            .map(|dir| self.base_dir.join(dir))
    }
}

fn base_dir_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

// ============================================================================
// index
// ============================================================================

/// Run a complete indexing pass and write its sitemap files.
///
/// In development mode a run with errors is reported as an error after the
/// files were written.
pub fn run_index(workspace: &Workspace, args: &IndexArgs) -> Result<RunReport> {
    let index = Arc::new(workspace.open_index()?);
    let indexers = record_indexers(&workspace.config, &workspace.base_dir)?;
    let report = Indexer::new(workspace.config.clone(), index)
        .with_record_indexers(indexers)
        .run()?;

    log::info!(
        "Indexed {} node(s), {} failed, generation {} active",
        report.nodes_indexed,
        report.records_failed,
        report.activation.generation
    );
    for message in report.error_messages() {
        log::error!("{message}");
    }

    if let Some(dir) = workspace.sitemap_dir(args.sitemap_dir.as_deref()) {
        if report.sitemap.is_empty() {
            log::info!("No sitemap entries collected");
        } else {
            report.sitemap.write_to(&dir)?;
        }
    }

    report.escalate(workspace.config.indexer.development)?;
    Ok(report)
}

// ============================================================================
// search
// ============================================================================

/// Query parameters as the query surface receives them.
pub fn search_params(args: &SearchArgs) -> BTreeMap<String, String> {
    let pairs = [
        ("query", Some(&args.query)),
        ("domain", args.domain.as_ref()),
        ("site", args.site.as_ref()),
        ("language", args.language.as_ref()),
        ("tags", args.tags.as_ref()),
        ("page", args.page.as_ref()),
        ("page.size", args.page_size.as_ref()),
        ("contentMatchLength", args.content_match_length.as_ref()),
    ];
    pairs
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v.clone())))
        .collect()
}

/// Validate the arguments and fetch one page of results.
pub async fn run_search(
    workspace: &Workspace,
    provider: Arc<dyn SearchProvider>,
    args: &SearchArgs,
) -> Result<SearchPage> {
    let request = SearchRequest::from_params(&search_params(args), &workspace.config)?;
    let paginator = SearchPaginator::new(provider, request.options());
    Ok(paginator.page(request.page, request.page_size).await?)
}

/// Plain text rendering of a result page.
pub fn render_page(page: &SearchPage) -> String {
    let mut out = format!(
        "{} result(s), page {} of {}\n",
        page.total,
        page.page,
        page.page_count.max(1)
    );
    for (n, row) in page.items.iter().enumerate() {
        let position = page
            .page
            .saturating_sub(1)
            .saturating_mul(page.page_size)
            .saturating_add(n + 1);
        out.push_str(&format!("\n{position}. {} [{}]\n   {}\n", row.title, row.tag, row.url));
        if !row.content_match.is_empty() {
            out.push_str(&format!("   {}\n", row.content_match));
        }
    }
    out
}

// ============================================================================
// autocomplete
// ============================================================================

/// Completions for the last word of the typed query.
pub async fn run_autocomplete(
    workspace: &Workspace,
    provider: Arc<dyn SearchProvider>,
    args: &AutocompleteArgs,
) -> Result<Vec<String>> {
    let request = AutocompleteRequest {
        search: args.search.clone(),
        domain: args.domain.clone(),
        language: args.language.clone(),
    };
    let options = request.options(&workspace.config)?;
    let Some(prefix) = request.prefix() else {
        return Ok(Vec::new());
    };
    Ok(provider.find_autocomplete_results(&prefix, &options).await?)
}

// ============================================================================
// sitemap
// ============================================================================

/// Render sitemap files from the active index and write them to `dir`.
pub async fn run_sitemap_write(
    workspace: &Workspace,
    provider: Arc<dyn SearchProvider>,
    dir: &Path,
) -> Result<SitemapFiles> {
    let mut accumulator = SitemapAccumulator::from_settings(&workspace.config.sitemap);
    for (key, domain) in &workspace.config.domains {
        if domain.hide_from_sitemap {
            log::debug!("Domain {key} is hidden from the sitemap");
            continue;
        }
        for row in provider.find_sitemap_rows(key).await? {
            accumulator.add_row(&row);
        }
    }
    let files = accumulator.generate();
    files.write_to(dir)?;
    Ok(files)
}

/// A stored sitemap file as it would be served.
///
/// Child references are rewritten below `base_url`, which defaults to the
/// base URL of the first site on `host`.
pub fn run_sitemap_show(
    workspace: &Workspace,
    dir: &Path,
    host: &str,
    chunk: Option<&str>,
    base_url: Option<&str>,
) -> Result<String> {
    let base_url = match base_url {
        Some(url) => url.to_string(),
        None => workspace
            .config
            .sites
            .iter()
            .find(|site| site.host == host)
            .map(|site| site.base_url.clone())
            .ok_or_else(|| CoreError::not_found(host, "site host"))?,
    };
    let path = match chunk {
        Some(id) => format!("/{host}/{id}.xml"),
        None => format!("/{host}/sitemap.xml"),
    };
    let request = SitemapRequest::parse(&path)?;
    let files = SitemapFiles::load_host(dir, &request.host)?;
    Ok(serve(&files, &request, &base_url)?)
}

// ============================================================================
// Tests
// ============================================================================
