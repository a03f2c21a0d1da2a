//! Generated sitemap files and their on-disk layout.
//!
//! ```text
//! <output_dir>/<host>/sitemap.xml     index
//! <output_dir>/<host>/<chunk>.xml     chunk files
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sift_core::{Error, Result};

/// File name of the per-host index.
pub const INDEX_FILE: &str = "sitemap.xml";

/// Files rendered for one host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSitemap {
    /// Index document referencing every chunk.
    pub index: String,
    /// Chunk documents by chunk id.
    pub chunks: BTreeMap<String, String>,
}

/// All files rendered by one generation pass, by host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapFiles {
    /// Per host files.
    pub hosts: BTreeMap<String, HostSitemap>,
}

impl SitemapFiles {
    /// Whether nothing was generated.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Total number of chunk files.
    pub fn chunk_count(&self) -> usize {
        self.hosts.values().map(|h| h.chunks.len()).sum()
    }

    /// Write every file below `dir`. Returns the number of files written.
    pub fn write_to(&self, dir: &Path) -> Result<usize> {
        let mut written = 0;
        for (host, files) in &self.hosts {
            check_segment(host, "host")?;
            let host_dir = dir.join(host);
            fs::create_dir_all(&host_dir).map_err(|e| Error::io_with_path(e, &host_dir))?;

            let index_path = host_dir.join(INDEX_FILE);
            fs::write(&index_path, &files.index).map_err(|e| Error::io_with_path(e, &index_path))?;
            written += 1;

            for (id, xml) in &files.chunks {
                check_segment(id, "chunk")?;
                let path = host_dir.join(format!("{id}.xml"));
                fs::write(&path, xml).map_err(|e| Error::io_with_path(e, &path))?;
                written += 1;
            }
        }
        log::info!("Wrote {written} sitemap file(s) to {}", dir.display());
        Ok(written)
    }

    /// Load the files of one host from `dir`.
    pub fn load_host(dir: &Path, host: &str) -> Result<HostSitemap> {
        check_segment(host, "host")?;
        let host_dir = dir.join(host);
        if !host_dir.is_dir() {
            return Err(Error::not_found(host, "sitemap host"));
        }

        let index_path = host_dir.join(INDEX_FILE);
        let index =
            fs::read_to_string(&index_path).map_err(|e| Error::io_with_path(e, &index_path))?;

        let mut chunks = BTreeMap::new();
        let entries = fs::read_dir(&host_dir).map_err(|e| Error::io_with_path(e, &host_dir))?;
        for entry in entries {
            let path = entry.map_err(|e| Error::io_with_path(e, &host_dir))?.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if path.extension().and_then(|e| e.to_str()) != Some("xml")
                || path.file_name().and_then(|n| n.to_str()) == Some(INDEX_FILE)
            {
                continue;
            }
            let xml = fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
            chunks.insert(stem.to_string(), xml);
        }

        Ok(HostSitemap { index, chunks })
    }
}

/// Reject names that would escape the output directory.
pub(crate) fn check_segment(name: &str, kind: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::config(format!("Invalid sitemap {kind} name '{name}'")));
    }
    Ok(())
}
