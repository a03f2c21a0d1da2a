//! JSON snapshots of the active generation.

use std::fs;
use std::io::Write;
use std::path::Path;

use sift_core::{Error, Result};
use tempfile::NamedTempFile;

use crate::generation::GenerationData;

/// Load a snapshot; `None` when the file does not exist.
pub fn load(path: &Path) -> Result<Option<GenerationData>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let data: GenerationData = serde_json::from_str(&content)
        .map_err(|e| Error::parse(format!("{}: {e}", path.display())))?;
    log::info!(
        "Loaded generation {} ({} node(s)) from {}",
        data.number,
        data.nodes.len(),
        path.display()
    );
    Ok(Some(data))
}

/// Write a snapshot atomically: a temp file next to `path` is renamed over
/// it once fully written.
pub fn save(path: &Path, data: &GenerationData) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| Error::io_with_path(e, dir))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::io_with_path(e, dir))?;
    serde_json::to_writer(&mut file, data)?;
    file.flush().map_err(|e| Error::io_with_path(e, path))?;
    file.persist(path)
        .map_err(|e| Error::io_with_path(e.error, path))?;
    log::debug!("Wrote snapshot of generation {} to {}", data.number, path.display());
    Ok(())
}
