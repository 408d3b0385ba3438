//! File and network glue at the pipeline boundary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(())
}

/// Write via a sibling temp file and rename it into place.
pub fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = tmp_sibling(path);
    fs::write(&tmp, content).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move {} into place", tmp.display()))?;
    Ok(())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Fetch the registry document from a URL or the local filesystem.
pub fn fetch_registry(source: &str) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        info!("downloading {source}");
        let body = reqwest::blocking::get(source)
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .with_context(|| format!("failed to download {source}"))?;
        Ok(body)
    } else {
        read_file(Path::new(source))
    }
}
