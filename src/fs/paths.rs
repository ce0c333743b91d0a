//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::naming::sanitize_path_component;

/// Resolve a `/`-separated relative filename under the download directory.
///
/// Every component is sanitized, so the result can never escape `base_dir`.
pub fn resolve_download_path(base_dir: &Path, relative: &str) -> Result<PathBuf> {
    let components: Vec<&str> = relative.split('/').filter(|c| !c.is_empty()).collect();

    if components.is_empty() {
        return Err(Error::InvalidFilename(format!(
            "Empty download filename: '{}'",
            relative
        )));
    }

    let mut path = base_dir.to_path_buf();
    for component in components {
        path.push(sanitize_path_component(component)?);
    }

    Ok(path)
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}
