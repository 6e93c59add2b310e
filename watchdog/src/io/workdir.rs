//! Resolution of the child working directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Canonicalize `path` and ensure it is a directory.
///
/// Called once before the loop starts, so an invalid directory fails the
/// supervisor before any launch.
pub fn resolve_workdir(path: &Path) -> Result<PathBuf> {
    let resolved = path
        .canonicalize()
        .with_context(|| format!("resolve workdir {}", path.display()))?;
    if !resolved.is_dir() {
        bail!("workdir {} is not a directory", resolved.display());
    }
    Ok(resolved)
}
