//! Writes patched documents back to the repository.
//!
//! Each document is written through a temp file in its own directory and then
//! renamed over the original, so a failed write never leaves a truncated file.
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn write_document(path: &Path, content: &str) -> Result<()> {
    // Resolve symlinks so the rename replaces the target, not the link.
    let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let path = resolved.as_path();
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(path).map(|meta| meta.permissions()).ok();

    let mut tmp = tempfile::Builder::new()
        .prefix(".appmeta-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .with_context(|| format!("create temp file in {}", parent.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("write {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync {}", tmp.path().display()))?;
    if let Some(permissions) = permissions {
        fs::set_permissions(tmp.path(), permissions)
            .with_context(|| format!("copy permissions to {}", tmp.path().display()))?;
    }
    tmp.persist(path)
        .map_err(|err| anyhow!("publish {}: {}", path.display(), err.error))?;
    Ok(())
}
