//! Metadata document classification and discovery.
//!
//! Classification is filename-only: the dialect never depends on content, so a
//! misnamed file is simply not picked up.
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const TEMPLATE_SUFFIX: &str = ".in";
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn", "target", "node_modules", ".flatpak-builder"];

/// Supported document dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Desktop-entry style `Key=Value` lines under `[Section]` headers.
    KeyValue,
    /// AppStream-style `<component>` descriptor.
    Component,
}

impl Dialect {
    pub fn label(self) -> &'static str {
        match self {
            Dialect::KeyValue => "desktop entry",
            Dialect::Component => "metainfo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub dialect: Dialect,
    pub is_template: bool,
}

/// Classify a path by filename, or `None` when it is not a metadata document.
pub fn classify(path: &Path) -> Option<Classification> {
    let name = path.file_name()?.to_str()?;
    let (name, is_template) = match name.strip_suffix(TEMPLATE_SUFFIX) {
        Some(stripped) => (stripped, true),
        None => (name, false),
    };
    let dialect = if name.ends_with(".desktop") {
        Dialect::KeyValue
    } else if name.contains(".metainfo.xml") || name.contains(".appdata.xml") {
        Dialect::Component
    } else {
        return None;
    };
    Some(Classification {
        dialect,
        is_template,
    })
}

/// A metadata document loaded for one processing pass.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub dialect: Dialect,
    pub is_template: bool,
    pub content: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, classification: Classification, content: String) -> Self {
        Self {
            path: path.into(),
            dialect: classification.dialect,
            is_template: classification.is_template,
            content,
        }
    }

    /// Read and classify a document; `Ok(None)` for unrecognised filenames.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let Some(classification) = classify(path) else {
            return Ok(None);
        };
        let content =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Ok(Some(Self::new(path, classification, content)))
    }
}

/// A classified file found under a repository root.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    #[serde(flatten)]
    pub classification: Classification,
}

/// Walk `root` and return every classified metadata file, sorted by path.
pub fn discover(root: &Path) -> Result<Vec<DiscoveredFile>> {
    let mut found = Vec::new();
    walk(root, &mut found)?;
    found.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(root = %root.display(), count = found.len(), "discovery complete");
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<DiscoveredFile>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        // `Path::is_dir`/`is_file` follow symlinks, so linked files are found.
        if path.is_dir() {
            let skip = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| SKIPPED_DIRS.contains(&name));
            if !skip {
                walk(&path, found)?;
            }
        } else if path.is_file() {
            if let Some(classification) = classify(&path) {
                found.push(DiscoveredFile {
                    path,
                    classification,
                });
            }
        }
    }
    Ok(())
}
