//! Patch configuration.
//!
//! Loads, validates, and defaults the knobs the patcher would otherwise embed
//! as literals (indent width, caps, the preserved-notice pattern).
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_NOTICE_PATTERN: &str = r"(?i)^\s*NOTE:\s*This application";
const CONFIG_DIR_NAME: &str = "appmeta";
const CONFIG_FILE_NAME: &str = "config.json";
const LM_COMMAND_ENV: &str = "APPMETA_LM_COMMAND";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatchConfig {
    pub schema_version: u32,
    /// Spaces per indentation level in component documents.
    pub indent_width: usize,
    pub max_keywords: usize,
    pub max_summary_chars: usize,
    /// Regex deciding which description paragraphs survive regeneration.
    pub notice_pattern: String,
    /// Patch `.in` template files alongside rendered ones.
    pub include_templates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lm_command: Option<String>,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            indent_width: 4,
            max_keywords: 8,
            max_summary_chars: 35,
            notice_pattern: DEFAULT_NOTICE_PATTERN.to_string(),
            include_templates: true,
            lm_command: None,
        }
    }
}

impl PatchConfig {
    /// One indentation unit as a string.
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }
}

/// Default config location under the user's config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load config from an explicit path, the user config dir, or defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<PatchConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|path| path.is_file()) {
            Some(path) => path,
            None => return Ok(PatchConfig::default()),
        },
    };
    let config = read_config(&path)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn read_config(path: &Path) -> Result<PatchConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: PatchConfig = serde_json::from_slice(&bytes).context("parse config JSON")?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &PatchConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.indent_width == 0 {
        return Err(anyhow!("indent_width must be at least 1"));
    }
    if config.max_keywords == 0 {
        return Err(anyhow!("max_keywords must be at least 1"));
    }
    if config.max_summary_chars == 0 {
        return Err(anyhow!("max_summary_chars must be at least 1"));
    }
    Regex::new(&config.notice_pattern)
        .with_context(|| format!("compile notice_pattern {:?}", config.notice_pattern))?;
    if let Some(command) = config.lm_command.as_deref() {
        if command.trim().is_empty() {
            return Err(anyhow!("lm_command must be non-empty when set"));
        }
    }
    Ok(())
}

/// Resolve the generator command: flag, then config, then environment.
pub fn resolve_lm_command(flag: Option<&str>, config: &PatchConfig) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| config.lm_command.clone())
        .or_else(|| std::env::var(LM_COMMAND_ENV).ok())
        .filter(|command| !command.trim().is_empty())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
