//! Metadata field values and their upstream validation.
//!
//! Generated values arrive as loose JSON; everything here normalizes them into
//! the shapes the patcher expects, or rejects them before any document is
//! touched.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

use crate::patch::markup::escape_xml;
use crate::patch::outline::Outline;

const BLOCK_TAGS: &[&str] = &["<p>", "<p ", "<ul>", "<ul ", "<ol>", "<ol "];

/// A named metadata field, in patch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Keywords,
    Summary,
    Description,
}

impl Field {
    /// Fixed patch order; description placement depends on summary.
    pub const ORDER: [Field; 3] = [Field::Keywords, Field::Summary, Field::Description];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Keywords => "keywords",
            Field::Summary => "summary",
            Field::Description => "description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw generated values for one run. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSet {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_none() && self.summary.is_none() && self.description.is_none()
    }

    /// Fields carrying a value, in patch order.
    pub fn requested(&self) -> Vec<Field> {
        Field::ORDER
            .into_iter()
            .filter(|field| match field {
                Field::Keywords => self.keywords.is_some(),
                Field::Summary => self.summary.is_some(),
                Field::Description => self.description.is_some(),
            })
            .collect()
    }

    /// Drop every field not listed in `only`. An empty list keeps everything.
    pub fn restrict(&mut self, only: &[Field]) {
        if only.is_empty() {
            return;
        }
        if !only.contains(&Field::Keywords) {
            self.keywords = None;
        }
        if !only.contains(&Field::Summary) {
            self.summary = None;
        }
        if !only.contains(&Field::Description) {
            self.description = None;
        }
    }
}

/// Normalized keyword tokens: lowercase, trimmed, deduplicated, capped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keywords(Vec<String>);

impl Keywords {
    pub fn normalize(raw: &[String], max: usize) -> Result<Self> {
        let mut tokens: Vec<String> = Vec::new();
        for token in raw {
            let token = collapse_whitespace(token).to_lowercase();
            if token.is_empty() || tokens.contains(&token) {
                continue;
            }
            // `;` separates desktop-entry list items.
            if token.contains(';') || token.chars().any(char::is_control) {
                tracing::warn!(token = ?token, "dropping keyword with separator or control character");
                continue;
            }
            tokens.push(token);
        }
        if tokens.is_empty() {
            return Err(anyhow!("no usable keywords"));
        }
        if tokens.len() > max {
            tracing::debug!(dropped = tokens.len() - max, "keyword list capped");
            tokens.truncate(max);
        }
        Ok(Self(tokens))
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }
}

/// Summaries past this multiple of the target length are rejected.
const SUMMARY_CEILING_FACTOR: usize = 2;

/// A single-line summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary(String);

impl Summary {
    /// `target_chars` is the recommended length: longer values are kept with
    /// a warning, values past twice the target are rejected.
    pub fn normalize(raw: &str, target_chars: usize) -> Result<Self> {
        let line = collapse_whitespace(raw);
        if line.is_empty() {
            return Err(anyhow!("summary is empty"));
        }
        let len = line.chars().count();
        let ceiling = target_chars.saturating_mul(SUMMARY_CEILING_FACTOR);
        if len > ceiling {
            return Err(anyhow!(
                "summary is {len} characters (limit {ceiling}): {line:?}"
            ));
        }
        if len > target_chars {
            tracing::warn!(len, target = target_chars, "summary longer than recommended");
        }
        Ok(Self(line))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Description block markup (`<p>`, `<ul>`, `<ol>` elements).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn normalize(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("description is empty"));
        }
        if !BLOCK_TAGS.iter().any(|tag| trimmed.starts_with(tag)) {
            return Err(anyhow!(
                "description must start with a <p>, <ul> or <ol> element"
            ));
        }
        if !Outline::scan(trimmed).is_balanced() {
            return Err(anyhow!("description markup has unclosed or stray tags"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Convert plain prose into block markup.
    ///
    /// Blank lines separate paragraphs; runs of `- ` or `* ` lines become a
    /// `<ul>` list. Text is XML-escaped.
    pub fn from_plain_text(text: &str) -> String {
        let mut blocks = Vec::new();
        for chunk in text.split("\n\n") {
            let lines: Vec<&str> = chunk
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();
            if lines.is_empty() {
                continue;
            }
            let mut paragraph: Vec<&str> = Vec::new();
            let mut items: Vec<&str> = Vec::new();
            for line in lines {
                if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
                    flush_paragraph(&mut paragraph, &mut blocks);
                    items.push(item);
                } else {
                    flush_list(&mut items, &mut blocks);
                    paragraph.push(line);
                }
            }
            flush_paragraph(&mut paragraph, &mut blocks);
            flush_list(&mut items, &mut blocks);
        }
        blocks.join("\n")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn flush_paragraph(paragraph: &mut Vec<&str>, blocks: &mut Vec<String>) {
    if paragraph.is_empty() {
        return;
    }
    blocks.push(format!("<p>{}</p>", escape_xml(&paragraph.join(" "))));
    paragraph.clear();
}

fn flush_list(items: &mut Vec<&str>, blocks: &mut Vec<String>) {
    if items.is_empty() {
        return;
    }
    let mut list = String::from("<ul>\n");
    for item in items.iter() {
        list.push_str(&format!("<li>{}</li>\n", escape_xml(item.trim())));
    }
    list.push_str("</ul>");
    blocks.push(list);
    items.clear();
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Load a fields file written by hand or by a generator.
pub fn load_fields(path: &Path) -> Result<FieldSet> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_fields(&text).with_context(|| format!("parse fields {}", path.display()))
}

/// Parse a fields object, tolerating code fences and surrounding prose.
pub fn parse_fields(text: &str) -> Result<FieldSet> {
    let cleaned = strip_code_fences(text);
    let value: Value = match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(err) => extract_json_from_text(&cleaned)
            .ok_or_else(|| anyhow!("fields JSON failed to parse: {err}"))?,
    };
    if !value.is_object() {
        return Err(anyhow!("fields JSON must be an object"));
    }
    let fields: FieldSet = serde_json::from_value(value).context("parse fields JSON")?;
    Ok(fields)
}

fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let mut lines: Vec<&str> = trimmed.lines().collect();
    if lines
        .first()
        .is_some_and(|first| first.trim_start().starts_with("```"))
    {
        lines.remove(0);
    }
    if lines
        .last()
        .is_some_and(|last| last.trim_start().starts_with("```"))
    {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

fn extract_json_from_text(raw: &str) -> Option<Value> {
    for (idx, ch) in raw.char_indices() {
        if ch != '{' {
            continue;
        }
        let mut deserializer = serde_json::Deserializer::from_str(&raw[idx..]);
        if let Ok(value) = Value::deserialize(&mut deserializer) {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
#[path = "fields_tests.rs"]
mod tests;
