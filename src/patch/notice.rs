//! Preserved notices in regenerated descriptions.
//!
//! A notice is a paragraph (for example a trademark disclaimer) injected into
//! a description by someone other than the generator. Regenerating the
//! description must carry every such notice over.
use anyhow::{Context, Result};
use regex::Regex;

use super::markup::text_content;
use super::outline::{Element, Outline};
use crate::config::PatchConfig;

/// Decides whether a description paragraph must survive regeneration.
pub trait NoticePredicate {
    fn is_preserved_notice(&self, text: &str) -> bool;
}

impl<F> NoticePredicate for F
where
    F: Fn(&str) -> bool,
{
    fn is_preserved_notice(&self, text: &str) -> bool {
        self(text)
    }
}

/// Regex-backed predicate, matched against normalized paragraph text.
#[derive(Debug, Clone)]
pub struct NoticePattern(Regex);

impl NoticePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex =
            Regex::new(pattern).with_context(|| format!("compile notice pattern {pattern:?}"))?;
        Ok(Self(regex))
    }

    pub fn from_config(config: &PatchConfig) -> Result<Self> {
        Self::new(&config.notice_pattern)
    }
}

impl NoticePredicate for NoticePattern {
    fn is_preserved_notice(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

/// Normalized text of every notice under `description`, deduplicated
/// ignoring case and whitespace, in document order.
pub(crate) fn collect_notices(
    content: &str,
    outline: &Outline,
    description: &Element,
    predicate: &dyn NoticePredicate,
) -> Vec<String> {
    let mut notices: Vec<String> = Vec::new();
    for child in outline.children_of(description) {
        let text = text_content(&content[child.start()..child.end()]);
        if text.is_empty() || !predicate.is_preserved_notice(&text) {
            continue;
        }
        let key = squash(&text);
        if !notices.iter().any(|seen| squash(seen) == key) {
            notices.push(text);
        }
    }
    notices
}

/// Notices whose text does not already appear in `markup`, ignoring case and
/// whitespace.
pub(crate) fn missing_notices<'n>(notices: &'n [String], markup: &str) -> Vec<&'n str> {
    let haystack = squash(&text_content(markup));
    notices
        .iter()
        .filter(|notice| !haystack.contains(&squash(notice)))
        .map(String::as_str)
        .collect()
}

fn squash(text: &str) -> String {
    text.chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
