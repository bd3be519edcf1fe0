//! Component descriptor (`<component>`) strategies for keywords, summary and
//! description.
//!
//! Lookups go through [`Outline`], so only direct, untranslated children of
//! the root element are ever replaced or used as anchors.
use super::markup::{
    append_line, escape_xml, indent_before, insert_after, insert_before, prepend_line,
    replace_span,
};
use super::notice::{collect_notices, missing_notices, NoticePredicate};
use super::outline::{Element, Outline};
use super::{Patched, Placement};
use crate::config::PatchConfig;

/// Indent of an existing element's tag, or the configured default.
fn base_indent(content: &str, existing: Option<&Element>, config: &PatchConfig) -> String {
    existing
        .and_then(|element| indent_before(content, element.start()))
        .map(str::to_string)
        .unwrap_or_else(|| config.indent_unit())
}

pub fn render_keywords_block(tokens: &[String], base: &str, unit: &str) -> String {
    if tokens.is_empty() {
        return format!("{base}<keywords></keywords>");
    }
    let mut block = format!("{base}<keywords>\n");
    for token in tokens {
        block.push_str(&format!("{base}{unit}<keyword>{}</keyword>\n", escape_xml(token)));
    }
    block.push_str(&format!("{base}</keywords>"));
    block
}

/// Replace `<keywords>`, else insert before `</component>`, else append.
pub fn patch_keywords(content: &str, tokens: &[String], config: &PatchConfig) -> Patched {
    let outline = Outline::scan(content);
    let existing = outline.child("keywords");
    let base = base_indent(content, existing, config);
    let block = render_keywords_block(tokens, &base, &config.indent_unit());

    if let Some(existing) = existing {
        let out = replace_span(content, existing.start(), existing.end(), &block);
        return Patched::new(out, Placement::Replaced);
    }
    place_before_root_close(content, &outline, &block)
}

/// Replace `<summary>`, else insert after `<name>`, else after the opening
/// `<component>` tag, else prepend.
pub fn patch_summary(content: &str, summary: &str, config: &PatchConfig) -> Patched {
    let outline = Outline::scan(content);
    let existing = outline.child("summary");
    let base = base_indent(content, existing, config);
    let block = format!("{base}<summary>{}</summary>", escape_xml(summary));

    if let Some(existing) = existing {
        let out = replace_span(content, existing.start(), existing.end(), &block);
        return Patched::new(out, Placement::Replaced);
    }
    if let Some(name) = outline.child("name") {
        return Patched::new(insert_after(content, name.end(), &block), Placement::Inserted);
    }
    if let Some(root) = outline.root_element() {
        return Patched::new(
            insert_after(content, root.open.end, &block),
            Placement::Inserted,
        );
    }
    Patched::new(prepend_line(content, &block), Placement::Prepended)
}

/// Replace `<description>` (carrying over preserved notices), else insert
/// after `<summary>`, else after `<name>`, else before `</component>`, else
/// append.
pub fn patch_description(
    content: &str,
    description: &str,
    config: &PatchConfig,
    notices: &dyn NoticePredicate,
) -> Patched {
    let outline = Outline::scan(content);
    let existing = outline.child("description");
    let base = base_indent(content, existing, config);
    let inner_indent = format!("{base}{}", config.indent_unit());

    let mut lines: Vec<String> = description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("{inner_indent}{line}"))
        .collect();

    if let Some(existing) = existing {
        let preserved = collect_notices(content, &outline, existing, notices);
        let body = lines.join("\n");
        for notice in missing_notices(&preserved, &body) {
            tracing::debug!(notice, "carrying preserved notice into new description");
            lines.push(format!("{inner_indent}<p>{notice}</p>"));
        }
    }

    let mut block = format!("{base}<description>\n");
    for line in &lines {
        block.push_str(line);
        block.push('\n');
    }
    block.push_str(&format!("{base}</description>"));

    if let Some(existing) = existing {
        let out = replace_span(content, existing.start(), existing.end(), &block);
        return Patched::new(out, Placement::Replaced);
    }
    if let Some(anchor) = outline.child("summary").or_else(|| outline.child("name")) {
        return Patched::new(insert_after(content, anchor.end(), &block), Placement::Inserted);
    }
    place_before_root_close(content, &outline, &block)
}

fn place_before_root_close(content: &str, outline: &Outline, block: &str) -> Patched {
    let close = outline
        .root_element()
        .and_then(|root| root.close.as_ref())
        .filter(|close| !close.is_empty());
    match close {
        Some(close) => Patched::new(insert_before(content, close.start, block), Placement::Inserted),
        None => Patched::new(append_line(content, block), Placement::Appended),
    }
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
