//! Text helpers shared by the dialect strategies: escaping, indentation
//! detection, and line-aware splicing.

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Byte offset of the start of the line containing `pos`.
pub(crate) fn line_start(content: &str, pos: usize) -> usize {
    content[..pos].rfind('\n').map_or(0, |idx| idx + 1)
}

/// Leading whitespace of the line containing `pos`, when nothing but
/// whitespace precedes `pos` on that line.
pub(crate) fn indent_before(content: &str, pos: usize) -> Option<&str> {
    let prefix = &content[line_start(content, pos)..pos];
    prefix
        .chars()
        .all(|ch| ch == ' ' || ch == '\t')
        .then_some(prefix)
}

/// Replace `start..end` with `block`.
///
/// `block` carries its own leading indent. When the span starts its line the
/// old indent is replaced too; otherwise the block is spliced inline.
pub(crate) fn replace_span(content: &str, start: usize, end: usize, block: &str) -> String {
    let (from, text) = match indent_before(content, start) {
        Some(_) => (line_start(content, start), block),
        None => (start, block.trim_start()),
    };
    let mut out = String::with_capacity(content.len() + block.len());
    out.push_str(&content[..from]);
    out.push_str(text);
    out.push_str(&content[end..]);
    out
}

/// Insert `block` on a new line after the tag ending at `pos`.
pub(crate) fn insert_after(content: &str, pos: usize, block: &str) -> String {
    let mut out = String::with_capacity(content.len() + block.len() + 1);
    out.push_str(&content[..pos]);
    out.push('\n');
    out.push_str(block);
    out.push_str(&content[pos..]);
    out
}

/// Insert `block` on its own line before the tag starting at `pos`.
pub(crate) fn insert_before(content: &str, pos: usize, block: &str) -> String {
    let mut out = String::with_capacity(content.len() + block.len() + 2);
    match indent_before(content, pos) {
        Some(_) => {
            let at = line_start(content, pos);
            out.push_str(&content[..at]);
            out.push_str(block);
            out.push('\n');
            out.push_str(&content[at..]);
        }
        None => {
            out.push_str(&content[..pos]);
            out.push('\n');
            out.push_str(block);
            out.push('\n');
            out.push_str(&content[pos..]);
        }
    }
    out
}

/// Append `block` as the last line of the document.
pub(crate) fn append_line(content: &str, block: &str) -> String {
    let mut out = String::with_capacity(content.len() + block.len() + 2);
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(block);
    out.push('\n');
    out
}

/// Prepend `block` as the first line of the document.
pub(crate) fn prepend_line(content: &str, block: &str) -> String {
    let mut out = String::with_capacity(content.len() + block.len() + 1);
    out.push_str(block);
    out.push('\n');
    out.push_str(content);
    out
}

/// Text content of a markup fragment: tags dropped, whitespace collapsed.
pub(crate) fn text_content(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    crate::fields::collapse_whitespace(&text)
}
