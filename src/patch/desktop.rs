//! Desktop-entry (`Key=Value`) strategy. Only the keyword field applies.
use regex::Regex;
use std::sync::OnceLock;

use super::{Patched, Placement};

const DESKTOP_ENTRY_HEADER: &str = "[Desktop Entry]";

fn keywords_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^Keywords=.*$").expect("regex for keywords line"))
}

/// `Keywords=a;b;c;`, or `Keywords=;` for an empty list.
pub fn render_keywords_line(tokens: &[String]) -> String {
    if tokens.is_empty() {
        return "Keywords=;".to_string();
    }
    let mut line = String::from("Keywords=");
    for token in tokens {
        line.push_str(token);
        line.push(';');
    }
    line
}

/// Replace the first `Keywords=` line and drop later ones in the same group,
/// else insert after `[Desktop Entry]`, else append.
pub fn patch_keywords(content: &str, tokens: &[String]) -> Patched {
    let line = render_keywords_line(tokens);

    let mut matches = keywords_line_regex().find_iter(content);
    if let Some(first) = matches.next() {
        let group_end = next_group_start(content, first.end());
        let mut out = String::with_capacity(content.len() + line.len());
        out.push_str(&content[..first.start()]);
        out.push_str(&line);
        // `.*` stops before `\n` but would keep a CRLF `\r`.
        let mut cursor = if content[..first.end()].ends_with('\r') {
            first.end() - 1
        } else {
            first.end()
        };
        for duplicate in matches.take_while(|found| found.start() < group_end) {
            out.push_str(&content[cursor..duplicate.start()]);
            cursor = duplicate.end();
            if content[cursor..].starts_with('\n') {
                cursor += 1;
            }
        }
        out.push_str(&content[cursor..]);
        return Patched::new(out, Placement::Replaced);
    }

    if let Some(header_end) = desktop_entry_header_end(content) {
        let mut out = String::with_capacity(content.len() + line.len() + 1);
        out.push_str(&content[..header_end]);
        if !content[..header_end].ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&line);
        out.push('\n');
        out.push_str(&content[header_end..]);
        return Patched::new(out, Placement::Inserted);
    }

    let mut out = String::with_capacity(content.len() + line.len() + 2);
    out.push_str(content);
    out.push('\n');
    out.push_str(&line);
    out.push('\n');
    Patched::new(out, Placement::Appended)
}

/// Start of the next `[Group]` header line after `from`, or the end.
fn next_group_start(content: &str, from: usize) -> usize {
    content[from..]
        .find("\n[")
        .map_or(content.len(), |offset| from + offset + 1)
}

/// Byte offset just past the first `[Desktop Entry]` line, newline included.
fn desktop_entry_header_end(content: &str) -> Option<usize> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        offset += line.len();
        if line.trim() == DESKTOP_ENTRY_HEADER {
            return Some(offset);
        }
    }
    None
}
