//! Minimal structural walk over component documents.
//!
//! Tracks element open/close spans and nesting so edits can target direct
//! children of `<component>` without matching nested `<release>` descriptions
//! or translated variants. Comments, CDATA, processing instructions and
//! declarations are skipped; malformed markup yields unclosed elements rather
//! than errors.
use std::ops::Range;

const ROOT_ELEMENT: &str = "component";

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) name: String,
    pub(crate) depth: usize,
    pub(crate) parent: Option<usize>,
    /// Span of the opening (or self-closing) tag.
    pub(crate) open: Range<usize>,
    /// Span of the closing tag; empty at `open.end` for self-closing tags.
    pub(crate) close: Option<Range<usize>>,
    /// Carries an `xml:lang` attribute.
    pub(crate) translated: bool,
}

impl Element {
    pub(crate) fn start(&self) -> usize {
        self.open.start
    }

    /// End of the whole element, or of its opening tag when never closed.
    pub(crate) fn end(&self) -> usize {
        self.close.as_ref().map_or(self.open.end, |close| close.end)
    }

    pub(crate) fn inner(&self) -> Option<Range<usize>> {
        self.close
            .as_ref()
            .map(|close| self.open.end..close.start.max(self.open.end))
    }
}

#[derive(Debug, Default)]
pub(crate) struct Outline {
    elements: Vec<Element>,
    /// Closing tags with no matching open element.
    stray_closes: usize,
}

enum Token {
    Open {
        name: String,
        span: Range<usize>,
        self_closing: bool,
        translated: bool,
    },
    Close {
        name: String,
        span: Range<usize>,
    },
}

impl Outline {
    pub(crate) fn scan(content: &str) -> Self {
        let mut elements: Vec<Element> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut stray_closes = 0;
        for token in tokens(content) {
            match token {
                Token::Open {
                    name,
                    span,
                    self_closing,
                    translated,
                } => {
                    let close = self_closing.then(|| span.end..span.end);
                    elements.push(Element {
                        name,
                        depth: stack.len(),
                        parent: stack.last().copied(),
                        open: span,
                        close,
                        translated,
                    });
                    if !self_closing {
                        stack.push(elements.len() - 1);
                    }
                }
                Token::Close { name, span } => {
                    let Some(pos) = stack.iter().rposition(|&idx| elements[idx].name == name)
                    else {
                        stray_closes += 1;
                        continue;
                    };
                    let idx = stack[pos];
                    stack.truncate(pos);
                    elements[idx].close = Some(span);
                }
            }
        }
        Self {
            elements,
            stray_closes,
        }
    }

    /// Every element is closed and every closing tag matched an open one.
    pub(crate) fn is_balanced(&self) -> bool {
        self.stray_closes == 0 && self.elements.iter().all(|element| element.close.is_some())
    }

    /// Index of the root `<component>` element.
    pub(crate) fn root(&self) -> Option<usize> {
        self.elements
            .iter()
            .position(|element| element.depth == 0 && element.name == ROOT_ELEMENT)
    }

    pub(crate) fn root_element(&self) -> Option<&Element> {
        self.root().map(|idx| &self.elements[idx])
    }

    /// First untranslated element named `name` directly under the root, or at
    /// top level when the document has no `<component>`.
    pub(crate) fn child(&self, name: &str) -> Option<&Element> {
        let root = self.root();
        self.elements.iter().find(|element| {
            let placed = match root {
                Some(root) => element.parent == Some(root),
                None => element.depth == 0,
            };
            placed && !element.translated && element.name == name
        })
    }

    /// Direct children of `parent`, in document order.
    pub(crate) fn children_of<'a>(
        &'a self,
        parent: &'a Element,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        let parent_idx = self
            .elements
            .iter()
            .position(|element| std::ptr::eq(element, parent));
        self.elements
            .iter()
            .filter(move |element| parent_idx.is_some() && element.parent == parent_idx)
    }
}

fn tokens(content: &str) -> Vec<Token> {
    let bytes = content.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while let Some(offset) = content[pos..].find('<') {
        let start = pos + offset;
        let rest = &content[start..];
        let skip_to = if rest.starts_with("<!--") {
            Some("-->")
        } else if rest.starts_with("<![CDATA[") {
            Some("]]>")
        } else if rest.starts_with("<?") {
            Some("?>")
        } else if rest.starts_with("<!") {
            Some(">")
        } else {
            None
        };
        if let Some(terminator) = skip_to {
            match rest.find(terminator) {
                Some(end) => {
                    pos = start + end + terminator.len();
                    continue;
                }
                None => break,
            }
        }

        let Some(end) = tag_end(bytes, start) else {
            break;
        };
        let tag = &content[start..end];
        if let Some(body) = tag.strip_prefix("</") {
            let name = body.trim_end_matches('>').trim();
            if !name.is_empty() {
                tokens.push(Token::Close {
                    name: name.to_string(),
                    span: start..end,
                });
            }
        } else {
            let body = &tag[1..tag.len() - 1];
            let name_len = body
                .find(|ch: char| ch.is_whitespace() || ch == '/' || ch == '>')
                .unwrap_or(body.len());
            let name = &body[..name_len];
            if name.is_empty() {
                pos = start + 1;
                continue;
            }
            let attrs = &body[name_len..];
            tokens.push(Token::Open {
                name: name.to_string(),
                span: start..end,
                self_closing: attrs.trim_end().ends_with('/'),
                translated: attrs.contains("xml:lang"),
            });
        }
        pos = end;
    }
    tokens
}

/// Position just past the `>` closing the tag at `start`, honoring quotes.
fn tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (idx, &byte) in bytes.iter().enumerate().skip(start + 1) {
        match quote {
            Some(q) if byte == q => quote = None,
            Some(_) => {}
            None => match byte {
                b'"' | b'\'' => quote = Some(byte),
                b'>' => return Some(idx + 1),
                _ => {}
            },
        }
    }
    None
}
