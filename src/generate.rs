//! Seam to the external generator that produces field values.
//!
//! Prompting and model choice live outside this crate. The generator receives
//! a JSON [`GenerationRequest`] on stdin describing what the repository's
//! component document currently says, and must print a fields object
//! (`keywords`, `summary`, `description`) on stdout.
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::document::{Dialect, Document};
use crate::fields::{parse_fields, Description, FieldSet};
use crate::patch::markup::text_content;
use crate::patch::outline::Outline;
use crate::util::truncate_string;

const STDERR_SNIPPET_BYTES: usize = 2000;

/// What the generator knows about the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl GenerationRequest {
    /// Read the current metadata out of a component document.
    pub fn from_document(document: &Document) -> Self {
        if document.dialect != Dialect::Component {
            return Self::default();
        }
        let content = &document.content;
        let outline = Outline::scan(content);
        let element_text = |name: &str| {
            outline
                .child(name)
                .and_then(|element| element.inner())
                .map(|inner| text_content(&content[inner]))
                .filter(|text| !text.is_empty())
        };
        let keywords: Vec<String> = outline
            .child("keywords")
            .map(|keywords| {
                outline
                    .children_of(keywords)
                    .filter(|child| child.name == "keyword" && !child.translated)
                    .filter_map(|child| child.inner())
                    .map(|inner| text_content(&content[inner]))
                    .filter(|text| !text.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            app_id: element_text("id"),
            name: element_text("name"),
            summary: element_text("summary"),
            description: element_text("description"),
            keywords,
        }
    }
}

/// Produces field values for one application.
pub trait FieldGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<FieldSet>;
}

/// Runs a user-configured local command as the generator.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    argv: Vec<String>,
}

impl CommandGenerator {
    /// Split `command` shell-style and resolve its program on `PATH`.
    pub fn new(command: &str) -> Result<Self> {
        let mut argv =
            shell_words::split(command).with_context(|| format!("parse LM command: {command}"))?;
        if argv.is_empty() {
            return Err(anyhow!("LM command is empty"));
        }
        let program = which::which(&argv[0])
            .with_context(|| format!("resolve LM command program {}", argv[0]))?;
        argv[0] = program.to_string_lossy().into_owned();
        Ok(Self { argv })
    }
}

impl FieldGenerator for CommandGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<FieldSet> {
        let input = serde_json::to_vec_pretty(request).context("serialize generation request")?;
        let start = Instant::now();
        let mut child = Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn LM command: {}", self.argv[0]))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&input)
                .context("write request to LM stdin")?;
        }
        let output = child.wait_with_output().context("wait for LM command")?;
        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            request_bytes = input.len(),
            response_bytes = output.stdout.len(),
            "lm invoke complete"
        );
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "LM command failed with status {}: {}",
                output.status,
                truncate_string(stderr.trim(), STDERR_SNIPPET_BYTES)
            ));
        }
        let stdout = String::from_utf8(output.stdout).context("decode LM stdout as UTF-8")?;
        let mut fields = parse_fields(&stdout).context("parse LM response")?;
        // Generators often answer with prose instead of block markup.
        if let Some(description) = fields.description.as_mut() {
            if !description.trim_start().starts_with('<') {
                *description = Description::from_plain_text(description);
            }
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::classify;
    use std::path::Path;

    fn component(content: &str) -> Document {
        let classification = classify(Path::new("a.metainfo.xml")).expect("classified");
        Document::new("a.metainfo.xml", classification, content.to_string())
    }

    #[test]
    fn request_reads_current_metadata() {
        let doc = component(
            "<component>\n  <id>org.example.App</id>\n  <name>Example &amp; Co</name>\n  <name xml:lang=\"de\">Beispiel</name>\n  <description>\n    <p>Does  things.</p>\n  </description>\n  <keywords>\n    <keyword>Edit</keyword>\n    <keyword xml:lang=\"de\">Bearbeiten</keyword>\n  </keywords>\n</component>\n",
        );
        let request = GenerationRequest::from_document(&doc);
        assert_eq!(
            request,
            GenerationRequest {
                app_id: Some("org.example.App".to_string()),
                name: Some("Example &amp; Co".to_string()),
                summary: None,
                description: Some("Does things.".to_string()),
                keywords: vec!["Edit".to_string()],
            }
        );
    }

    #[test]
    fn desktop_documents_give_empty_request() {
        let classification = classify(Path::new("a.desktop")).expect("classified");
        let doc = Document::new("a.desktop", classification, "[Desktop Entry]\n".to_string());
        assert_eq!(GenerationRequest::from_document(&doc), GenerationRequest::default());
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(CommandGenerator::new("   ").is_err());
        assert!(CommandGenerator::new("'unterminated").is_err());
    }

    #[test]
    fn command_generator_parses_stdout() {
        if which::which("sh").is_err() {
            return;
        }
        let generator = CommandGenerator::new(
            r#"sh -c 'cat >/dev/null; printf "%s" "{\"summary\": \"Edit text\"}"'"#,
        )
        .expect("build generator");
        let fields = generator
            .generate(&GenerationRequest::default())
            .expect("generate fields");
        assert_eq!(fields.summary.as_deref(), Some("Edit text"));
    }

    #[test]
    fn prose_descriptions_are_converted_to_markup() {
        if which::which("sh").is_err() {
            return;
        }
        let generator = CommandGenerator::new(
            r#"sh -c 'cat >/dev/null; printf "%s" "{\"description\": \"Edits text.\"}"'"#,
        )
        .expect("build generator");
        let fields = generator
            .generate(&GenerationRequest::default())
            .expect("generate fields");
        assert_eq!(fields.description.as_deref(), Some("<p>Edits text.</p>"));
    }

    #[test]
    fn failing_command_reports_stderr() {
        if which::which("sh").is_err() {
            return;
        }
        let generator = CommandGenerator::new(r#"sh -c 'cat >/dev/null; echo boom >&2; exit 3'"#)
            .expect("build generator");
        let err = generator
            .generate(&GenerationRequest::default())
            .expect_err("command fails");
        assert!(err.to_string().contains("boom"));
    }
}
