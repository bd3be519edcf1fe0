//! Run report and human-readable change summary.
//!
//! The JSON form is for tooling; the text form doubles as a commit message
//! body for whoever opens the merge request.
use serde::Serialize;
use std::collections::BTreeSet;

use crate::document::Dialect;
use crate::fields::Field;
use crate::orchestrate::{FieldReport, FieldStatus};
use crate::patch::Placement;

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    /// Path relative to the repository root.
    pub path: String,
    pub dialect: Dialect,
    pub is_template: bool,
    pub changed: bool,
    pub written: bool,
    pub fields: Vec<FieldReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub schema_version: u32,
    pub repo: String,
    pub dry_run: bool,
    pub documents: Vec<DocumentReport>,
    /// Templates excluded by configuration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_templates: Vec<String>,
}

impl RunReport {
    pub fn new(repo: String, dry_run: bool) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            repo,
            dry_run,
            documents: Vec::new(),
            skipped_templates: Vec::new(),
        }
    }

    pub fn changed_documents(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|doc| doc.changed)
    }

    pub fn has_errors(&self) -> bool {
        self.documents.iter().any(|doc| doc.error.is_some())
    }

    /// Fields that changed at least one document, in patch order.
    pub fn changed_fields(&self) -> Vec<Field> {
        let fields: BTreeSet<Field> = self
            .documents
            .iter()
            .flat_map(|doc| doc.fields.iter())
            .filter(|report| {
                matches!(report.status, FieldStatus::Applied { changed: true, .. })
            })
            .map(|report| report.field)
            .collect();
        fields.into_iter().collect()
    }

    /// Title line plus one bullet per changed file, or `None` when nothing
    /// changed.
    pub fn change_summary(&self) -> Option<String> {
        let fields = self.changed_fields();
        if fields.is_empty() {
            return None;
        }
        let mut out = format!("Update {}\n\n", join_fields(&fields));
        for doc in self.changed_documents() {
            let changed: Vec<Field> = doc
                .fields
                .iter()
                .filter(|report| {
                    matches!(report.status, FieldStatus::Applied { changed: true, .. })
                })
                .map(|report| report.field)
                .collect();
            out.push_str(&format!("- {}: {}\n", doc.path, join_fields(&changed)));
        }
        Some(out)
    }

    /// Multi-line status listing for terminal output.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for doc in &self.documents {
            let marker = match (&doc.error, doc.changed) {
                (Some(_), _) => "error",
                (None, true) if doc.written => "updated",
                (None, true) => "would update",
                (None, false) => "unchanged",
            };
            out.push_str(&format!("{marker}: {} ({})\n", doc.path, doc.dialect.label()));
            if let Some(error) = &doc.error {
                out.push_str(&format!("  {error}\n"));
            }
            for report in &doc.fields {
                out.push_str(&format!("  {}: {}\n", report.field, status_text(&report.status)));
            }
        }
        for path in &self.skipped_templates {
            out.push_str(&format!("skipped template: {path}\n"));
        }
        out
    }
}

fn status_text(status: &FieldStatus) -> String {
    match status {
        FieldStatus::Applied {
            changed: false, ..
        } => "already up to date".to_string(),
        FieldStatus::Applied { placement, .. } => match placement {
            Placement::Replaced => "replaced".to_string(),
            Placement::Inserted => "inserted".to_string(),
            Placement::Appended => "appended at end (no anchor found)".to_string(),
            Placement::Prepended => "prepended at start (no anchor found)".to_string(),
        },
        FieldStatus::SkippedUnsupported => "not supported for this file type".to_string(),
        FieldStatus::Rejected { reason } => format!("rejected: {reason}"),
    }
}

fn join_fields(fields: &[Field]) -> String {
    let names: Vec<&str> = fields.iter().map(|field| field.as_str()).collect();
    match names.as_slice() {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
