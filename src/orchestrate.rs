//! Sequences field patches over one document.
//!
//! Fields run in the fixed order keywords, summary, description; each step
//! consumes the previous step's content. A field that is rejected or
//! unsupported leaves the content untouched and never stops later fields.
use serde::Serialize;

use crate::document::{Dialect, Document};
use crate::fields::{Description, Field, FieldSet, Keywords, Summary};
use crate::patch::{FieldPatch, PatchOutcome, Patcher, Placement};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldStatus {
    Applied { placement: Placement, changed: bool },
    SkippedUnsupported,
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReport {
    pub field: Field,
    #[serde(flatten)]
    pub status: FieldStatus,
}

/// Field values validated once per run; a rejected value keeps its reason.
#[derive(Debug, Clone, Default)]
pub struct PreparedFields {
    keywords: Option<Result<Keywords, String>>,
    summary: Option<Result<Summary, String>>,
    description: Option<Result<Description, String>>,
}

impl PreparedFields {
    pub fn prepare(fields: &FieldSet, max_keywords: usize, max_summary_chars: usize) -> Self {
        let prepared = Self {
            keywords: fields
                .keywords
                .as_ref()
                .map(|raw| Keywords::normalize(raw, max_keywords).map_err(|err| err.to_string())),
            summary: fields
                .summary
                .as_ref()
                .map(|raw| Summary::normalize(raw, max_summary_chars).map_err(|err| err.to_string())),
            description: fields
                .description
                .as_ref()
                .map(|raw| Description::normalize(raw).map_err(|err| err.to_string())),
        };
        for field in Field::ORDER {
            if let Some(Err(reason)) = prepared.get(field) {
                tracing::warn!(%field, reason = %reason, "rejecting generated value");
            }
        }
        prepared
    }

    fn get(&self, field: Field) -> Option<Result<FieldPatch<'_>, &str>> {
        match field {
            Field::Keywords => self.keywords.as_ref().map(|value| match value {
                Ok(keywords) => Ok(FieldPatch::Keywords(keywords.tokens())),
                Err(reason) => Err(reason.as_str()),
            }),
            Field::Summary => self.summary.as_ref().map(|value| match value {
                Ok(summary) => Ok(FieldPatch::Summary(summary.as_str())),
                Err(reason) => Err(reason.as_str()),
            }),
            Field::Description => self.description.as_ref().map(|value| match value {
                Ok(description) => Ok(FieldPatch::Description(description.as_str())),
                Err(reason) => Err(reason.as_str()),
            }),
        }
    }
}

/// Final content of one document plus what happened to each field.
#[derive(Debug, Clone)]
pub struct DocumentPatch {
    pub content: String,
    pub fields: Vec<FieldReport>,
}

impl DocumentPatch {
    pub fn changed(&self) -> bool {
        self.fields.iter().any(|report| {
            matches!(
                report.status,
                FieldStatus::Applied { changed: true, .. }
            )
        })
    }
}

pub fn supports(dialect: Dialect, field: Field) -> bool {
    match dialect {
        Dialect::KeyValue => field == Field::Keywords,
        Dialect::Component => true,
    }
}

/// Apply every prepared field to `document` in patch order.
pub fn patch_document(
    document: &Document,
    fields: &PreparedFields,
    patcher: &Patcher<'_>,
) -> DocumentPatch {
    let mut content = document.content.clone();
    let mut reports = Vec::new();

    for field in Field::ORDER {
        let Some(value) = fields.get(field) else {
            continue;
        };
        let status = if !supports(document.dialect, field) {
            tracing::info!(
                path = %document.path.display(),
                %field,
                dialect = document.dialect.label(),
                "field not supported for dialect; skipped"
            );
            FieldStatus::SkippedUnsupported
        } else {
            match value {
                Err(reason) => FieldStatus::Rejected {
                    reason: reason.to_string(),
                },
                Ok(value) => match patcher.patch(document.dialect, &content, value) {
                    PatchOutcome::Unsupported => FieldStatus::SkippedUnsupported,
                    PatchOutcome::Applied(patched) => {
                        if patched.placement.is_fallback() {
                            tracing::warn!(
                                path = %document.path.display(),
                                %field,
                                placement = ?patched.placement,
                                "no anchor found; value placed at document edge"
                            );
                        }
                        let changed = patched.content != content;
                        content = patched.content;
                        FieldStatus::Applied {
                            placement: patched.placement,
                            changed,
                        }
                    }
                },
            }
        };
        reports.push(FieldReport { field, status });
    }

    DocumentPatch {
        content,
        fields: reports,
    }
}

#[cfg(test)]
#[path = "orchestrate_tests.rs"]
mod tests;
