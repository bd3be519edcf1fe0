//! Insert-or-replace patching of a single metadata field.
//!
//! Every strategy is a pure `&str -> String` transform: it replaces at most one
//! prior occurrence of the field, otherwise inserts at the dialect's anchor,
//! and falls back to appending (or prepending) when no anchor exists. Applying
//! the same value twice yields the same content as applying it once.
pub mod component;
pub mod desktop;
pub mod markup;
pub mod notice;
pub(crate) mod outline;

use serde::Serialize;

use crate::config::PatchConfig;
use crate::document::Dialect;
use crate::fields::Field;
use notice::NoticePredicate;

/// One field value ready to patch.
#[derive(Debug, Clone, Copy)]
pub enum FieldPatch<'a> {
    Keywords(&'a [String]),
    Summary(&'a str),
    Description(&'a str),
}

impl FieldPatch<'_> {
    pub fn field(&self) -> Field {
        match self {
            FieldPatch::Keywords(_) => Field::Keywords,
            FieldPatch::Summary(_) => Field::Summary,
            FieldPatch::Description(_) => Field::Description,
        }
    }
}

/// Where a patched value landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// A prior occurrence was rewritten in place.
    Replaced,
    /// Inserted next to a structural anchor.
    Inserted,
    /// No anchor found; added at the end of the document.
    Appended,
    /// No anchor found; added at the start of the document.
    Prepended,
}

impl Placement {
    /// Anchor-less placements may leave the document structurally invalid.
    pub fn is_fallback(self) -> bool {
        matches!(self, Placement::Appended | Placement::Prepended)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub content: String,
    pub placement: Placement,
}

impl Patched {
    pub(crate) fn new(content: String, placement: Placement) -> Self {
        Self { content, placement }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied(Patched),
    /// The dialect has no home for this field; content is untouched.
    Unsupported,
}

/// Dispatches field patches to the strategy for a document's dialect.
pub struct Patcher<'a> {
    config: &'a PatchConfig,
    notices: &'a dyn NoticePredicate,
}

impl<'a> Patcher<'a> {
    pub fn new(config: &'a PatchConfig, notices: &'a dyn NoticePredicate) -> Self {
        Self { config, notices }
    }

    pub fn patch(&self, dialect: Dialect, content: &str, value: FieldPatch<'_>) -> PatchOutcome {
        match (dialect, value) {
            (Dialect::KeyValue, FieldPatch::Keywords(tokens)) => {
                PatchOutcome::Applied(desktop::patch_keywords(content, tokens))
            }
            (Dialect::KeyValue, FieldPatch::Summary(_) | FieldPatch::Description(_)) => {
                PatchOutcome::Unsupported
            }
            (Dialect::Component, FieldPatch::Keywords(tokens)) => {
                PatchOutcome::Applied(component::patch_keywords(content, tokens, self.config))
            }
            (Dialect::Component, FieldPatch::Summary(summary)) => {
                PatchOutcome::Applied(component::patch_summary(content, summary, self.config))
            }
            (Dialect::Component, FieldPatch::Description(description)) => {
                PatchOutcome::Applied(component::patch_description(
                    content,
                    description,
                    self.config,
                    self.notices,
                ))
            }
        }
    }
}
