use super::*;
use crate::config::PatchConfig;
use crate::document::classify;
use crate::patch::notice::NoticePattern;
use std::path::Path;

const METAINFO: &str = "<component type=\"desktop-application\">\n  <id>org.example.App</id>\n  <name>Example</name>\n</component>\n";
const DESKTOP: &str = "[Desktop Entry]\nName=Example\nExec=example\n";

fn document(path: &str, content: &str) -> Document {
    let classification = classify(Path::new(path)).expect("classified path");
    Document::new(path, classification, content.to_string())
}

fn all_fields() -> FieldSet {
    FieldSet {
        keywords: Some(vec!["Editor".to_string(), "text".to_string()]),
        summary: Some("Edit text files".to_string()),
        description: Some("<p>Example edits text.</p>".to_string()),
    }
}

fn run(doc: &Document, fields: &FieldSet) -> DocumentPatch {
    let config = PatchConfig::default();
    let notices = NoticePattern::from_config(&config).expect("notice pattern");
    let patcher = Patcher::new(&config, &notices);
    let prepared = PreparedFields::prepare(fields, config.max_keywords, config.max_summary_chars);
    patch_document(doc, &prepared, &patcher)
}

fn statuses(patch: &DocumentPatch) -> Vec<(Field, FieldStatus)> {
    patch
        .fields
        .iter()
        .map(|report| (report.field, report.status.clone()))
        .collect()
}

#[test]
fn component_receives_all_fields_in_order() {
    let doc = document("org.example.App.metainfo.xml", METAINFO);
    let patch = run(&doc, &all_fields());
    assert_eq!(
        patch.content,
        "<component type=\"desktop-application\">\n  <id>org.example.App</id>\n  <name>Example</name>\n    <summary>Edit text files</summary>\n    <description>\n        <p>Example edits text.</p>\n    </description>\n    <keywords>\n        <keyword>editor</keyword>\n        <keyword>text</keyword>\n    </keywords>\n</component>\n"
    );
    assert_eq!(
        patch.fields.iter().map(|report| report.field).collect::<Vec<_>>(),
        vec![Field::Keywords, Field::Summary, Field::Description]
    );
    assert!(patch.changed());
}

#[test]
fn desktop_entry_skips_summary_and_description() {
    let doc = document("org.example.App.desktop", DESKTOP);
    let patch = run(&doc, &all_fields());
    assert_eq!(
        patch.content,
        "[Desktop Entry]\nKeywords=editor;text;\nName=Example\nExec=example\n"
    );
    assert_eq!(
        statuses(&patch),
        vec![
            (
                Field::Keywords,
                FieldStatus::Applied {
                    placement: Placement::Inserted,
                    changed: true
                }
            ),
            (Field::Summary, FieldStatus::SkippedUnsupported),
            (Field::Description, FieldStatus::SkippedUnsupported),
        ]
    );
}

#[test]
fn desktop_entry_is_byte_identical_without_keywords() {
    let doc = document("org.example.App.desktop.in", DESKTOP);
    let fields = FieldSet {
        keywords: None,
        ..all_fields()
    };
    let patch = run(&doc, &fields);
    assert_eq!(patch.content, DESKTOP);
    assert!(!patch.changed());
}

#[test]
fn rejected_field_does_not_block_others() {
    let doc = document("a.appdata.xml", METAINFO);
    let fields = FieldSet {
        keywords: Some(vec!["  ".to_string()]),
        summary: Some(
            "This summary is far too long to be accepted here, even as a loose target".to_string(),
        ),
        description: Some("<p>Kept.</p>".to_string()),
    };
    let patch = run(&doc, &fields);
    let statuses = statuses(&patch);
    assert!(matches!(statuses[0], (Field::Keywords, FieldStatus::Rejected { .. })));
    assert!(matches!(statuses[1], (Field::Summary, FieldStatus::Rejected { .. })));
    assert!(matches!(
        statuses[2],
        (Field::Description, FieldStatus::Applied { changed: true, .. })
    ));
    assert!(patch.content.contains("<p>Kept.</p>"));
    assert!(!patch.content.contains("<keywords>"));
    assert!(!patch.content.contains("<summary>"));
}

#[test]
fn keyword_with_line_break_is_idempotent_in_desktop_entry() {
    let doc = document("org.example.App.desktop", DESKTOP);
    let fields = FieldSet {
        keywords: Some(vec!["foo\nbar".to_string(), "a;b".to_string(), "edit".to_string()]),
        ..FieldSet::default()
    };
    let first = run(&doc, &fields);
    assert_eq!(
        first.content,
        "[Desktop Entry]\nKeywords=foo bar;edit;\nName=Example\nExec=example\n"
    );
    let again = document("org.example.App.desktop", &first.content);
    let second = run(&again, &fields);
    assert_eq!(second.content, first.content);
    assert!(!second.changed());
}

#[test]
fn summary_just_over_target_is_applied() {
    let doc = document(
        "com.example.App.metainfo.xml",
        "<component type=\"desktop\">\n  <id>com.example.App</id>\n  <name>Test App</name>\n</component>\n",
    );
    let fields = FieldSet {
        summary: Some("A test application for demonstration".to_string()),
        ..FieldSet::default()
    };
    let patch = run(&doc, &fields);
    assert_eq!(
        statuses(&patch),
        vec![(
            Field::Summary,
            FieldStatus::Applied {
                placement: Placement::Inserted,
                changed: true
            }
        )]
    );
    assert!(patch
        .content
        .contains("<name>Test App</name>\n    <summary>A test application for demonstration</summary>\n"));
}

#[test]
fn second_pass_reports_no_change() {
    let doc = document("org.example.App.metainfo.xml", METAINFO);
    let first = run(&doc, &all_fields());
    let again = document("org.example.App.metainfo.xml", &first.content);
    let second = run(&again, &all_fields());
    assert_eq!(first.content, second.content);
    assert!(!second.changed());
}

#[test]
fn unanchored_component_records_fallback_placement() {
    let doc = document("broken.metainfo.xml", "<name>Example</name>\n");
    let fields = FieldSet {
        keywords: Some(vec!["a".to_string()]),
        ..FieldSet::default()
    };
    let patch = run(&doc, &fields);
    assert_eq!(
        statuses(&patch),
        vec![(
            Field::Keywords,
            FieldStatus::Applied {
                placement: Placement::Appended,
                changed: true
            }
        )]
    );
    assert!(patch.content.ends_with("    </keywords>\n"));
}

#[test]
fn field_report_serializes_flat() {
    let report = FieldReport {
        field: Field::Summary,
        status: FieldStatus::Rejected {
            reason: "summary is empty".to_string(),
        },
    };
    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(
        json,
        serde_json::json!({"field": "summary", "status": "rejected", "reason": "summary is empty"})
    );
}
