use super::*;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn keywords_are_lowercased_deduplicated_and_capped() {
    let raw = strings(&["Editor", " editor ", "", "Text", "CODE", "a", "b", "c", "d", "e", "f"]);
    let keywords = Keywords::normalize(&raw, 8).expect("normalize");
    assert_eq!(
        keywords.tokens(),
        &strings(&["editor", "text", "code", "a", "b", "c", "d", "e"])[..]
    );
}

#[test]
fn keywords_without_usable_tokens_are_rejected() {
    assert!(Keywords::normalize(&strings(&[" ", ""]), 8).is_err());
    assert!(Keywords::normalize(&[], 8).is_err());
}

#[test]
fn summary_is_collapsed_to_one_line() {
    let summary = Summary::normalize("  Edit\n  text   files ", 35).expect("normalize");
    assert_eq!(summary.as_str(), "Edit text files");
}

#[test]
fn keywords_with_line_breaks_or_separators_are_cleaned() {
    let raw = strings(&["foo\nbar", "a;b", "tab\u{7}bell", "Plain"]);
    let keywords = Keywords::normalize(&raw, 8).expect("normalize");
    assert_eq!(keywords.tokens(), &strings(&["foo bar", "plain"])[..]);
    assert!(Keywords::normalize(&strings(&["x;y"]), 8).is_err());
}

#[test]
fn summary_slightly_over_target_is_kept() {
    let summary =
        Summary::normalize("A test application for demonstration", 35).expect("normalize");
    assert_eq!(summary.as_str(), "A test application for demonstration");
}

#[test]
fn summary_past_ceiling_is_rejected() {
    let err = Summary::normalize(
        "A very long summary that keeps going on and on well past any reasonable length",
        35,
    )
    .expect_err("too long");
    assert!(err.to_string().contains("limit 70"));
    assert!(Summary::normalize("   ", 35).is_err());
}

#[test]
fn description_requires_block_markup() {
    assert!(Description::normalize("<p>Hello</p>").is_ok());
    assert!(Description::normalize("\n  <ul>\n<li>x</li>\n</ul>").is_ok());
    assert!(Description::normalize("plain prose").is_err());
    assert!(Description::normalize("  ").is_err());
}

#[test]
fn description_with_unbalanced_markup_is_rejected() {
    assert!(Description::normalize("<p>a</p>\n</description>\n<description>").is_err());
    assert!(Description::normalize("<p>open").is_err());
    assert!(Description::normalize("<ul>\n<li>x</li>\n</ul>\n<p><em>ok</em></p>").is_ok());
}

#[test]
fn plain_text_becomes_paragraphs_and_lists() {
    let markup = Description::from_plain_text(
        "Edit files & more.\nFast.\n\nFeatures:\n- Tabs\n- <Syntax> colors\n",
    );
    assert_eq!(
        markup,
        "<p>Edit files &amp; more. Fast.</p>\n<p>Features:</p>\n<ul>\n<li>Tabs</li>\n<li>&lt;Syntax&gt; colors</li>\n</ul>"
    );
}

#[test]
fn fields_parse_from_fenced_response() {
    let text = "```json\n{\"keywords\": [\"a\"], \"summary\": \"Short\"}\n```";
    let fields = parse_fields(text).expect("parse");
    assert_eq!(fields.keywords, Some(strings(&["a"])));
    assert_eq!(fields.summary.as_deref(), Some("Short"));
    assert!(fields.description.is_none());
}

#[test]
fn fields_parse_from_surrounding_prose() {
    let text = "Here you go: {\"summary\": \"Short\"} hope it helps";
    let fields = parse_fields(text).expect("parse");
    assert_eq!(fields.summary.as_deref(), Some("Short"));
}

#[test]
fn unknown_field_keys_are_rejected() {
    assert!(parse_fields(r#"{"tags": ["a"]}"#).is_err());
    assert!(parse_fields("[1, 2]").is_err());
}

#[test]
fn restrict_keeps_only_listed_fields() {
    let mut fields = FieldSet {
        keywords: Some(strings(&["a"])),
        summary: Some("s".to_string()),
        description: Some("<p>d</p>".to_string()),
    };
    fields.restrict(&[Field::Description, Field::Keywords]);
    assert_eq!(fields.requested(), vec![Field::Keywords, Field::Description]);

    fields.restrict(&[]);
    assert_eq!(fields.requested(), vec![Field::Keywords, Field::Description]);
}
