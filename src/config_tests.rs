use super::*;

fn write_config_file(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, contents).expect("write config");
    (dir, path)
}

#[test]
fn defaults_are_valid() {
    let config = PatchConfig::default();
    validate_config(&config).expect("default config validates");
    assert_eq!(config.indent_width, 4);
    assert_eq!(config.max_keywords, 8);
    assert_eq!(config.max_summary_chars, 35);
    assert_eq!(config.indent_unit(), "    ");
}

#[test]
fn partial_config_fills_defaults() {
    let (_dir, path) = write_config_file(r#"{ "indent_width": 2 }"#);
    let config = load_config(Some(&path)).expect("load config");
    assert_eq!(config.indent_width, 2);
    assert_eq!(config.max_keywords, 8);
    assert!(config.include_templates);
}

#[test]
fn unknown_keys_are_rejected() {
    let (_dir, path) = write_config_file(r#"{ "indent": 2 }"#);
    let err = load_config(Some(&path)).expect_err("unknown key");
    assert!(err.to_string().contains("parse config JSON"));
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        r#"{ "schema_version": 2 }"#,
        r#"{ "indent_width": 0 }"#,
        r#"{ "max_keywords": 0 }"#,
        r#"{ "max_summary_chars": 0 }"#,
        r#"{ "notice_pattern": "(" }"#,
        r#"{ "lm_command": "  " }"#,
    ];
    for raw in cases {
        let (_dir, path) = write_config_file(raw);
        assert!(load_config(Some(&path)).is_err(), "{raw}");
    }
}

#[test]
fn flag_wins_over_config_command() {
    let config = PatchConfig {
        lm_command: Some("from-config".to_string()),
        ..PatchConfig::default()
    };
    assert_eq!(
        resolve_lm_command(Some("from-flag"), &config).as_deref(),
        Some("from-flag")
    );
    assert_eq!(
        resolve_lm_command(None, &config).as_deref(),
        Some("from-config")
    );
}
