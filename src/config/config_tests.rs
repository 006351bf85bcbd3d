use super::*;
use crate::error::BridgeError;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = BridgeConfig::default();
    assert_eq!(config.tabstops.linked_base, DEFAULT_LINKED_BASE);
    assert!(!config.tabstops.insert_final_tabstop);
    assert!(!config.tabstops.exit_as_final_stop);
    assert!(config.formatting.preserve_indentation);
    assert_eq!(config.formatting.newline, DEFAULT_NEWLINE);
    assert_eq!(config.formatting.indentation, DEFAULT_INDENTATION);
    assert_eq!(config.syntax.default_syntax, DEFAULT_SYNTAX);
    assert!(!config.syntax.autodetect_xhtml);
}

#[test]
fn test_partial_config_uses_defaults() {
    let json = r#"{"tabstops": {"insertFinalTabstop": true}}"#;
    let config: BridgeConfig = serde_json::from_str(json).unwrap();
    assert!(config.tabstops.insert_final_tabstop);
    assert_eq!(config.tabstops.linked_base, DEFAULT_LINKED_BASE);
    assert_eq!(config.formatting, FormattingConfig::default());
}

#[test]
fn test_config_serialization_roundtrip() {
    let mut config = BridgeConfig::default();
    config.formatting.indentation = "  ".to_string();
    config.syntax.autodetect_xhtml = true;

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("autodetectXhtml"));
    assert!(!json.contains("jsonlPath"));

    let deserialized: BridgeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, config);
}

#[test]
fn test_known_syntaxes() {
    let syntax = SyntaxConfig::default();
    assert!(syntax.is_known_syntax("scss"));
    assert!(!syntax.is_known_syntax("python"));
    assert_eq!(syntax.known_syntaxes.len(), DEFAULT_KNOWN_SYNTAXES.len());
}

#[test]
fn test_logging_config_defaults() {
    let logging = LoggingConfig::default();
    assert_eq!(logging.get_filter(), DEFAULT_LOG_FILTER);
    assert_eq!(logging.get_jsonl_path(), None);
}

#[test]
fn test_logging_path_expands_tilde() {
    let logging = LoggingConfig {
        filter: Some("debug".to_string()),
        jsonl_path: Some("~/logs/bridge.jsonl".to_string()),
    };
    let path = logging.get_jsonl_path().unwrap();
    assert!(!path.to_string_lossy().starts_with('~'));
    assert!(path.ends_with("logs/bridge.jsonl"));
}

#[test]
fn test_try_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"formatting": {{"newline": "\r\n", "preserveIndentation": false}}}}"#
    )
    .unwrap();

    let config = try_load_config(file.path()).unwrap();
    assert_eq!(config.formatting.newline, "\r\n");
    assert!(!config.formatting.preserve_indentation);
}

#[test]
fn test_try_load_config_rejects_invalid_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let err = try_load_config(file.path()).unwrap_err();
    assert!(matches!(err, BridgeError::ConfigParse(_)));
}

#[test]
fn test_try_load_config_rejects_zero_linked_base() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"tabstops": {{"linkedBase": 0}}}}"#).unwrap();

    let err = try_load_config(file.path()).unwrap_err();
    assert!(matches!(err, BridgeError::Config(_)));
}

#[test]
fn test_load_config_missing_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(Some(&dir.path().join("absent.json")));
    assert_eq!(config, BridgeConfig::default());
}

#[test]
fn test_load_config_invalid_file_falls_back() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[1, 2, 3]").unwrap();

    let config = load_config(Some(file.path()));
    assert_eq!(config, BridgeConfig::default());
}
