//! Configuration type definitions
//!
//! This module contains all the struct definitions for configuration.
//! Every field has a serde default so partial config files are accepted.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

// ============================================
// TABSTOP CONFIG
// ============================================

/// Options for tabstop renumbering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabstopConfig {
    /// Always append a `${0}` final stop after the expansion (default: false)
    #[serde(default = "default_insert_final_tabstop")]
    pub insert_final_tabstop: bool,
    /// Rewrite the designated exit placeholder to index 0 (default: false)
    #[serde(default = "default_exit_as_final_stop")]
    pub exit_as_final_stop: bool,
    /// Offset for authored groups; must exceed any plausible group number (default: 1000)
    #[serde(default = "default_linked_base")]
    pub linked_base: u32,
}

fn default_insert_final_tabstop() -> bool {
    DEFAULT_INSERT_FINAL_TABSTOP
}
fn default_exit_as_final_stop() -> bool {
    DEFAULT_EXIT_AS_FINAL_STOP
}
fn default_linked_base() -> u32 {
    DEFAULT_LINKED_BASE
}

impl Default for TabstopConfig {
    fn default() -> Self {
        TabstopConfig {
            insert_final_tabstop: DEFAULT_INSERT_FINAL_TABSTOP,
            exit_as_final_stop: DEFAULT_EXIT_AS_FINAL_STOP,
            linked_base: DEFAULT_LINKED_BASE,
        }
    }
}

// ============================================
// FORMATTING CONFIG
// ============================================

/// Options applied to expanded text before it reaches the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingConfig {
    /// Re-indent inserted lines to the indentation of the caret line (default: true)
    #[serde(default = "default_preserve_indentation")]
    pub preserve_indentation: bool,
    /// Line separator written into the document (default: "\n")
    #[serde(default = "default_newline")]
    pub newline: String,
    /// Indentation unit replacing tabs in expanded text (default: "\t")
    #[serde(default = "default_indentation")]
    pub indentation: String,
    /// Strip trailing whitespace from every inserted line (default: true)
    #[serde(default = "default_trim_trailing_whitespace")]
    pub trim_trailing_whitespace: bool,
}

fn default_preserve_indentation() -> bool {
    DEFAULT_PRESERVE_INDENTATION
}
fn default_newline() -> String {
    DEFAULT_NEWLINE.to_string()
}
fn default_indentation() -> String {
    DEFAULT_INDENTATION.to_string()
}
fn default_trim_trailing_whitespace() -> bool {
    DEFAULT_TRIM_TRAILING_WHITESPACE
}

impl Default for FormattingConfig {
    fn default() -> Self {
        FormattingConfig {
            preserve_indentation: DEFAULT_PRESERVE_INDENTATION,
            newline: DEFAULT_NEWLINE.to_string(),
            indentation: DEFAULT_INDENTATION.to_string(),
            trim_trailing_whitespace: DEFAULT_TRIM_TRAILING_WHITESPACE,
        }
    }
}

// ============================================
// SYNTAX CONFIG
// ============================================

/// Options for syntax and output profile detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxConfig {
    /// Syntax used when no scope rule matches (default: "html")
    #[serde(default = "default_syntax")]
    pub default_syntax: String,
    /// Syntaxes that `source.<name>` scopes may resolve to
    #[serde(default = "default_known_syntaxes")]
    pub known_syntaxes: Vec<String>,
    /// Pick the "xhtml" profile for HTML documents declaring an XHTML doctype (default: false)
    #[serde(default = "default_autodetect_xhtml")]
    pub autodetect_xhtml: bool,
}

fn default_syntax() -> String {
    DEFAULT_SYNTAX.to_string()
}
fn default_known_syntaxes() -> Vec<String> {
    DEFAULT_KNOWN_SYNTAXES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_autodetect_xhtml() -> bool {
    DEFAULT_AUTODETECT_XHTML
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        SyntaxConfig {
            default_syntax: default_syntax(),
            known_syntaxes: default_known_syntaxes(),
            autodetect_xhtml: DEFAULT_AUTODETECT_XHTML,
        }
    }
}

impl SyntaxConfig {
    pub fn is_known_syntax(&self, name: &str) -> bool {
        self.known_syntaxes.iter().any(|s| s == name)
    }
}

// ============================================
// LOGGING CONFIG
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Tracing filter directive, overridden by RUST_LOG
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// JSONL log file; `~` is expanded. No file output when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonl_path: Option<String>,
}

impl LoggingConfig {
    pub fn get_filter(&self) -> &str {
        self.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn get_jsonl_path(&self) -> Option<PathBuf> {
        self.jsonl_path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
    }
}

// ============================================
// MAIN CONFIG
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    #[serde(default)]
    pub tabstops: TabstopConfig,
    #[serde(default)]
    pub formatting: FormattingConfig,
    #[serde(default)]
    pub syntax: SyntaxConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
