//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Offset added to every authored (non-zero) tabstop group
pub const DEFAULT_LINKED_BASE: u32 = 1000;

/// Default tabstop behaviour
pub const DEFAULT_INSERT_FINAL_TABSTOP: bool = false;
pub const DEFAULT_EXIT_AS_FINAL_STOP: bool = false;

/// Default output formatting
pub const DEFAULT_PRESERVE_INDENTATION: bool = true;
pub const DEFAULT_NEWLINE: &str = "\n";
pub const DEFAULT_INDENTATION: &str = "\t";
pub const DEFAULT_TRIM_TRAILING_WHITESPACE: bool = true;

/// Default syntax detection
pub const DEFAULT_SYNTAX: &str = "html";
pub const DEFAULT_AUTODETECT_XHTML: bool = false;

/// Syntaxes the expansion engine has resources for.
/// A `source.<name>` scope only resolves to `<name>` when listed here.
pub const DEFAULT_KNOWN_SYNTAXES: &[&str] = &[
    "html", "xml", "xsl", "css", "less", "scss", "sass", "stylus", "haml", "slim", "jade",
];

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Config file location relative to the platform config directory
pub const CONFIG_DIR_NAME: &str = "abbrev-bridge";
pub const CONFIG_FILE_NAME: &str = "config.json";
