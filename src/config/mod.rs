//! Configuration module - bridge settings
//!
//! This module provides functionality for:
//! - Loading configuration from a JSON file
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (BridgeConfig, TabstopConfig, etc.)
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::{DEFAULT_KNOWN_SYNTAXES, DEFAULT_LINKED_BASE};

pub use types::{BridgeConfig, FormattingConfig, LoggingConfig, SyntaxConfig, TabstopConfig};

pub use loader::{default_config_path, load_config, try_load_config};

#[cfg(test)]
pub use defaults::{DEFAULT_INDENTATION, DEFAULT_LOG_FILTER, DEFAULT_NEWLINE, DEFAULT_SYNTAX};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
