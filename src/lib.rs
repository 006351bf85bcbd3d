//! abbrev-bridge - Binds an abbreviation expansion engine to editor hosts
//!
//! This library renumbers the tabstops in expanded abbreviations, plans
//! the resulting document edit and drives both through an injected
//! editor host.

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

// Tabstop scanning and renumbering
pub mod tabstops;

// Edit planning and the editor host interface
pub mod editor;
pub mod insertion;

// Syntax and profile detection from scope strings
pub mod syntax;

// Expansion engine interface and host glue
pub mod completions;
pub mod engine;
pub mod expand_manager;

pub use editor::{EditorHost, RopeEditor, TextRange};
pub use engine::{AbbreviationEngine, EngineError};
pub use error::{BridgeError, Result};
pub use expand_manager::ExpandManager;
pub use insertion::{InsertionPlan, InsertionPlanner};
