//! Abbreviation engine interface
//!
//! The expansion engine (abbreviation grammar, markup and stylesheet
//! resolvers, snippet registry, tag matcher) lives outside this crate.
//! The bridge reaches it only through [`AbbreviationEngine`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::TextRange;

/// Failures reported by an expansion engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid abbreviation: {0}")]
    Syntax(String),

    #[error("Unsupported syntax: {0}")]
    UnsupportedSyntax(String),

    #[error("{0}")]
    Other(String),
}

/// Everything the engine needs to expand one abbreviation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExpandRequest {
    pub abbreviation: String,
    pub syntax: String,
    pub profile: String,
    /// Escaped content to wrap, for wrap-with-abbreviation
    pub pasted_content: Option<String>,
    /// Source of the opening tag enclosing the caret, if any
    pub context: Option<String>,
}

/// An element located by the engine's tag matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatch {
    /// Range of the opening tag, `<div class="a">`
    pub open: TextRange,
    /// Range of the closing tag; None for self-closing or unclosed tags
    pub close: Option<TextRange>,
}

impl TagMatch {
    /// Range covering the whole element
    pub fn range(&self) -> TextRange {
        match self.close {
            Some(close) => TextRange::new(self.open.start, close.end),
            None => self.open,
        }
    }
}

/// A registered snippet, as stored by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetEntry {
    /// Normalized snippet key
    pub key: String,
    /// Raw snippet value
    pub value: String,
}

/// The external expansion engine
pub trait AbbreviationEngine {
    /// Expand an abbreviation into template text with `${N}` tabstops
    fn expand(&self, request: &ExpandRequest) -> Result<String, EngineError>;

    /// Extract the abbreviation ending at the end of `line_before_caret`
    fn extract_abbreviation(&self, line_before_caret: &str) -> Option<String>;

    /// Find the element enclosing `pos`, or the tag under it
    fn match_tag(&self, content: &str, pos: usize) -> Result<Option<TagMatch>, EngineError>;

    fn find_snippet(&self, syntax: &str, name: &str) -> Option<SnippetEntry>;

    fn has_snippet(&self, syntax: &str, name: &str) -> bool {
        self.find_snippet(syntax, name).is_some()
    }

    /// All snippets registered for `syntax`
    fn all_snippets(&self, syntax: &str) -> Vec<SnippetEntry>;

    /// Render a raw CSS snippet value as template text for `dialect`
    fn transform_css_snippet(&self, value: &str, dialect: &str) -> String;

    /// Expand a CSS snippet key into its completion template
    fn expand_css_snippet(&self, key: &str, dialect: &str) -> String;
}
