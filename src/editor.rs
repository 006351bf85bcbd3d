//! Editor capability interface
//!
//! Everything the bridge needs from a host editor goes through the
//! [`EditorHost`] trait. The bridge never reaches for global editor state:
//! callers pass a host instance into every operation.
//!
//! [`RopeEditor`] is an in-memory host over a `ropey::Rope` with a single
//! selection. It backs the tests and the CLI, and doubles as a reference
//! for real host implementations.
//!
//! All positions are byte offsets into the document text.

use ropey::Rope;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::config::SyntaxConfig;
use crate::error::{BridgeError, Result};
use crate::insertion::reindent;
use crate::syntax;
use crate::utils;

/// Half-open byte range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Collapsed range at `pos`
    pub fn caret(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Return (start, end) with start <= end
    pub fn ordered(&self) -> (usize, usize) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }
}

/// Host editor operations the bridge is driven through
pub trait EditorHost {
    /// Current (first) selection
    fn selection_range(&self) -> TextRange;

    /// Replace the selection with `[start, end)`
    fn set_selection_range(&mut self, start: usize, end: usize);

    /// Range of the line containing the caret, without its terminator
    fn current_line_range(&self) -> TextRange;

    fn caret_position(&self) -> usize {
        self.selection_range().start
    }

    fn set_caret_position(&mut self, pos: usize) {
        self.set_selection_range(pos, pos);
    }

    /// Text of the line containing the caret
    fn current_line_text(&self) -> String;

    /// Replace `[start, end)` with `text`.
    ///
    /// When `skip_indent_normalization` is false the host may apply its own
    /// indentation rules to the inserted text.
    fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        skip_indent_normalization: bool,
    ) -> Result<()>;

    fn document_text(&self) -> String;

    /// Syntax identifier at the caret (e.g. "html", "css")
    fn detected_syntax(&self) -> String;

    /// Output profile at the caret (e.g. "html", "xhtml", "line")
    fn output_profile(&self) -> String;

    fn selected_text(&self) -> String;

    fn file_path(&self) -> Option<PathBuf>;
}

/// In-memory editor host backed by a rope
#[derive(Debug, Clone)]
pub struct RopeEditor {
    rope: Rope,
    selection: TextRange,
    scope: String,
    file_path: Option<PathBuf>,
    syntax_config: SyntaxConfig,
}

impl RopeEditor {
    /// Create a host with the caret at the end of `text`
    pub fn new(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let end = rope.len_bytes();
        Self {
            rope,
            selection: TextRange::caret(end),
            scope: String::new(),
            file_path: None,
            syntax_config: SyntaxConfig::default(),
        }
    }

    /// Scope string reported at the caret (e.g. "text.html.basic meta.tag")
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_syntax_config(mut self, config: SyntaxConfig) -> Self {
        self.syntax_config = config;
        self
    }

    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        self.set_selection_range(start, end);
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    fn is_char_boundary(&self, byte: usize) -> bool {
        byte <= self.rope.len_bytes()
            && self.rope.char_to_byte(self.rope.byte_to_char(byte)) == byte
    }

    fn clamp(&self, byte: usize) -> usize {
        let byte = byte.min(self.rope.len_bytes());
        self.rope.char_to_byte(self.rope.byte_to_char(byte))
    }

    fn slice(&self, range: TextRange) -> String {
        let start = self.rope.byte_to_char(self.clamp(range.start));
        let end = self.rope.byte_to_char(self.clamp(range.end));
        self.rope.slice(start..end).to_string()
    }
}

impl EditorHost for RopeEditor {
    fn selection_range(&self) -> TextRange {
        let (start, end) = self.selection.ordered();
        TextRange::new(start, end)
    }

    fn set_selection_range(&mut self, start: usize, end: usize) {
        self.selection = TextRange::new(self.clamp(start), self.clamp(end));
    }

    fn current_line_range(&self) -> TextRange {
        utils::line_range_at(&self.document_text(), self.caret_position())
    }

    fn current_line_text(&self) -> String {
        self.slice(self.current_line_range())
    }

    fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        skip_indent_normalization: bool,
    ) -> Result<()> {
        let len = self.rope.len_bytes();
        if start > end || !self.is_char_boundary(start) || !self.is_char_boundary(end) {
            return Err(BridgeError::InvalidRange { start, end, len });
        }

        let inserted = if skip_indent_normalization {
            text.to_string()
        } else {
            let document = self.document_text();
            reindent(text, utils::indentation_at(&document, start), &mut [])
        };

        let start_char = self.rope.byte_to_char(start);
        let end_char = self.rope.byte_to_char(end);
        self.rope.remove(start_char..end_char);
        self.rope.insert(start_char, &inserted);

        debug!(
            start,
            end,
            inserted_len = inserted.len(),
            "Replaced document range"
        );

        // Collapse the caret after the inserted text; callers set the final selection
        let caret = start + inserted.len();
        self.selection = TextRange::caret(caret);
        Ok(())
    }

    fn document_text(&self) -> String {
        self.rope.to_string()
    }

    fn detected_syntax(&self) -> String {
        syntax::detect_syntax(
            &self.scope,
            &self.document_text(),
            self.caret_position(),
            &self.syntax_config,
        )
    }

    fn output_profile(&self) -> String {
        let document = self.document_text();
        let caret = self.caret_position();
        let syntax = syntax::detect_syntax(&self.scope, &document, caret, &self.syntax_config);
        syntax::detect_profile(&self.scope, &syntax, &document, caret, &self.syntax_config)
    }

    fn selected_text(&self) -> String {
        self.slice(self.selection_range())
    }

    fn file_path(&self) -> Option<PathBuf> {
        self.file_path.clone()
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod tests;
