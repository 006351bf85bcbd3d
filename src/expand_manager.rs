//! Expand Manager - binds the abbreviation engine to an editor host
//!
//! This module ties together the pieces of an expand operation:
//! - EditorHost: selection, document text, syntax and profile at the caret
//! - AbbreviationEngine: abbreviation expansion, tag matching, snippets
//! - Tabstop renumbering of the engine output
//! - InsertionPlanner: the edit and final selection
//!
//! # Failure handling
//!
//! Nothing here is fatal to the host. Engine failures degrade to an empty
//! expansion, missing context degrades to `None` or an empty list, and the
//! document is only touched once a complete plan exists.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

use crate::completions::{CompletionCache, CssCompletion};
use crate::config::BridgeConfig;
use crate::editor::{EditorHost, TextRange};
use crate::engine::{AbbreviationEngine, EngineError, ExpandRequest};
use crate::error::{BridgeError, Result, ResultExt};
use crate::insertion::{InsertionPlan, InsertionPlanner};
use crate::tabstops::{escape_text, Renumbered};
use crate::utils;

static TAG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([\w\-:]+)").expect("valid tag name pattern"));

/// Syntax and profile resolved at the caret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputInfo {
    pub syntax: String,
    pub profile: String,
}

/// Drives expand operations for one engine against any editor host
pub struct ExpandManager<E> {
    engine: E,
    config: BridgeConfig,
    planner: InsertionPlanner,
}

impl<E: AbbreviationEngine> ExpandManager<E> {
    /// Create a manager with default configuration
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, BridgeConfig::default())
    }

    pub fn with_config(engine: E, config: BridgeConfig) -> Self {
        let planner = InsertionPlanner::from_config(&config.formatting);
        Self {
            engine,
            config,
            planner,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn output_info(&self, host: &dyn EditorHost) -> OutputInfo {
        OutputInfo {
            syntax: host.detected_syntax(),
            profile: host.output_profile(),
        }
    }

    /// Renumber raw engine output for insertion
    pub fn preprocess_text(&self, text: &str) -> Renumbered {
        Renumbered::from_source(text, &self.config.tabstops)
    }

    // ========================================================================
    // Expansion
    // ========================================================================

    /// Expand `abbreviation` at the caret. Returns "" when the engine fails.
    #[instrument(skip(self, host))]
    pub fn expand_abbreviation(&self, host: &dyn EditorHost, abbreviation: &str) -> String {
        self.try_expand(host, abbreviation, None)
            .warn_on_err()
            .map(|renumbered| renumbered.text)
            .unwrap_or_default()
    }

    /// Wrap `content` with `abbreviation`. Returns "" when the engine fails.
    #[instrument(skip(self, host, content), fields(content_len = content.len()))]
    pub fn wrap_with_abbreviation(
        &self,
        host: &dyn EditorHost,
        abbreviation: &str,
        content: &str,
    ) -> String {
        let pasted = escape_text(content);
        self.try_expand(host, abbreviation, Some(pasted))
            .warn_on_err()
            .map(|renumbered| renumbered.text)
            .unwrap_or_default()
    }

    fn try_expand(
        &self,
        host: &dyn EditorHost,
        abbreviation: &str,
        pasted_content: Option<String>,
    ) -> Result<Renumbered> {
        let info = self.output_info(host);
        if !self.config.syntax.is_known_syntax(&info.syntax) {
            return Err(EngineError::UnsupportedSyntax(info.syntax).into());
        }

        let request = ExpandRequest {
            abbreviation: abbreviation.to_string(),
            syntax: info.syntax,
            profile: info.profile,
            pasted_content,
            context: self.capture_context(host),
        };

        let expanded = self.engine.expand(&request)?;
        debug!(
            syntax = %request.syntax,
            profile = %request.profile,
            expanded_len = expanded.len(),
            "Engine expanded abbreviation"
        );
        Ok(self.preprocess_text(&expanded))
    }

    /// Expand the abbreviation at the caret and write it into the document.
    ///
    /// With `abbreviation` set, the current selection (possibly empty) is
    /// replaced; otherwise the abbreviation is extracted from the selection
    /// or the text before the caret and that span is replaced. Returns the
    /// applied plan, or `None` with the document untouched.
    #[instrument(skip(self, host))]
    pub fn expand_and_insert(
        &self,
        host: &mut dyn EditorHost,
        abbreviation: Option<&str>,
    ) -> Option<InsertionPlan> {
        let plan = self.plan_expansion(&*host, abbreviation).warn_on_err()?;
        plan.apply(host).log_err()?;
        info!(
            replace_start = plan.replace_start,
            replace_end = plan.replace_end,
            inserted_len = plan.text.len(),
            "Inserted expansion"
        );
        Some(plan)
    }

    fn plan_expansion(
        &self,
        host: &dyn EditorHost,
        abbreviation: Option<&str>,
    ) -> Result<InsertionPlan> {
        let (abbreviation, replace) = match abbreviation {
            Some(abbreviation) => (abbreviation.to_string(), host.selection_range()),
            None => self
                .locate_abbreviation(host)
                .ok_or_else(|| BridgeError::NoContext("no abbreviation at caret".to_string()))?,
        };

        let renumbered = self.try_expand(host, &abbreviation, None)?;
        if renumbered.text.is_empty() {
            return Err(BridgeError::NoContext(format!(
                "'{}' expanded to nothing",
                abbreviation
            )));
        }

        let document = host.document_text();
        let indent = utils::indentation_at(&document, replace.ordered().0);
        Ok(self
            .planner
            .plan(&renumbered.text, renumbered.exit_point, replace, indent))
    }

    // ========================================================================
    // Context lookups
    // ========================================================================

    /// Abbreviation at the caret: the selection, or the engine's pick from the line
    pub fn extract_abbreviation(&self, host: &dyn EditorHost) -> Option<String> {
        self.locate_abbreviation(host).map(|(abbreviation, _)| abbreviation)
    }

    fn locate_abbreviation(&self, host: &dyn EditorHost) -> Option<(String, TextRange)> {
        let selection = host.selection_range();
        if !selection.is_empty() {
            return Some((host.selected_text(), selection));
        }

        let caret = selection.start;
        let line = host.current_line_range();
        let document = host.document_text();
        let before_caret = document.get(line.start..caret)?;

        let abbreviation = self.engine.extract_abbreviation(before_caret)?;
        if abbreviation.is_empty() || !before_caret.ends_with(&abbreviation) {
            return None;
        }
        Some((
            abbreviation.clone(),
            TextRange::new(caret - abbreviation.len(), caret),
        ))
    }

    /// Source of the opening tag enclosing the caret
    fn capture_context(&self, host: &dyn EditorHost) -> Option<String> {
        let document = host.document_text();
        let tag = self
            .engine
            .match_tag(&document, host.caret_position())
            .warn_on_err()
            .flatten()?;
        document.get(tag.open.start..tag.open.end).map(str::to_string)
    }

    /// Range to wrap: the selection, or the element around the caret
    /// narrowed to non-whitespace. `None` when there is nothing to wrap.
    #[instrument(skip(self, host))]
    pub fn capture_wrapping_range(&self, host: &dyn EditorHost) -> Option<TextRange> {
        let selection = host.selection_range();
        if !selection.is_empty() {
            return Some(selection);
        }

        let document = host.document_text();
        let Some(tag) = self
            .engine
            .match_tag(&document, selection.start)
            .warn_on_err()
            .flatten()
        else {
            debug!(caret = selection.start, "No tag pair to wrap");
            return None;
        };
        Some(utils::narrow_to_non_space(&document, tag.range()))
    }

    /// Ranges of the tag name in the opening and closing tags at `pos`
    pub fn tag_name_ranges(&self, host: &dyn EditorHost, pos: usize) -> Vec<TextRange> {
        let document = host.document_text();
        let Some(tag) = self.engine.match_tag(&document, pos).warn_on_err().flatten() else {
            return Vec::new();
        };

        let Some(name) = document
            .get(tag.open.start..tag.open.end)
            .and_then(|open| TAG_NAME_RE.captures(open))
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().len())
        else {
            return Vec::new();
        };

        let mut ranges = vec![TextRange::new(tag.open.start + 1, tag.open.start + 1 + name)];
        if let Some(close) = tag.close {
            // skip "</"
            ranges.push(TextRange::new(close.start + 2, close.start + 2 + name));
        }
        ranges
    }

    /// Opening and closing tag ranges of the element at the caret
    pub fn tag_ranges(&self, host: &dyn EditorHost) -> Vec<TextRange> {
        let document = host.document_text();
        self.engine
            .match_tag(&document, host.caret_position())
            .warn_on_err()
            .flatten()
            .map(|tag| std::iter::once(tag.open).chain(tag.close).collect())
            .unwrap_or_default()
    }

    pub fn has_snippet(&self, host: &dyn EditorHost, name: &str) -> bool {
        self.engine.has_snippet(&host.detected_syntax(), name)
    }

    /// CSS completions for `dialect` (default: syntax at the caret)
    pub fn css_completions<'c>(
        &self,
        host: &dyn EditorHost,
        dialect: Option<&str>,
        cache: &'c mut CompletionCache,
    ) -> &'c [CssCompletion] {
        let dialect = match dialect {
            Some(dialect) => dialect.to_string(),
            None => host.detected_syntax(),
        };
        cache.get_or_build(&self.engine, &dialect)
    }
}

#[cfg(test)]
#[path = "expand_manager_tests.rs"]
mod tests;
