//! CSS completion lists
//!
//! Building the completion list walks every snippet of a dialect through
//! the engine, so lists are memoized per dialect in a [`CompletionCache`]
//! owned by the caller.

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::engine::{AbbreviationEngine, SnippetEntry};

/// One completion entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssCompletion {
    /// Snippet key the user types
    pub key: String,
    /// Display label, the snippet without its trailing value stop
    pub label: String,
    /// Template text inserted on completion
    pub value: String,
}

/// Trailing `: ${0};` left by property snippets
static TRAILING_VALUE_STOP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*\$\{0\}\s*;?$").expect("valid completion label pattern"));

/// Strip the trailing value stop from a rendered property snippet
pub fn completion_label(snippet: &str) -> String {
    TRAILING_VALUE_STOP_RE.replace(snippet, "").into_owned()
}

/// Completion lists keyed by dialect
#[derive(Debug, Default)]
pub struct CompletionCache {
    entries: HashMap<String, Vec<CssCompletion>>,
}

impl CompletionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the list for `dialect`, building it on first use
    pub fn get_or_build<E: AbbreviationEngine + ?Sized>(
        &mut self,
        engine: &E,
        dialect: &str,
    ) -> &[CssCompletion] {
        self.entries
            .entry(dialect.to_string())
            .or_insert_with(|| build_completions(engine, dialect))
    }

    pub fn contains(&self, dialect: &str) -> bool {
        self.entries.contains_key(dialect)
    }

    /// Drop the list for one dialect so the next lookup rebuilds it
    pub fn invalidate(&mut self, dialect: &str) -> bool {
        self.entries.remove(dialect).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn build_completions<E: AbbreviationEngine + ?Sized>(
    engine: &E,
    dialect: &str,
) -> Vec<CssCompletion> {
    let completions: Vec<CssCompletion> = engine
        .all_snippets(dialect)
        .into_iter()
        .map(|SnippetEntry { key, value }| {
            let snippet = engine.transform_css_snippet(&value, dialect);
            CssCompletion {
                label: completion_label(&snippet),
                value: engine.expand_css_snippet(&key, dialect),
                key,
            }
        })
        .collect();

    debug!(dialect, count = completions.len(), "Built CSS completions");
    completions
}
