//! Insertion planning
//!
//! Turns renumbered expansion text into an [`InsertionPlan`]: the exact
//! text to write, the document range it replaces and where the selection
//! lands afterwards. Planning never touches the document; hosts apply the
//! plan with their own replace primitive (see [`InsertionPlan::apply`]).
//!
//! Every transform here carries a set of anchor offsets along with the text
//! so the exit point stays attached to the same token while line endings,
//! trailing whitespace and indentation change around it.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::FormattingConfig;
use crate::editor::{EditorHost, TextRange};
use crate::error::Result;
use crate::tabstops::ExitPoint;
use crate::utils::leading_whitespace;

/// Fully describes one edit and the selection after it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertionPlan {
    pub text: String,
    pub replace_start: usize,
    pub replace_end: usize,
    pub final_caret_start: usize,
    pub final_caret_end: usize,
}

impl InsertionPlan {
    /// Apply the plan through the host's replace primitive and place the selection
    pub fn apply(&self, host: &mut dyn EditorHost) -> Result<()> {
        host.replace_range(self.replace_start, self.replace_end, &self.text, true)?;
        host.set_selection_range(self.final_caret_start, self.final_caret_end);
        Ok(())
    }

    pub fn final_selection(&self) -> TextRange {
        TextRange::new(self.final_caret_start, self.final_caret_end)
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Host-specific text normalization.
///
/// Implementations must rewrite each entry of `anchors` (byte offsets into
/// `text`) to the matching offset in the returned string.
pub trait TextNormalizer {
    fn normalize(&self, text: &str, anchors: &mut [usize]) -> String;
}

/// Identity normalizer for hosts that handle formatting themselves
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl TextNormalizer for PassThrough {
    fn normalize(&self, text: &str, _anchors: &mut [usize]) -> String {
        text.to_string()
    }
}

/// Line ending, tab and trailing whitespace normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNormalizer {
    pub newline: String,
    pub indentation: String,
    pub trim_trailing_whitespace: bool,
}

impl LineNormalizer {
    pub fn from_config(config: &FormattingConfig) -> Self {
        Self {
            newline: config.newline.clone(),
            indentation: config.indentation.clone(),
            trim_trailing_whitespace: config.trim_trailing_whitespace,
        }
    }
}

impl Default for LineNormalizer {
    fn default() -> Self {
        Self::from_config(&FormattingConfig::default())
    }
}

impl TextNormalizer for LineNormalizer {
    fn normalize(&self, text: &str, anchors: &mut [usize]) -> String {
        let originals = anchors.to_vec();
        let expand_tabs = self.indentation != "\t";
        let mut out = String::with_capacity(text.len());

        for line in split_lines(text) {
            let content = &text[line.start..line.content_end];
            let kept_end = if self.trim_trailing_whitespace {
                line.start + content.trim_end_matches([' ', '\t']).len()
            } else {
                line.content_end
            };

            for (offset, ch) in text[line.start..kept_end].char_indices() {
                let src = line.start + offset;
                remap(&originals, anchors, src, src + ch.len_utf8(), out.len());
                if ch == '\t' && expand_tabs {
                    out.push_str(&self.indentation);
                } else {
                    out.push(ch);
                }
            }

            // Trimmed whitespace and the terminator collapse onto the end of the content
            remap(&originals, anchors, kept_end, line.end, out.len());
            if line.end > line.content_end {
                out.push_str(&self.newline);
            }
        }

        remap(&originals, anchors, text.len(), text.len() + 1, out.len());
        out
    }
}

struct LineSpan {
    start: usize,
    content_end: usize,
    end: usize,
}

/// Split into lines, recognizing `\r\n`, `\r` and `\n` terminators
fn split_lines(text: &str) -> Vec<LineSpan> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(LineSpan {
                    start,
                    content_end: i,
                    end: i + 1,
                });
                i += 1;
                start = i;
            }
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') { i + 2 } else { i + 1 };
                lines.push(LineSpan {
                    start,
                    content_end: i,
                    end,
                });
                i = end;
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(LineSpan {
        start,
        content_end: text.len(),
        end: text.len(),
    });
    lines
}

/// Move every anchor whose original offset lies in `[from, to)` to `dst`
fn remap(originals: &[usize], anchors: &mut [usize], from: usize, to: usize, dst: usize) {
    for (anchor, &original) in anchors.iter_mut().zip(originals) {
        if original >= from && original < to {
            *anchor = dst;
        }
    }
}

// ============================================================================
// Indentation
// ============================================================================

/// Re-indent every line after the first to `indent`.
///
/// Lines after the first lose their common leading whitespace and gain
/// `indent`; relative indentation between them is kept. Whitespace-only
/// lines become empty. Applying this twice with the same `indent` gives
/// the same text as applying it once.
pub fn reindent(text: &str, indent: &str, anchors: &mut [usize]) -> String {
    let originals = anchors.to_vec();
    let lines = split_lines(text);

    let common = lines
        .iter()
        .skip(1)
        .map(|line| &text[line.start..line.content_end])
        .filter(|content| !content.trim().is_empty())
        .map(leading_whitespace)
        .reduce(common_prefix)
        .unwrap_or("");

    let mut out = String::with_capacity(text.len() + indent.len() * lines.len());
    for (index, line) in lines.iter().enumerate() {
        let content = &text[line.start..line.content_end];
        let body_start = if index == 0 {
            line.start
        } else if content.trim().is_empty() {
            line.content_end
        } else {
            out.push_str(indent);
            line.start + common.len()
        };

        // Removed leading whitespace collapses onto the start of the body
        remap(&originals, anchors, line.start, body_start, out.len());
        for (offset, ch) in text[body_start..line.content_end].char_indices() {
            let src = body_start + offset;
            remap(&originals, anchors, src, src + ch.len_utf8(), out.len());
            out.push(ch);
        }
        for (offset, ch) in text[line.content_end..line.end].char_indices() {
            let src = line.content_end + offset;
            remap(&originals, anchors, src, src + ch.len_utf8(), out.len());
            out.push(ch);
        }
    }

    remap(&originals, anchors, text.len(), text.len() + 1, out.len());
    out
}

fn common_prefix<'a>(a: &'a str, b: &'a str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

// ============================================================================
// Planner
// ============================================================================

/// Computes insertion plans with a pluggable normalizer
#[derive(Debug, Clone)]
pub struct InsertionPlanner<N = LineNormalizer> {
    normalizer: N,
    preserve_indentation: bool,
}

impl InsertionPlanner<LineNormalizer> {
    pub fn from_config(config: &FormattingConfig) -> Self {
        Self {
            normalizer: LineNormalizer::from_config(config),
            preserve_indentation: config.preserve_indentation,
        }
    }
}

impl<N: TextNormalizer> InsertionPlanner<N> {
    pub fn with_normalizer(normalizer: N, preserve_indentation: bool) -> Self {
        Self {
            normalizer,
            preserve_indentation,
        }
    }

    /// Plan replacing `replace` with `text`.
    ///
    /// `indent` is the indentation of the document line containing
    /// `replace.start`; it is only used when indentation is preserved. An
    /// empty `indent` moves the engine's common indentation to column zero.
    #[instrument(level = "debug", skip(self, text, indent), fields(text_len = text.len()))]
    pub fn plan(
        &self,
        text: &str,
        exit_point: Option<ExitPoint>,
        replace: TextRange,
        indent: &str,
    ) -> InsertionPlan {
        let (replace_start, replace_end) = replace.ordered();

        let mut anchors: Vec<usize> = exit_point
            .map(|exit| vec![exit.start, exit.end])
            .unwrap_or_default();

        let mut normalized = self.normalizer.normalize(text, &mut anchors);
        if self.preserve_indentation {
            normalized = reindent(&normalized, indent, &mut anchors);
        }

        let (final_caret_start, final_caret_end) = match anchors.as_slice() {
            [start, end] => (replace_start + start, replace_start + end),
            _ => {
                let end = replace_start + normalized.len();
                (end, end)
            }
        };

        debug!(
            replace_start,
            replace_end,
            final_caret_start,
            final_caret_end,
            "Planned insertion"
        );

        InsertionPlan {
            text: normalized,
            replace_start,
            replace_end,
            final_caret_start,
            final_caret_end,
        }
    }
}
