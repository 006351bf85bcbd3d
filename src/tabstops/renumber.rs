//! Tabstop renumbering
//!
//! The expansion engine emits every unlinked cursor stop as `${0}`. Hosts
//! treat equal indices as mirrored fields, so before insertion every
//! zero-group placeholder gets its own fresh index and every authored group
//! is shifted above them by a constant base. Linked groups stay linked.

use serde::Serialize;
use tracing::debug;

use super::scanner::{Segment, Template};
use crate::config::TabstopConfig;

/// Marker appended when a final exit stop is forced
pub const FINAL_STOP_MARKER: &str = "${0}";

/// A placeholder after renumbering, positioned in the rendered text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenumberedPlaceholder {
    /// Globally unique index for unlinked stops, shared for linked groups
    pub index: u64,
    /// Group as authored in the source template
    pub original_group: u32,
    /// Byte range of the rendered token in [`Renumbered::text`]
    pub range: (usize, usize),
    /// Byte range of the token in the source template (None for synthetic stops)
    pub source_range: Option<(usize, usize)>,
}

impl RenumberedPlaceholder {
    pub fn is_exit_point(&self) -> bool {
        self.original_group == 0
    }
}

/// Where the caret should end up inside the rendered text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExitPoint {
    pub start: usize,
    pub end: usize,
}

/// Result of renumbering a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Renumbered {
    /// Rendered template text with renumbered tabstops
    pub text: String,
    /// Placeholders in order of first appearance in the source
    pub placeholders: Vec<RenumberedPlaceholder>,
    /// Span of the designated exit placeholder, if any
    pub exit_point: Option<ExitPoint>,
}

impl Renumbered {
    /// Parse and renumber a template string in one step
    pub fn from_source(source: &str, config: &TabstopConfig) -> Self {
        renumber(&Template::parse(source), config)
    }
}

/// Renumber all placeholders of a scanned template.
///
/// # Examples
///
/// ```
/// use abbrev_bridge::config::TabstopConfig;
/// use abbrev_bridge::tabstops::{renumber, Template};
///
/// let template = Template::parse("<a href=\"${1}\">${2}</a>${0}");
/// let result = renumber(&template, &TabstopConfig::default());
/// assert_eq!(result.text, "<a href=\"${1001}\">${1002}</a>${1}");
/// ```
pub fn renumber(template: &Template, config: &TabstopConfig) -> Renumbered {
    let zero_count = template
        .placeholders()
        .iter()
        .filter(|p| p.is_exit_point())
        .count() as u64;

    // Linked indices must stay above every fresh zero-group index
    let linked_base = u64::from(config.linked_base).max(zero_count);

    let mut renderer = Renderer {
        linked_base,
        zero_counter: 0,
        text: String::new(),
        placeholders: Vec::new(),
        exit_slot: None,
    };
    renderer.render_segments(&template.segments, false);

    let Renderer {
        mut text,
        mut placeholders,
        exit_slot,
        ..
    } = renderer;

    let ends_with_final_stop = placeholders
        .iter()
        .any(|p| p.index == 0 && p.range.1 == text.len());

    let exit_point = if config.insert_final_tabstop && !ends_with_final_stop {
        let start = text.len();
        text.push_str(FINAL_STOP_MARKER);
        placeholders.push(RenumberedPlaceholder {
            index: 0,
            original_group: 0,
            range: (start, text.len()),
            source_range: None,
        });
        debug!(offset = start, "Appended final exit stop");
        Some(ExitPoint {
            start,
            end: text.len(),
        })
    } else {
        exit_slot.map(|slot| {
            anchor_exit_point(&mut text, &mut placeholders, slot, config.exit_as_final_stop)
        })
    };

    debug!(
        placeholders = placeholders.len(),
        zero_groups = zero_count,
        linked_base,
        exit = ?exit_point,
        "Renumbered template"
    );

    Renumbered {
        text,
        placeholders,
        exit_point,
    }
}

/// Re-anchor the exit marker on the last zero-group placeholder.
///
/// The token is spliced back at its own rendered span; with
/// `as_final_stop` its index is rewritten to `0` so the host treats it as
/// its native final cursor stop.
fn anchor_exit_point(
    text: &mut String,
    placeholders: &mut [RenumberedPlaceholder],
    slot: usize,
    as_final_stop: bool,
) -> ExitPoint {
    let (start, end) = placeholders[slot].range;
    if !as_final_stop {
        return ExitPoint { start, end };
    }

    let old_index = placeholders[slot].index.to_string();
    let digits_start = start + 2; // after "${"
    let digits_end = digits_start + old_index.len();
    text.replace_range(digits_start..digits_end, "0");

    let removed = old_index.len() - 1;
    placeholders[slot].index = 0;
    for placeholder in placeholders.iter_mut() {
        let (s, e) = placeholder.range;
        placeholder.range = (
            if s >= digits_end { s - removed } else { s },
            if e >= digits_end { e - removed } else { e },
        );
    }

    ExitPoint {
        start,
        end: end - removed,
    }
}

struct Renderer {
    linked_base: u64,
    zero_counter: u64,
    text: String,
    placeholders: Vec<RenumberedPlaceholder>,
    exit_slot: Option<usize>,
}

impl Renderer {
    fn render_segments(&mut self, segments: &[Segment], nested: bool) {
        for segment in segments {
            match segment {
                Segment::Text(literal) => escape_into(&mut self.text, literal, nested),
                Segment::Placeholder(placeholder) => {
                    let is_zero = placeholder.is_exit_point();
                    let index = if is_zero {
                        self.zero_counter += 1;
                        self.zero_counter
                    } else {
                        u64::from(placeholder.group) + self.linked_base
                    };

                    // Reserve the slot first so outer placeholders precede nested ones
                    let slot = self.placeholders.len();
                    let start = self.text.len();
                    self.placeholders.push(RenumberedPlaceholder {
                        index,
                        original_group: placeholder.group,
                        range: (start, start),
                        source_range: Some(placeholder.range),
                    });
                    // Last zero-group in scan order wins, nested ones count as later
                    if is_zero {
                        self.exit_slot = Some(slot);
                    }

                    self.text.push_str("${");
                    self.text.push_str(&index.to_string());
                    if let Some(default) = &placeholder.default {
                        self.text.push(':');
                        self.render_segments(&default.segments, true);
                    }
                    self.text.push('}');

                    self.placeholders[slot].range = (start, self.text.len());
                }
            }
        }
    }
}

/// Escape literal text so it cannot be mistaken for tabstop syntax
fn escape_into(out: &mut String, literal: &str, nested: bool) {
    for ch in literal.chars() {
        match ch {
            '$' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '{' | '}' if nested => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

/// Escape arbitrary user text for use inside an abbreviation template
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text, false);
    out
}

#[cfg(test)]
#[path = "renumber_tests.rs"]
mod tests;
