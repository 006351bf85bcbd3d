//! Small text helpers shared by the planner and the host glue.
//!
//! All offsets are byte offsets into UTF-8 text.

use crate::editor::TextRange;

/// Byte range of the line containing `pos`, excluding the line terminator
pub fn line_range_at(text: &str, pos: usize) -> TextRange {
    let pos = floor_char_boundary(text, pos.min(text.len()));
    let start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[pos..]
        .find('\n')
        .map(|i| pos + i)
        .unwrap_or(text.len());
    // Treat CRLF as a single terminator
    let end = if end > start && text.as_bytes()[end - 1] == b'\r' && end < text.len() {
        end - 1
    } else {
        end
    };
    TextRange::new(start, end)
}

/// Leading whitespace of the line containing `pos`
pub fn indentation_at(text: &str, pos: usize) -> &str {
    let line = line_range_at(text, pos);
    leading_whitespace(&text[line.start..line.end])
}

/// The run of spaces and tabs at the start of `line`
pub fn leading_whitespace(line: &str) -> &str {
    let len = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..len]
}

/// Shrink `range` so it neither starts nor ends on whitespace.
///
/// An all-whitespace range collapses to an empty range at its start.
pub fn narrow_to_non_space(text: &str, range: TextRange) -> TextRange {
    let Some(slice) = text.get(range.start..range.end) else {
        return range;
    };
    let leading = slice.len() - slice.trim_start().len();
    if leading == slice.len() {
        return TextRange::new(range.start, range.start);
    }
    let trailing = slice.len() - slice.trim_end().len();
    TextRange::new(range.start + leading, range.end - trailing)
}

/// Largest char boundary not greater than `pos`
pub fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}
