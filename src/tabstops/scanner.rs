//! Placeholder scanner for expanded abbreviation output
//!
//! Parses the tabstop syntax produced by the expansion engine into a
//! recursive [`Template`] structure.
//!
//! Supported syntax:
//! - `${1}` - Tabstop without default text
//! - `${1:default}` - Tabstop with default text, which may itself contain tabstops
//! - `${0}` - Exit point (final cursor position)
//! - `\$`, `\\`, `\{`, `\}` - Escaped literal characters
//!
//! Anything that does not form a complete tabstop (`${x}`, `${1` without a
//! closing brace, a lone `$`) is kept as literal text. Inside default text,
//! unescaped braces must balance: a `}` only closes the tabstop when every
//! `{` opened in its default text has been closed.

/// A parsed piece of a template
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text, with escapes already resolved
    Text(String),
    /// A tabstop token
    Placeholder(Placeholder),
}

/// A single `${group[:default]}` token
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    /// Author-assigned group. Equal non-zero groups are linked (mirrored).
    pub group: u32,
    /// Default text, recursively scanned
    pub default: Option<Template>,
    /// Byte range of the whole token in the scanned string
    pub range: (usize, usize),
}

impl Placeholder {
    /// Group 0 marks an unlinked exit candidate
    pub fn is_exit_point(&self) -> bool {
        self.group == 0
    }
}

/// A scanned template: literal text interleaved with placeholders
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    /// Scan a template string.
    ///
    /// # Examples
    ///
    /// ```
    /// use abbrev_bridge::tabstops::Template;
    ///
    /// let template = Template::parse("<a href=\"${1}\">${2:text}</a>${0}");
    /// let groups: Vec<u32> = template.placeholders().iter().map(|p| p.group).collect();
    /// assert_eq!(groups, vec![1, 2, 0]);
    /// ```
    pub fn parse(source: &str) -> Self {
        let mut scanner = Scanner { src: source, pos: 0 };
        let (segments, _) = scanner.scan_segments(false);
        Self { segments }
    }

    /// All placeholders in order of first appearance, outer before nested
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        let mut out = Vec::new();
        collect_placeholders(&self.segments, &mut out);
        out
    }

    /// Number of placeholders at any depth
    pub fn placeholder_count(&self) -> usize {
        self.placeholders().len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

fn collect_placeholders<'a>(segments: &'a [Segment], out: &mut Vec<&'a Placeholder>) {
    for segment in segments {
        if let Segment::Placeholder(placeholder) = segment {
            out.push(placeholder);
            if let Some(default) = &placeholder.default {
                collect_placeholders(&default.segments, out);
            }
        }
    }
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    /// Scan until end of input or, when `nested`, an unescaped `}` outside
    /// any literal brace pair. Returns the segments and whether the closing
    /// brace was consumed.
    fn scan_segments(&mut self, nested: bool) -> (Vec<Segment>, bool) {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut depth = 0usize;

        while let Some(byte) = self.peek() {
            match byte {
                b'\\' => match self.peek_at(1) {
                    Some(escaped @ (b'$' | b'\\' | b'{' | b'}')) => {
                        text.push(escaped as char);
                        self.pos += 2;
                    }
                    _ => {
                        text.push('\\');
                        self.pos += 1;
                    }
                },
                b'$' if self.peek_at(1) == Some(b'{') => {
                    let checkpoint = self.pos;
                    match self.scan_placeholder() {
                        Some(placeholder) => {
                            flush_text(&mut text, &mut segments);
                            segments.push(Segment::Placeholder(placeholder));
                        }
                        None => {
                            // Malformed: keep the `$` and rescan from the brace
                            self.pos = checkpoint + 1;
                            text.push('$');
                        }
                    }
                }
                b'{' if nested => {
                    depth += 1;
                    text.push('{');
                    self.pos += 1;
                }
                b'}' if nested && depth > 0 => {
                    depth -= 1;
                    text.push('}');
                    self.pos += 1;
                }
                b'}' if nested => {
                    self.pos += 1;
                    flush_text(&mut text, &mut segments);
                    return (segments, true);
                }
                _ => {
                    let ch = self.src[self.pos..]
                        .chars()
                        .next()
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                    text.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }

        flush_text(&mut text, &mut segments);
        (segments, false)
    }

    /// Scan `${N}` or `${N:default}` starting at `$`. Leaves `pos` undefined on failure.
    fn scan_placeholder(&mut self) -> Option<Placeholder> {
        let start = self.pos;
        self.pos += 2; // consume "${"

        let digits_start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if self.pos == digits_start {
            return None;
        }
        let group: u32 = self.src[digits_start..self.pos].parse().ok()?;

        match self.peek() {
            Some(b'}') => {
                self.pos += 1;
                Some(Placeholder {
                    group,
                    default: None,
                    range: (start, self.pos),
                })
            }
            Some(b':') => {
                self.pos += 1;
                let (segments, closed) = self.scan_segments(true);
                if !closed {
                    return None;
                }
                Some(Placeholder {
                    group,
                    default: Some(Template { segments }),
                    range: (start, self.pos),
                })
            }
            _ => None,
        }
    }
}

fn flush_text(text: &mut String, segments: &mut Vec<Segment>) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}
