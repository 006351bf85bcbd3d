//! Syntax and output profile detection from editor scope strings
//!
//! Both detections are pure functions of the scope at the caret (a
//! whitespace-separated list of dotted scope atoms such as
//! `text.html.basic meta.tag string.quoted.double`) plus the document text.
//! Rules live in ordered tables; the first matching rule wins.
//!
//! Priority: explicit XML/XSL scope, then embedded-block overrides, then
//! generic `source` scopes, then the configured default.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::config::SyntaxConfig;

// ============================================================================
// Scope selectors
// ============================================================================

/// Check a scope selector against a scope string.
///
/// Selector components must match scope atoms in order; a component matches
/// an atom equal to it or extending it with further dotted parts, so
/// `source string` matches `source.python meta.call string.quoted`.
pub fn scope_matches(scope: &str, selector: &str) -> bool {
    let mut atoms = scope.split_whitespace();
    selector
        .split_whitespace()
        .all(|component| atoms.by_ref().any(|atom| atom_matches(atom, component)))
}

fn atom_matches(atom: &str, component: &str) -> bool {
    atom == component
        || (atom.starts_with(component) && atom.as_bytes().get(component.len()) == Some(&b'.'))
}

// ============================================================================
// Syntax detection
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum SyntaxOutcome {
    /// Always resolve to this syntax
    Fixed(&'static str),
    /// Resolve to the first capture group
    Capture,
    /// Resolve to the first capture group if it names a known syntax
    KnownCapture,
}

struct SyntaxRule {
    pattern: Regex,
    /// Rule is skipped when this matches the scope
    unless: Option<Regex>,
    outcome: SyntaxOutcome,
}

fn rule(pattern: &str, unless: Option<&str>, outcome: SyntaxOutcome) -> SyntaxRule {
    SyntaxRule {
        pattern: Regex::new(pattern).expect("valid syntax rule pattern"),
        unless: unless.map(|p| Regex::new(p).expect("valid syntax rule pattern")),
        outcome,
    }
}

static SYNTAX_RULES: LazyLock<Vec<SyntaxRule>> = LazyLock::new(|| {
    vec![
        rule(r"xsl", None, SyntaxOutcome::Fixed("xsl")),
        rule(
            r"\bsource\.([\w\-]+)",
            Some(r"\bstring\b"),
            SyntaxOutcome::KnownCapture,
        ),
        // CSS-like syntaxes are matched by name, highlighters disagree on scope roots
        rule(
            r"\b(less|scss|sass|css|stylus)\b",
            None,
            SyntaxOutcome::Capture,
        ),
        rule(r"\b(html|xml|haml|slim)\b", None, SyntaxOutcome::Capture),
    ]
});

/// Resolve a syntax id from the scope string alone
pub fn resolve_syntax(scope: &str, config: &SyntaxConfig) -> String {
    for rule in SYNTAX_RULES.iter() {
        if rule.unless.as_ref().is_some_and(|re| re.is_match(scope)) {
            continue;
        }
        let Some(captures) = rule.pattern.captures(scope) else {
            continue;
        };
        let resolved = match rule.outcome {
            SyntaxOutcome::Fixed(name) => Some(name.to_string()),
            SyntaxOutcome::Capture => captures.get(1).map(|m| m.as_str().to_string()),
            SyntaxOutcome::KnownCapture => captures
                .get(1)
                .map(|m| m.as_str())
                .filter(|name| config.is_known_syntax(name))
                .map(str::to_string),
        };
        if let Some(syntax) = resolved {
            return syntax;
        }
    }
    config.default_syntax.clone()
}

/// Resolve the syntax at `caret`, refining HTML to CSS inside embedded styles
pub fn detect_syntax(scope: &str, document: &str, caret: usize, config: &SyntaxConfig) -> String {
    let syntax = resolve_syntax(scope, config);
    if syntax == "html" && (in_style_element(document, caret) || in_style_attribute(document, caret))
    {
        debug!(caret, "Caret inside embedded stylesheet, using css");
        return "css".to_string();
    }
    syntax
}

static STYLE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<style\b[^>]*>").expect("valid style tag pattern"));

static STYLE_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</style\b").expect("valid style tag pattern"));

static STYLE_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bstyle\s*=\s*("[^"]*"|'[^']*')"#).expect("valid style attribute pattern")
});

/// Caret sits in the body of a `<style>` element
pub fn in_style_element(document: &str, caret: usize) -> bool {
    let caret = crate::utils::floor_char_boundary(document, caret);
    let before = &document[..caret];
    let Some(open) = STYLE_OPEN_RE.find_iter(before).last() else {
        return false;
    };
    !STYLE_CLOSE_RE.is_match(&before[open.end()..])
}

/// Caret sits inside the quoted value of a `style` attribute
pub fn in_style_attribute(document: &str, caret: usize) -> bool {
    STYLE_ATTR_RE.captures_iter(document).any(|captures| {
        captures.get(1).is_some_and(|value| {
            // Between the quotes, inclusive of the position before the closing one
            value.start() < caret && caret < value.end()
        })
    })
}

static XHTML_DOCTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!DOCTYPE[^>]+XHTML").expect("valid doctype pattern"));

/// Document declares an XHTML doctype
pub fn is_xhtml(document: &str) -> bool {
    XHTML_DOCTYPE_RE.is_match(document)
}

// ============================================================================
// Profile detection
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum ProfileOutcome {
    /// "xhtml" when autodetection is on and the document is XHTML, else fall through
    XhtmlIfDeclared,
    /// Use the default profile of the resolved syntax
    SyntaxDefault,
    Fixed(&'static str),
}

struct ProfileRule {
    /// Any of these selectors triggers the rule
    selectors: &'static [&'static str],
    outcome: ProfileOutcome,
}

const PROFILE_RULES: &[ProfileRule] = &[
    ProfileRule {
        selectors: &["text.html"],
        outcome: ProfileOutcome::XhtmlIfDeclared,
    },
    // Markup embedded in another language's block strings keeps markup formatting
    ProfileRule {
        selectors: &[
            "string.quoted.double.block.python",
            "source.coffee string",
            "string.unquoted.heredoc",
        ],
        outcome: ProfileOutcome::SyntaxDefault,
    },
    ProfileRule {
        selectors: &["source string"],
        outcome: ProfileOutcome::Fixed("line"),
    },
];

/// Resolve the output profile at `caret` for an already-detected syntax
pub fn detect_profile(
    scope: &str,
    syntax: &str,
    document: &str,
    caret: usize,
    config: &SyntaxConfig,
) -> String {
    for rule in PROFILE_RULES {
        if !rule.selectors.iter().any(|s| scope_matches(scope, s)) {
            continue;
        }
        match rule.outcome {
            ProfileOutcome::XhtmlIfDeclared => {
                if config.autodetect_xhtml && is_xhtml(document) {
                    return "xhtml".to_string();
                }
            }
            ProfileOutcome::SyntaxDefault => {
                return default_profile(syntax, document, caret);
            }
            ProfileOutcome::Fixed(profile) => return profile.to_string(),
        }
    }
    default_profile(syntax, document, caret)
}

/// Default output profile for a syntax
pub fn default_profile(syntax: &str, document: &str, caret: usize) -> String {
    let profile = match syntax {
        "xml" | "xsl" => "xml",
        "html" if is_xhtml(document) => "xhtml",
        "html" => "html",
        "css" if in_style_attribute(document, caret) => "line",
        _ => "xhtml",
    };
    profile.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SyntaxConfig {
        SyntaxConfig::default()
    }

    #[test]
    fn test_scope_matches_prefix_atoms() {
        assert!(scope_matches("text.html.basic meta.tag", "text.html"));
        assert!(scope_matches(
            "source.python meta.call string.quoted.double",
            "source string"
        ));
        assert!(!scope_matches("text.htmlx", "text.html"));
        assert!(!scope_matches("string.quoted source.python", "source string"));
        assert!(scope_matches("anything", ""));
    }

    #[test]
    fn test_xsl_wins() {
        assert_eq!(resolve_syntax("text.xml.xsl source.css", &config()), "xsl");
    }

    #[test]
    fn test_known_source_syntax() {
        assert_eq!(resolve_syntax("source.scss meta.property", &config()), "scss");
        assert_eq!(resolve_syntax("source.less", &config()), "less");
    }

    #[test]
    fn test_unknown_source_falls_through() {
        assert_eq!(resolve_syntax("source.python", &config()), "html");
    }

    #[test]
    fn test_string_scope_skips_source_rule() {
        // Inside a string the source language must not win
        assert_eq!(
            resolve_syntax("source.css string.quoted.double", &config()),
            "css"
        );
        assert_eq!(
            resolve_syntax("source.python string.quoted.double.block.python", &config()),
            "html"
        );
    }

    #[test]
    fn test_markup_words() {
        assert_eq!(resolve_syntax("text.haml", &config()), "haml");
        assert_eq!(resolve_syntax("text.xml meta.tag", &config()), "xml");
    }

    #[test]
    fn test_default_syntax_is_configurable() {
        let config = SyntaxConfig {
            default_syntax: "xml".to_string(),
            ..config()
        };
        assert_eq!(resolve_syntax("text.plain", &config), "xml");
    }

    #[test]
    fn test_style_element_refines_to_css() {
        let doc = "<html><style>\nbody { }\n</style><p></p>";
        let inside = doc.find("body").unwrap();
        let after = doc.find("<p>").unwrap();
        assert_eq!(detect_syntax("text.html.basic", doc, inside, &config()), "css");
        assert_eq!(detect_syntax("text.html.basic", doc, after, &config()), "html");
    }

    #[test]
    fn test_style_attribute_refines_to_css() {
        let doc = r#"<div style="color: red" class="x"></div>"#;
        let inside = doc.find("color").unwrap();
        let class = doc.find("class").unwrap();
        assert!(in_style_attribute(doc, inside));
        assert!(!in_style_attribute(doc, class));
        assert_eq!(detect_syntax("text.html.basic", doc, inside, &config()), "css");
    }

    #[test]
    fn test_is_xhtml() {
        assert!(is_xhtml(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN">"#
        ));
        assert!(!is_xhtml("<!DOCTYPE html>"));
    }

    #[test]
    fn test_profile_xhtml_autodetect() {
        let doc = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN"><p>"#;
        let autodetect = SyntaxConfig {
            autodetect_xhtml: true,
            ..config()
        };
        assert_eq!(
            detect_profile("text.html.basic", "html", doc, 10, &autodetect),
            "xhtml"
        );
    }

    #[test]
    fn test_profile_line_inside_source_string() {
        assert_eq!(
            detect_profile("source.js string.quoted.single", "html", "", 0, &config()),
            "line"
        );
    }

    #[test]
    fn test_profile_block_string_uses_syntax_default() {
        assert_eq!(
            detect_profile(
                "source.python string.quoted.double.block.python",
                "html",
                "",
                0,
                &config()
            ),
            "html"
        );
        assert_eq!(
            detect_profile("source.php string.unquoted.heredoc", "html", "", 0, &config()),
            "html"
        );
    }

    #[test]
    fn test_default_profiles() {
        assert_eq!(default_profile("xsl", "", 0), "xml");
        assert_eq!(default_profile("html", "", 0), "html");
        assert_eq!(default_profile("scss", "", 0), "xhtml");

        let doc = r#"<a style="c"></a>"#;
        assert_eq!(default_profile("css", doc, 10), "line");
    }
}
