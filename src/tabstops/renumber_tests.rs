use super::*;
use std::collections::HashSet;

fn defaults() -> TabstopConfig {
    TabstopConfig::default()
}

#[test]
fn test_single_zero_group() {
    let result = Renumbered::from_source("${0}", &defaults());
    assert_eq!(result.text, "${1}");
    assert_eq!(result.exit_point, Some(ExitPoint { start: 0, end: 4 }));
    assert_eq!(result.placeholders.len(), 1);
    assert_eq!(result.placeholders[0].index, 1);
    assert!(result.placeholders[0].is_exit_point());
}

#[test]
fn test_link_with_exit_point() {
    let result = Renumbered::from_source("<a href=\"${1}\">${2}</a>${0}", &defaults());
    assert_eq!(result.text, "<a href=\"${1001}\">${1002}</a>${1}");

    // Exit point sits where the source `${0}` was, after renumbering shifts
    let exit = result.exit_point.unwrap();
    assert_eq!(&result.text[exit.start..exit.end], "${1}");
    assert_eq!(exit.end, result.text.len());
}

#[test]
fn test_escaped_dollar_in_default_text() {
    let result = Renumbered::from_source(r"${0:cost \$5}", &defaults());
    assert_eq!(result.text, r"${1:cost \$5}");
    assert_eq!(result.placeholders[0].index, 1);
}

#[test]
fn test_bare_dollar_in_default_text_is_escaped() {
    let result = Renumbered::from_source("${0:cost $5}", &defaults());
    assert_eq!(result.text, r"${1:cost \$5}");
}

#[test]
fn test_every_zero_group_is_unique() {
    let result = Renumbered::from_source("<li>${0}</li><li>${0}</li><li>${0}</li>", &defaults());
    assert_eq!(result.text, "<li>${1}</li><li>${2}</li><li>${3}</li>");

    let exit = result.exit_point.unwrap();
    assert_eq!(&result.text[exit.start..exit.end], "${3}");
}

#[test]
fn test_linked_groups_stay_linked() {
    let result = Renumbered::from_source("${1:a} ${2:b} ${1:c}", &defaults());
    let indices: Vec<u64> = result.placeholders.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![1001, 1002, 1001]);
    assert_eq!(result.exit_point, None);
}

#[test]
fn test_nested_placeholders_share_counters() {
    let result = Renumbered::from_source("${0:outer ${0} ${3:x}} ${0}", &defaults());
    assert_eq!(result.text, "${1:outer ${2} ${1003:x}} ${3}");

    let indices: Vec<u64> = result.placeholders.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![1, 2, 1003, 3]);
}

#[test]
fn test_nested_zero_group_wins_over_its_outer() {
    let result = Renumbered::from_source("<b>${0:a ${0:b}}</b>", &defaults());
    let exit = result.exit_point.unwrap();
    assert_eq!(&result.text[exit.start..exit.end], "${2:b}");
}

#[test]
fn test_placeholder_ranges_point_into_rendered_text() {
    let result = Renumbered::from_source("x${1:y}z${0}", &defaults());
    assert_eq!(result.text, "x${1001:y}z${1}");
    let tokens: Vec<&str> = result
        .placeholders
        .iter()
        .map(|p| &result.text[p.range.0..p.range.1])
        .collect();
    assert_eq!(tokens, vec!["${1001:y}", "${1}"]);
    assert_eq!(result.placeholders[1].source_range, Some((8, 12)));
}

#[test]
fn test_insert_final_tabstop_appends_marker() {
    let config = TabstopConfig {
        insert_final_tabstop: true,
        ..defaults()
    };
    let result = Renumbered::from_source("<p>${0}</p>", &config);
    assert_eq!(result.text, "<p>${1}</p>${0}");
    assert_eq!(
        result.exit_point,
        Some(ExitPoint {
            start: 11,
            end: 15
        })
    );
    assert!(result.placeholders.last().unwrap().source_range.is_none());
}

#[test]
fn test_insert_final_tabstop_without_placeholders() {
    let config = TabstopConfig {
        insert_final_tabstop: true,
        ..defaults()
    };
    let result = Renumbered::from_source("plain", &config);
    assert_eq!(result.text, "plain${0}");
}

#[test]
fn test_no_exit_point_without_zero_group() {
    let result = Renumbered::from_source("<div>${1}</div>", &defaults());
    assert_eq!(result.exit_point, None);
}

#[test]
fn test_exit_as_final_stop_rewrites_index() {
    let config = TabstopConfig {
        exit_as_final_stop: true,
        ..defaults()
    };
    let result = Renumbered::from_source("${0:a} ${1} ${0:b} ${2}", &config);
    assert_eq!(result.text, "${1:a} ${1001} ${0:b} ${1002}");

    let exit = result.exit_point.unwrap();
    assert_eq!(&result.text[exit.start..exit.end], "${0:b}");

    let last = result.placeholders.last().unwrap();
    assert_eq!(&result.text[last.range.0..last.range.1], "${1002}");
}

#[test]
fn test_exit_as_final_stop_shrinks_enclosing_range() {
    let config = TabstopConfig {
        exit_as_final_stop: true,
        ..defaults()
    };
    let source = format!("{}${{1:in ${{0}}}}", "${0}".repeat(10));
    let result = Renumbered::from_source(&source, &config);
    // The eleventh zero-group had a two-digit index before rewriting
    assert!(result.text.ends_with("${1001:in ${0}}"));
    let outer = result.placeholders.iter().find(|p| p.index == 1001).unwrap();
    assert_eq!(&result.text[outer.range.0..outer.range.1], "${1001:in ${0}}");
}

#[test]
fn test_linked_base_rises_above_zero_count() {
    let config = TabstopConfig {
        linked_base: 2,
        ..defaults()
    };
    let result = Renumbered::from_source("${0}${0}${0}${1}", &config);
    let zero: HashSet<u64> = result
        .placeholders
        .iter()
        .filter(|p| p.is_exit_point())
        .map(|p| p.index)
        .collect();
    let linked = result.placeholders.iter().find(|p| p.original_group == 1).unwrap();
    assert_eq!(zero, HashSet::from([1, 2, 3]));
    assert_eq!(linked.index, 4);
}

#[test]
fn test_plain_text_escaping() {
    let result = Renumbered::from_source(r"a\\b \$ c } ${1:d\}e}", &defaults());
    assert_eq!(result.text, r"a\\b \$ c } ${1001:d\}e}");
}

#[test]
fn test_malformed_tokens_survive_as_escaped_literals() {
    let result = Renumbered::from_source("${x} ${0}", &defaults());
    assert_eq!(result.text, r"\${x} ${1}");
}

#[test]
fn test_escape_text() {
    assert_eq!(escape_text("$100 \\ }"), r"\$100 \\ }");
}

#[test]
fn test_malformed_token_in_default_renders_literally() {
    let result = Renumbered::from_source("${1:a ${x} b}", &defaults());
    assert_eq!(result.text, r"${1001:a \$\{x\} b}");
    assert_eq!(result.placeholders.len(), 1);
    assert_eq!(result.placeholders[0].range, (0, result.text.len()));

    let rescanned = Template::parse(&result.text);
    let placeholders = rescanned.placeholders();
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].group, 1001);
    assert_eq!(
        placeholders[0].default.as_ref().map(|d| d.segments.clone()),
        Some(vec![Segment::Text("a ${x} b".to_string())])
    );
}

#[test]
fn test_braces_in_default_are_escaped() {
    let result = Renumbered::from_source("${1:fn() {x}}${0}", &defaults());
    assert_eq!(result.text, r"${1001:fn() \{x\}}${1}");
    assert_eq!(Template::parse(&result.text).placeholder_count(), 2);
}
