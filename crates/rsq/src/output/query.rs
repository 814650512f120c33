//! Filter query output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;

use rsk_query_rs::filter::{CstNode, Filter, NodeKind, ParseError};

/// JSON output structure for the parse command.
#[derive(Serialize)]
pub struct ParseOutput<'a> {
    pub query: String,
    pub filter: &'a Filter,
}

/// Formats a parsed filter as JSON.
pub fn format_filter_json(filter: &Filter) -> Result<String, serde_json::Error> {
    let output = ParseOutput {
        query: filter.to_string(),
        filter,
    };
    serde_json::to_string_pretty(&output)
}

/// A value the checker could not type.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct InvalidValue {
    pub text: String,
    pub position: usize,
}

/// Collects the malformed leaves of a tree, left to right.
pub fn invalid_values(node: &CstNode) -> Vec<InvalidValue> {
    node.leaves()
        .into_iter()
        .filter(|leaf| !leaf.is_valid())
        .map(|leaf| InvalidValue {
            text: leaf.text(),
            position: leaf.span().map_or(0, |span| span.start),
        })
        .collect()
}

/// JSON output structure for the check command.
#[derive(Serialize)]
pub struct CheckOutput<'a> {
    pub valid: bool,
    pub incomplete: bool,
    pub invalid_values: Vec<InvalidValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub tree: &'a CstNode,
}

/// Formats the outcome of a check as JSON.
///
/// `tree` is the checked tree when parsing succeeded, or the flat fallback
/// tree when it did not.
pub fn format_check_json(
    tree: &CstNode,
    error: Option<&ParseError>,
) -> Result<String, serde_json::Error> {
    let invalid_values = invalid_values(tree);
    let output = CheckOutput {
        valid: error.is_none() && invalid_values.is_empty(),
        incomplete: error.is_some_and(ParseError::is_incomplete),
        invalid_values,
        error: error.map(ToString::to_string),
        position: error.map(ParseError::position),
        tree,
    };
    serde_json::to_string_pretty(&output)
}

/// Renders a tree's leaves as the original text, colored by role.
pub fn format_cst(node: &CstNode, use_colors: bool) -> String {
    node.leaves()
        .into_iter()
        .map(|leaf| paint(leaf, use_colors))
        .collect()
}

fn paint(leaf: &CstNode, use_colors: bool) -> String {
    let text = leaf.text();
    if !use_colors {
        return text;
    }
    if !leaf.is_valid() {
        return text.red().underline().to_string();
    }
    match leaf.kind() {
        NodeKind::Field => text.cyan().to_string(),
        NodeKind::CompOp => text.yellow().to_string(),
        NodeKind::BoolOp => text.magenta().bold().to_string(),
        NodeKind::Value => text.green().to_string(),
        NodeKind::Paren => text.dimmed().to_string(),
        NodeKind::Unknown => text.red().to_string(),
        _ => text,
    }
}

/// Formats the input with a caret under the byte offset `position`.
///
/// Only the line holding `position` is shown.
pub fn format_caret(input: &str, position: usize) -> String {
    let position = position.min(input.len());
    let before = input.get(..position).unwrap_or(input);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line_end = input[line_start..]
        .find('\n')
        .map_or(input.len(), |i| line_start + i);
    let column = before[line_start..].chars().count();

    format!(
        "{}\n{}^",
        &input[line_start..line_end],
        " ".repeat(column)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsk_query_rs::filter::{parse, parse_cst, parse_cst_lossy};

    #[test]
    fn test_format_cst_without_colors_reproduces_input() {
        let input = r#"actor = "karl"  and (episode>3)"#;
        let cst = parse_cst(input).unwrap();
        assert_eq!(format_cst(&cst, false), input);
    }

    #[test]
    fn test_format_cst_with_colors_keeps_text() {
        let cst = parse_cst("a = 1").unwrap();
        let colored = format_cst(&cst, true);
        assert_ne!(colored, "a = 1");
        assert!(colored.contains('a'));
        assert!(colored.contains('1'));
    }

    #[test]
    fn test_invalid_values() {
        let cst = parse_cst(r#"actor = - and content = "open"#).unwrap();
        assert_eq!(
            invalid_values(&cst),
            vec![
                InvalidValue {
                    text: "-".to_string(),
                    position: 8,
                },
                InvalidValue {
                    text: "\"open".to_string(),
                    position: 24,
                },
            ]
        );
    }

    #[test]
    fn test_format_check_json_for_incomplete_query() {
        let (tree, error) = parse_cst_lossy("episode >");
        let json: serde_json::Value =
            serde_json::from_str(&format_check_json(&tree, error.as_ref()).unwrap()).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["incomplete"], true);
        assert_eq!(json["position"], 9);
        assert_eq!(json["tree"]["kind"], "parse_error");
    }

    #[test]
    fn test_format_check_json_for_valid_query() {
        let tree = parse_cst("a = 1").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_check_json(&tree, None).unwrap()).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["incomplete"], false);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_format_filter_json() {
        let filter = parse("a = 1 and b = \"x\"").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_filter_json(&filter).unwrap()).unwrap();
        assert_eq!(json["query"], r#"a=1 and b="x""#);
        assert!(json["filter"].is_object());
    }

    #[test]
    fn test_format_caret() {
        assert_eq!(format_caret("field@1", 5), "field@1\n     ^");
        assert_eq!(format_caret("a=", 2), "a=\n  ^");
        assert_eq!(format_caret("a = 1\nor é@", 11), "or é@\n    ^");
    }
}
