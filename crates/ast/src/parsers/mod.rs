mod ecma;
mod javascript;
mod python;
mod typescript;

pub use javascript::JavaScriptParser;
pub use python::PythonParser;
pub use typescript::TypeScriptParser;

use crate::error::{ParserError, Result};
use tree_sitter::{Node, Parser};

/// Configure a tree-sitter parser for a grammar
pub(crate) fn init_parser(grammar: &tree_sitter::Language) -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(grammar)
        .map_err(|e| ParserError::grammar(format!("Failed to set language: {e}")))?;
    Ok(parser)
}

/// Source text covered by a node
pub(crate) fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// 1-indexed start line of a node
pub(crate) fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

/// Fail when the grammar reported error or missing nodes anywhere in the
/// tree; the analyzers must never run over a structure the grammar could
/// not account for.
pub(crate) fn check_tree(tree: &tree_sitter::Tree, file_path: &str) -> Result<()> {
    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }
    let line = first_error_line(root).unwrap_or(1);
    Err(ParserError::parse(
        file_path,
        format!("syntax error near line {line}"),
    ))
}

fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(line) = first_error_line(child) {
                return Some(line);
            }
        }
    }
    None
}

/// Strip matching string quotes from a module specifier literal
pub(crate) fn unquote(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}
