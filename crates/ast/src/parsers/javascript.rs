use super::{check_tree, ecma, init_parser};
use crate::error::{ParserError, Result};
use crate::language::Language;
use crate::parser::LanguageParser;
use crate::types::UnifiedAst;
use tree_sitter::Parser;

/// JavaScript grammar adapter
pub struct JavaScriptParser {
    parser: Option<Parser>,
}

impl JavaScriptParser {
    /// Create the adapter; the grammar is loaded on first parse
    pub fn new() -> Self {
        Self { parser: None }
    }

    fn parser(&mut self) -> Result<&mut Parser> {
        if self.parser.is_none() {
            let grammar = tree_sitter_javascript::LANGUAGE.into();
            self.parser = Some(init_parser(&grammar)?);
        }
        self.parser
            .as_mut()
            .ok_or_else(|| ParserError::grammar("javascript parser unavailable"))
    }
}

impl Default for JavaScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageParser for JavaScriptParser {
    fn parse(&mut self, source: &str, file_path: &str) -> Result<UnifiedAst> {
        let tree = self
            .parser()?
            .parse(source, None)
            .ok_or_else(|| ParserError::parse(file_path, "tree-sitter returned no tree"))?;
        check_tree(&tree, file_path)?;

        let ast = UnifiedAst::new(Language::JavaScript, file_path);
        Ok(ecma::build_ast(ast, tree.root_node(), source))
    }

    fn language(&self) -> Language {
        Language::JavaScript
    }
}
