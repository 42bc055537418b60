use super::{check_tree, ecma, init_parser};
use crate::error::{ParserError, Result};
use crate::language::Language;
use crate::parser::LanguageParser;
use crate::types::UnifiedAst;
use tree_sitter::Parser;

/// TypeScript grammar adapter
pub struct TypeScriptParser {
    parser: Option<Parser>,
}

impl TypeScriptParser {
    /// Create the adapter; the grammar is loaded on first parse
    pub fn new() -> Self {
        Self { parser: None }
    }

    fn parser(&mut self) -> Result<&mut Parser> {
        if self.parser.is_none() {
            let grammar = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
            self.parser = Some(init_parser(&grammar)?);
        }
        self.parser
            .as_mut()
            .ok_or_else(|| ParserError::grammar("typescript parser unavailable"))
    }
}

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageParser for TypeScriptParser {
    fn parse(&mut self, source: &str, file_path: &str) -> Result<UnifiedAst> {
        let tree = self
            .parser()?
            .parse(source, None)
            .ok_or_else(|| ParserError::parse(file_path, "tree-sitter returned no tree"))?;
        check_tree(&tree, file_path)?;

        let ast = UnifiedAst::new(Language::TypeScript, file_path);
        Ok(ecma::build_ast(ast, tree.root_node(), source))
    }

    fn language(&self) -> Language {
        Language::TypeScript
    }
}
