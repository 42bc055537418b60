use crate::error::{ParserError, Result};
use crate::language::Language;
use crate::parsers::{JavaScriptParser, PythonParser, TypeScriptParser};
use crate::registry::ParserRegistry;
use crate::types::UnifiedAst;

/// Capability interface implemented by each language adapter.
///
/// One variant per language, selected through the language-keyed
/// [`ParserRegistry`] rather than subclassing.
pub trait LanguageParser {
    /// Parse source text into a [`UnifiedAst`].
    ///
    /// Fails with [`ParserError::Parse`] when the grammar reports error or
    /// missing nodes.
    fn parse(&mut self, source: &str, file_path: &str) -> Result<UnifiedAst>;

    /// The language this parser handles
    fn language(&self) -> Language;

    /// Whether this parser can handle `file_path`, by extension
    fn can_parse(&self, file_path: &str) -> bool {
        Language::from_path(file_path) == self.language()
    }
}

impl std::fmt::Debug for dyn LanguageParser + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageParser")
            .field("language", &self.language())
            .finish()
    }
}

/// Detection and dispatch facade over a [`ParserRegistry`].
///
/// One instance per analysis session; the registry is owned here, not
/// process-global.
pub struct ParserService {
    registry: ParserRegistry,
}

impl ParserService {
    /// Wrap an already-populated registry
    pub fn new(registry: ParserRegistry) -> Self {
        Self { registry }
    }

    /// A service with the bundled tree-sitter adapters registered lazily.
    ///
    /// Grammar loading is deferred until a file of that language is
    /// actually parsed.
    pub fn with_default_parsers() -> Self {
        let mut registry = ParserRegistry::new();
        // A fresh registry cannot hold duplicates, so these cannot fail.
        let _ = registry.register_lazy(Language::TypeScript, || {
            Box::new(TypeScriptParser::new()) as Box<dyn LanguageParser>
        });
        let _ = registry.register_lazy(Language::JavaScript, || {
            Box::new(JavaScriptParser::new()) as Box<dyn LanguageParser>
        });
        let _ = registry.register_lazy(Language::Python, || {
            Box::new(PythonParser::new()) as Box<dyn LanguageParser>
        });
        Self { registry }
    }

    /// Detect the language of a path, `None` when the extension is unmapped
    pub fn detect_language(file_path: &str) -> Option<Language> {
        match Language::from_path(file_path) {
            Language::Unknown => None,
            language => Some(language),
        }
    }

    /// Whether a registered parser exists for this path's language
    pub fn can_parse(&self, file_path: &str) -> bool {
        Self::detect_language(file_path)
            .map(|language| self.registry.has_parser(language))
            .unwrap_or(false)
    }

    /// Parse source text for `file_path`.
    ///
    /// Fails with [`ParserError::UnsupportedFileType`] when the extension
    /// is unmapped and [`ParserError::NoParserRegistered`] when the mapped
    /// language lacks an implementation.
    pub fn parse(&mut self, source: &str, file_path: &str) -> Result<UnifiedAst> {
        let language = Self::detect_language(file_path)
            .ok_or_else(|| ParserError::unsupported(file_path))?;
        let parser = self.registry.parser_for(language)?;
        parser.parse(source, file_path)
    }

    /// Access the underlying registry, e.g. to register additional languages
    pub fn registry_mut(&mut self) -> &mut ParserRegistry {
        &mut self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(
            ParserService::detect_language("/src/app.ts"),
            Some(Language::TypeScript)
        );
        assert_eq!(
            ParserService::detect_language("main.py"),
            Some(Language::Python)
        );
        assert_eq!(ParserService::detect_language("README.md"), None);
    }

    #[test]
    fn test_unsupported_file_type() {
        let mut service = ParserService::with_default_parsers();
        let err = service.parse("x", "notes.txt").unwrap_err();
        assert!(matches!(err, ParserError::UnsupportedFileType { .. }));
    }

    #[test]
    fn test_no_parser_registered() {
        let mut service = ParserService::new(ParserRegistry::new());
        let err = service.parse("class A {}", "A.ts").unwrap_err();
        assert!(matches!(
            err,
            ParserError::NoParserRegistered {
                language: Language::TypeScript
            }
        ));
    }

    #[test]
    fn test_java_detected_but_unparsed() {
        let service = ParserService::with_default_parsers();
        assert_eq!(
            ParserService::detect_language("App.java"),
            Some(Language::Java)
        );
        assert!(!service.can_parse("App.java"));
    }

    #[test]
    fn test_parse_dispatches_by_extension() {
        let mut service = ParserService::with_default_parsers();
        let ast = service.parse("export class User {}", "/src/User.ts").unwrap();
        assert_eq!(ast.language, Language::TypeScript);
        assert_eq!(ast.classes.len(), 1);
        assert_eq!(ast.classes[0].name, "User");
    }
}
