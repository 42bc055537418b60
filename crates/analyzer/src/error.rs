use relmap_ast::Language;
use thiserror::Error;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors surfaced by the analyzers.
///
/// At traversal scope, per-file parser and provider failures are caught
/// and downgraded to a skip; they appear here only when the immediate
/// caller asked about a single file, or when the underlying error is a
/// registry configuration defect.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Parser or registry failure
    #[error(transparent)]
    Parser(#[from] relmap_ast::ParserError),

    /// File-provider failure
    #[error(transparent)]
    Provider(#[from] relmap_provider::ProviderError),

    /// The requested analysis has no support for this language
    #[error("Unsupported language for sequence analysis: {language}")]
    UnsupportedLanguage { language: Language },
}
