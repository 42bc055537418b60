use crate::language::Language;
use thiserror::Error;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParserError>;

/// Errors that can occur while parsing or configuring parsers.
///
/// Registry configuration errors ([`ParserError::DuplicateRegistration`],
/// [`ParserError::LanguageMismatch`]) signal a setup defect and are always
/// fatal; per-file errors surface to the immediate caller and may be
/// downgraded to a skip at traversal scope.
#[derive(Error, Debug)]
pub enum ParserError {
    /// File extension is not mapped to any known language
    #[error("Unsupported file type: {path}")]
    UnsupportedFileType { path: String },

    /// Language is known but no parser implementation was registered
    #[error("No parser registered for language: {language}")]
    NoParserRegistered { language: Language },

    /// The grammar reported error or missing nodes
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// A parser for this language already exists (eager or lazy)
    #[error("Parser already registered for language: {language}")]
    DuplicateRegistration { language: Language },

    /// A lazy factory produced a parser for the wrong language
    #[error("Lazy factory registered for {expected} produced a parser for {actual}")]
    LanguageMismatch { expected: Language, actual: Language },

    /// Tree-sitter grammar setup failure
    #[error("Grammar error: {0}")]
    Grammar(String),
}

impl ParserError {
    /// Create a parse error for a file
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a grammar setup error
    pub fn grammar(msg: impl Into<String>) -> Self {
        Self::Grammar(msg.into())
    }

    /// Create an unsupported-file-type error
    pub fn unsupported(path: impl Into<String>) -> Self {
        Self::UnsupportedFileType { path: path.into() }
    }
}
