use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Java,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "py" | "pyw" => Language::Python,
            "java" => Language::Java,
            _ => Language::Unknown,
        }
    }

    /// Detect language from a file path or URI.
    ///
    /// Tolerates URI-style inputs (`file:///a/b.ts`, `inmemory://x/y.py?v=2`)
    /// by looking only at the extension of the path segment, with query and
    /// fragment suffixes stripped. Returns [`Language::Unknown`] when the
    /// extension is unmapped; content sniffing is not attempted.
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or(path);
        let file_name = path.rsplit('/').next().unwrap_or(path);
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Self::from_extension(ext),
            _ => Language::Unknown,
        }
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Unknown => "unknown",
        }
    }

    /// Source file extensions mapped to this language
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::TypeScript => &["ts", "tsx", "mts", "cts"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::Python => &["py", "pyw"],
            Language::Java => &["java"],
            Language::Unknown => &[],
        }
    }

    /// Check if a tree-sitter grammar is available for this language.
    ///
    /// Java is detected and indexable through declaration heuristics but
    /// carries no full grammar adapter.
    pub fn supports_ast(self) -> bool {
        matches!(
            self,
            Language::TypeScript | Language::JavaScript | Language::Python
        )
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
