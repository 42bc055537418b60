//! Fast top-level declaration extraction.
//!
//! The index deliberately avoids a full parse: a handful of compiled
//! regexes per language pull out top-level class/interface/type/enum
//! names at thousand-file scale. This trades completeness (re-exports and
//! nested declarations are missed) for speed; traversal correctness never
//! depends on it.

use once_cell::sync::Lazy;
use regex::Regex;
use relmap_ast::Language;

static ECMA_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?class\s+([A-Za-z_$][A-Za-z0-9_$]*)",
        r"(?m)^\s*(?:export\s+)?(?:declare\s+)?interface\s+([A-Za-z_$][A-Za-z0-9_$]*)",
        r"(?m)^\s*(?:export\s+)?(?:declare\s+)?type\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*(?:<[^=]*)?=",
        r"(?m)^\s*(?:export\s+)?(?:declare\s+)?(?:const\s+)?enum\s+([A-Za-z_$][A-Za-z0-9_$]*)",
    ])
});

static JAVA_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?m)^\s*(?:public\s+|protected\s+|private\s+)?(?:static\s+)?(?:final\s+|abstract\s+)*(?:class|interface|enum|record)\s+([A-Za-z_$][A-Za-z0-9_$]*)",
    ])
});

static PYTHON_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"(?m)^class\s+([A-Za-z_][A-Za-z0-9_]*)"]));

static TYPE_NAME_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][A-Za-z0-9_]*\b").expect("valid pattern"));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                log::error!("Invalid declaration pattern {pattern}: {e}");
                None
            }
        })
        .collect()
}

/// Top-level declared type names in `source`, in order of appearance,
/// duplicate-free. Empty for languages without extraction patterns.
pub fn declared_names(language: Language, source: &str) -> Vec<String> {
    let patterns: &[Regex] = match language {
        Language::TypeScript | Language::JavaScript => &ECMA_PATTERNS,
        Language::Java => &JAVA_PATTERNS,
        Language::Python => &PYTHON_PATTERNS,
        Language::Unknown => return Vec::new(),
    };

    let mut names: Vec<(usize, String)> = Vec::new();
    for pattern in patterns {
        for capture in pattern.captures_iter(source) {
            if let Some(name) = capture.get(1) {
                if !names.iter().any(|(_, existing)| existing == name.as_str()) {
                    names.push((name.start(), name.as_str().to_string()));
                }
            }
        }
    }
    names.sort_by_key(|(offset, _)| *offset);
    names.into_iter().map(|(_, name)| name).collect()
}

/// Capitalized type-name words occurring anywhere in `source`, in order
/// of first appearance, duplicate-free.
///
/// Backward traversal uses this to find files *referencing* a class
/// without parsing them; any mention counts, which over-approximates in
/// the same way the declaration heuristics under-approximate.
pub fn referenced_names(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for word in TYPE_NAME_WORD.find_iter(source) {
        if !names.iter().any(|existing| existing == word.as_str()) {
            names.push(word.as_str().to_string());
        }
    }
    names
}
