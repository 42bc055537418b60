use crate::declarations::{declared_names, referenced_names};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use relmap_ast::Language;
use relmap_provider::FileProvider;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default include globs covering every indexable language
pub const DEFAULT_INCLUDE: &[&str] = &[
    "**/*.ts", "**/*.tsx", "**/*.js", "**/*.jsx", "**/*.py", "**/*.java",
];

/// Default excludes: vendor, build and cache scopes
pub const DEFAULT_EXCLUDE: &[&str] = &[
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/out/**",
    "**/coverage/**",
    "**/__pycache__/**",
    "**/target/**",
    "**/vendor/**",
    "**/.git/**",
];

/// Build-time bounds for the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportIndexConfig {
    /// Candidate-file include globs
    pub include: Vec<String>,

    /// Exclude globs applied after includes
    pub exclude: Vec<String>,

    /// Hard cap on scanned files; scanning stops with a warning once hit
    pub max_files: usize,
}

impl Default for ImportIndexConfig {
    fn default() -> Self {
        Self {
            include: DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
            exclude: DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            max_files: 5_000,
        }
    }
}

impl ImportIndexConfig {
    /// Config restricted to one language's extensions
    pub fn for_language(language: Language) -> Self {
        Self {
            include: language
                .extensions()
                .iter()
                .map(|ext| format!("**/*.{ext}"))
                .collect(),
            ..Default::default()
        }
    }
}

/// Session-scoped `class name → declaring files` table.
///
/// Built once per analysis session for O(1) lookup during traversal.
/// Ambiguity is surfaced, not resolved: a name declared in several files
/// keeps every declaring path, in discovery order. This is strictly a
/// performance layer; analysis correctness never depends on it.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ImportIndex {
    entries: HashMap<String, Vec<String>>,
    files_scanned: usize,
}

impl ImportIndex {
    /// Build the index by scanning the provider's candidate files.
    ///
    /// Files that fail to read or extract are skipped and logged, never
    /// fatal. Once `max_files` is reached, remaining candidates are
    /// dropped with a warning.
    pub fn build(provider: &dyn FileProvider, config: &ImportIndexConfig) -> Self {
        let mut index = Self::default();
        let exclude = build_globset(&config.exclude);
        let candidates = candidate_files(provider, &config.include, exclude.as_ref());

        for (scanned, path) in candidates.iter().enumerate() {
            if scanned >= config.max_files {
                log::warn!(
                    "Import index capped at {} files; {} candidates unscanned",
                    config.max_files,
                    candidates.len() - scanned
                );
                break;
            }

            let source = match provider.read_file(path) {
                Ok(source) => source,
                Err(e) => {
                    log::warn!("Skipping unreadable file {path}: {e}");
                    continue;
                }
            };

            index.files_scanned += 1;
            for name in declared_names(Language::from_path(path), &source) {
                let files = index.entries.entry(name).or_default();
                if !files.contains(path) {
                    files.push(path.clone());
                }
            }
        }

        log::debug!(
            "Import index built: {} names from {} files",
            index.entries.len(),
            index.files_scanned
        );
        index
    }

    /// Files declaring `name`, in discovery order; empty when unknown
    pub fn resolve(&self, name: &str) -> &[String] {
        self.entries
            .get(name)
            .map(|files| files.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `name` is indexed at all
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of distinct indexed names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of files whose declarations were extracted
    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }
}

/// Session-scoped `class name → referencing files` table for backward
/// traversal.
///
/// Built from the same candidate set as [`ImportIndex`], but recording
/// every file that *mentions* a capitalized type name rather than the
/// files declaring it. Over-approximates by design: a false mention only
/// costs a parse at the next hop, never a wrong edge.
#[derive(Debug, Default, Clone)]
pub struct ReverseIndex {
    entries: HashMap<String, Vec<String>>,
    files_scanned: usize,
}

impl ReverseIndex {
    /// Build by scanning the provider's candidate files, with the same
    /// skip and cap behavior as [`ImportIndex::build`]
    pub fn build(provider: &dyn FileProvider, config: &ImportIndexConfig) -> Self {
        let mut index = Self::default();
        let exclude = build_globset(&config.exclude);
        let candidates = candidate_files(provider, &config.include, exclude.as_ref());

        for (scanned, path) in candidates.iter().enumerate() {
            if scanned >= config.max_files {
                log::warn!(
                    "Reverse index capped at {} files; {} candidates unscanned",
                    config.max_files,
                    candidates.len() - scanned
                );
                break;
            }

            let source = match provider.read_file(path) {
                Ok(source) => source,
                Err(e) => {
                    log::warn!("Skipping unreadable file {path}: {e}");
                    continue;
                }
            };

            index.files_scanned += 1;
            for name in referenced_names(&source) {
                let files = index.entries.entry(name).or_default();
                if !files.contains(path) {
                    files.push(path.clone());
                }
            }
        }

        log::debug!(
            "Reverse index built: {} names from {} files",
            index.entries.len(),
            index.files_scanned
        );
        index
    }

    /// Files mentioning `name`, in discovery order; empty when unknown
    pub fn referencing(&self, name: &str) -> &[String] {
        self.entries
            .get(name)
            .map(|files| files.as_slice())
            .unwrap_or(&[])
    }

    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }
}

/// Enumerate include-glob matches, duplicate-free in first-seen order,
/// with excludes applied
fn candidate_files(
    provider: &dyn FileProvider,
    include: &[String],
    exclude: Option<&GlobSet>,
) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut candidates = Vec::new();
    for pattern in include {
        for path in provider.list_files(pattern) {
            let excluded = exclude
                .map(|set| set.is_match(path.trim_start_matches('/')))
                .unwrap_or(false);
            if !excluded && seen.insert(path.clone()) {
                candidates.push(path);
            }
        }
    }
    candidates
}

fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match GlobBuilder::new(pattern).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => log::warn!("Invalid exclude pattern {pattern}: {e}"),
        }
    }
    match builder.build() {
        Ok(set) => Some(set),
        Err(e) => {
            log::warn!("Failed to build exclude set: {e}");
            None
        }
    }
}
