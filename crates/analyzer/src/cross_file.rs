//! Depth-bounded, cycle-safe traversal of the file/import graph.
//!
//! Breadth-first over files from one entry point. Each dequeued file is
//! parsed and classified; its imports (forward), its dependents
//! (backward), or both (bidirectional) feed the next hop. A visited set
//! keyed by normalized path guarantees each file is parsed at most once
//! per traversal, so import cycles terminate.

use crate::error::Result;
use crate::oo;
use crate::types::{AnalysisResult, ClassRecord, FileAnalysis};
use relmap_ast::{ParserError, ParserService, UnifiedAst};
use relmap_index::{declared_names, ImportIndex, ImportIndexConfig, ReverseIndex};
use relmap_provider::path_utils::normalize_path;
use relmap_provider::FileProvider;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Traversal direction relative to the entry file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalMode {
    /// Follow the entry file's imports (its dependencies)
    Forward,
    /// Discover files referencing the entry file's classes (its dependents)
    Backward,
    /// Union of both
    Bidirectional,
}

/// Indexes built at most once per traversal.
///
/// Forward by-name lookups fall back to an internal [`ImportIndex`]
/// built with the analyzer's own config when the caller supplied none,
/// so the set of discovered files is identical either way. Backward
/// hops always scan through a [`ReverseIndex`], built on first use.
#[derive(Default)]
struct TraversalCache {
    internal_index: Option<ImportIndex>,
    reverse: Option<ReverseIndex>,
}

/// Multi-file orchestrator: parses, classifies and merges per-file
/// results along the import graph.
///
/// Holds a [`ParserService`] for the session; I/O goes through the
/// provider seam only. An externally built [`ImportIndex`] is an
/// optional speedup, never a semantic input.
pub struct CrossFileAnalyzer<'a> {
    provider: &'a dyn FileProvider,
    index: Option<&'a ImportIndex>,
    parser: ParserService,
    config: ImportIndexConfig,
}

impl<'a> CrossFileAnalyzer<'a> {
    /// Analyzer with the bundled parsers and default scan config
    pub fn new(provider: &'a dyn FileProvider) -> Self {
        Self {
            provider,
            index: None,
            parser: ParserService::with_default_parsers(),
            config: ImportIndexConfig::default(),
        }
    }

    /// Reuse a prebuilt import index for by-name resolution
    pub fn with_index(mut self, index: &'a ImportIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Override the candidate-scan config used by internally built indexes
    pub fn with_config(mut self, config: ImportIndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Traverse from `entry` up to `depth` hops and merge the results.
    ///
    /// Depth 0 analyzes the entry file only. Per-file read and parse
    /// failures are recorded in `skipped` and never abort the traversal;
    /// the exceptions are registry configuration defects
    /// ([`ParserError::DuplicateRegistration`] and
    /// [`ParserError::LanguageMismatch`]), which are always fatal.
    pub fn analyze(
        &mut self,
        entry: &str,
        mode: TraversalMode,
        depth: usize,
    ) -> Result<AnalysisResult> {
        let entry = normalize_path(entry);
        log::debug!("Traversal start: {entry} ({mode:?}, depth {depth})");

        let mut cache = TraversalCache::default();
        let mut result = AnalysisResult::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();

        visited.insert(entry.clone());
        queue.push_back((entry, 0));

        while let Some((path, hop)) = queue.pop_front() {
            let source = match self.provider.read_file(&path) {
                Ok(source) => source,
                Err(e) => {
                    log::warn!("Skipping unreadable file {path}: {e}");
                    result.skipped.push(path);
                    continue;
                }
            };

            let ast = match self.parser.parse(&source, &path) {
                Ok(ast) => ast,
                Err(
                    e @ (ParserError::DuplicateRegistration { .. }
                    | ParserError::LanguageMismatch { .. }),
                ) => return Err(e.into()),
                Err(e) => {
                    log::warn!("Skipping unparsable file {path}: {e}");
                    result.skipped.push(path);
                    continue;
                }
            };

            if hop < depth {
                let mut next = Vec::new();
                if matches!(mode, TraversalMode::Forward | TraversalMode::Bidirectional) {
                    next.extend(self.forward_hops(&mut cache, &path, &ast));
                }
                if matches!(mode, TraversalMode::Backward | TraversalMode::Bidirectional) {
                    next.extend(self.backward_hops(&mut cache, &path, &source, &ast));
                }
                for candidate in next {
                    if visited.insert(candidate.clone()) {
                        queue.push_back((candidate, hop + 1));
                    }
                }
            }

            self.record(&mut result, path, ast);
        }

        result.stats.total_files = result.files.len();
        result.stats.total_classes = result.classes.len();
        result.stats.total_relationships = result.relationships.len();
        log::debug!(
            "Traversal done: {} files, {} classes, {} relationships, {} skipped",
            result.stats.total_files,
            result.stats.total_classes,
            result.stats.total_relationships,
            result.skipped.len()
        );
        Ok(result)
    }

    /// Classify one parsed file and fold it into the aggregate
    fn record(&self, result: &mut AnalysisResult, path: String, ast: UnifiedAst) {
        let classes: Vec<_> = ast.class_like().cloned().collect();
        let analysis = oo::analyze(&classes, &ast.imports);

        for class in &classes {
            result.classes.push(ClassRecord {
                file_path: path.clone(),
                class: class.clone(),
            });
        }
        result
            .relationships
            .extend(analysis.relationships.iter().cloned());
        result.files.insert(
            path,
            FileAnalysis {
                classes,
                relationships: analysis.relationships,
            },
        );
    }

    /// Next-hop files this file depends on.
    ///
    /// Relative specifiers resolve lexically through the provider.
    /// Anything left unresolved (non-relative imports, heritage names
    /// declared elsewhere) falls back to by-name index resolution.
    fn forward_hops(
        &self,
        cache: &mut TraversalCache,
        path: &str,
        ast: &UnifiedAst,
    ) -> Vec<String> {
        let mut hops = Vec::new();
        let mut unresolved: Vec<&str> = Vec::new();

        for import in &ast.imports {
            match self.provider.resolve_import(path, &import.source) {
                Some(resolved) => hops.push(normalize_path(&resolved)),
                None => unresolved.extend(import.specifiers.iter().map(String::as_str)),
            }
        }
        for class in ast.class_like() {
            for name in class.extends.iter().chain(class.implements.iter()) {
                // Names covered by a resolved import already produced a hop
                if !ast.imports.iter().any(|import| import.provides(name)) {
                    unresolved.push(name);
                }
            }
        }

        if !unresolved.is_empty() {
            let index = self.name_index(cache);
            for name in unresolved {
                for file in index.resolve(name) {
                    let file = normalize_path(file);
                    if file != path {
                        hops.push(file);
                    }
                }
            }
        }
        hops
    }

    /// Next-hop files that reference a class this file declares
    fn backward_hops(
        &self,
        cache: &mut TraversalCache,
        path: &str,
        source: &str,
        ast: &UnifiedAst,
    ) -> Vec<String> {
        let reverse = cache
            .reverse
            .get_or_insert_with(|| ReverseIndex::build(self.provider, &self.config));

        // Heuristic declarations cover languages the parsers skip; merge
        // in the parsed class names for completeness.
        let mut declared = declared_names(ast.language, source);
        for class in ast.class_like() {
            if !declared.contains(&class.name) {
                declared.push(class.name.clone());
            }
        }

        let mut hops = Vec::new();
        for name in &declared {
            for file in reverse.referencing(name) {
                let file = normalize_path(file);
                if file != path && !hops.contains(&file) {
                    hops.push(file);
                }
            }
        }
        hops
    }

    fn name_index<'c>(&'c self, cache: &'c mut TraversalCache) -> &'c ImportIndex {
        match self.index {
            Some(index) => index,
            None => cache
                .internal_index
                .get_or_insert_with(|| ImportIndex::build(self.provider, &self.config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relmap_provider::MemoryFileProvider;

    fn fixture() -> MemoryFileProvider {
        MemoryFileProvider::new()
            .with_file("/src/models/User.ts", "export class User {}\n")
            .with_file(
                "/src/services/UserService.ts",
                "import { User } from '../models/User';\n\
                 export class UserService {\n  private user: User;\n}\n",
            )
            .with_file(
                "/src/app.ts",
                "import { UserService } from './services/UserService';\n\
                 export class App {\n  private service: UserService;\n}\n",
            )
    }

    #[test]
    fn test_depth_zero_is_entry_only() {
        let provider = fixture();
        let mut analyzer = CrossFileAnalyzer::new(&provider);
        let result = analyzer
            .analyze("/src/app.ts", TraversalMode::Forward, 0)
            .unwrap();

        assert_eq!(result.stats.total_files, 1);
        assert!(result.files.contains_key("/src/app.ts"));
    }

    #[test]
    fn test_forward_depth_bounds() {
        let provider = fixture();
        let mut analyzer = CrossFileAnalyzer::new(&provider);

        let one_hop = analyzer
            .analyze("/src/app.ts", TraversalMode::Forward, 1)
            .unwrap();
        assert_eq!(one_hop.stats.total_files, 2);
        assert!(!one_hop.files.contains_key("/src/models/User.ts"));

        let two_hops = analyzer
            .analyze("/src/app.ts", TraversalMode::Forward, 2)
            .unwrap();
        assert_eq!(two_hops.stats.total_files, 3);
        assert!(two_hops.files.contains_key("/src/models/User.ts"));
    }

    #[test]
    fn test_backward_finds_dependents() {
        let provider = fixture();
        let mut analyzer = CrossFileAnalyzer::new(&provider);
        let result = analyzer
            .analyze("/src/models/User.ts", TraversalMode::Backward, 1)
            .unwrap();

        assert!(result.files.contains_key("/src/models/User.ts"));
        assert!(result.files.contains_key("/src/services/UserService.ts"));
        assert!(!result.files.contains_key("/src/app.ts"));
    }

    #[test]
    fn test_bidirectional_union() {
        let provider = fixture();
        let mut analyzer = CrossFileAnalyzer::new(&provider);
        let result = analyzer
            .analyze(
                "/src/services/UserService.ts",
                TraversalMode::Bidirectional,
                1,
            )
            .unwrap();

        assert_eq!(result.stats.total_files, 3);
    }

    #[test]
    fn test_missing_entry_is_skipped_not_fatal() {
        let provider = fixture();
        let mut analyzer = CrossFileAnalyzer::new(&provider);
        let result = analyzer
            .analyze("/src/gone.ts", TraversalMode::Forward, 2)
            .unwrap();

        assert_eq!(result.stats.total_files, 0);
        assert_eq!(result.skipped, vec!["/src/gone.ts"]);
    }

    #[test]
    fn test_malformed_dependency_is_skipped() {
        let provider = fixture().with_file(
            "/src/broken.ts",
            "import { User } from './models/User';\nclass {{{\n",
        );
        let mut analyzer = CrossFileAnalyzer::new(&provider);
        let result = analyzer
            .analyze("/src/broken.ts", TraversalMode::Forward, 1)
            .unwrap();

        assert_eq!(result.skipped, vec!["/src/broken.ts"]);
        assert!(result.files.is_empty());
    }
}
