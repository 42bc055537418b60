use crate::error::{ProviderError, Result};
use crate::path_utils::normalize_path;
use crate::provider::FileProvider;
use globset::Glob;
use std::collections::BTreeMap;

/// In-memory fixture provider.
///
/// Holds file text keyed by normalized path; listing order is the sorted
/// path order, so traversal and index results are deterministic in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileProvider {
    files: BTreeMap<String, String>,
}

impl MemoryFileProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn insert(&mut self, path: impl AsRef<str>, content: impl Into<String>) {
        self.files
            .insert(normalize_path(path.as_ref()), content.into());
    }

    /// Builder-style insert for fixture setup
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<str>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Number of stored files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileProvider for MemoryFileProvider {
    fn read_file(&self, path: &str) -> Result<String> {
        let normalized = normalize_path(path);
        self.files
            .get(&normalized)
            .cloned()
            .ok_or_else(|| ProviderError::not_found(normalized))
    }

    fn list_files(&self, pattern: &str) -> Vec<String> {
        let matcher = match Glob::new(pattern) {
            Ok(glob) => glob.compile_matcher(),
            Err(e) => {
                log::warn!("Invalid glob pattern {pattern}: {e}");
                return Vec::new();
            }
        };
        self.files
            .keys()
            .filter(|path| matcher.is_match(path.trim_start_matches('/')))
            .cloned()
            .collect()
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(&normalize_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture() -> MemoryFileProvider {
        MemoryFileProvider::new()
            .with_file("/src/models/User.ts", "export class User {}")
            .with_file("/src/services/UserService.ts", "export class UserService {}")
            .with_file("/src/util.py", "def util(): pass")
    }

    #[test]
    fn test_read_and_exists() {
        let provider = fixture();
        assert!(provider.exists("/src/models/User.ts"));
        assert!(provider.exists("/src/services/../models/User.ts"));
        assert!(provider.read_file("/src/models/User.ts").is_ok());

        let err = provider.read_file("/src/missing.ts").unwrap_err();
        assert!(matches!(err, ProviderError::FileNotFound { .. }));
    }

    #[test]
    fn test_list_files_glob() {
        let provider = fixture();
        let ts_files = provider.list_files("**/*.ts");
        assert_eq!(ts_files.len(), 2);
        assert_eq!(provider.list_files("**/*.py"), vec!["/src/util.py"]);
        assert!(provider.list_files("**/*.java").is_empty());
    }

    #[test]
    fn test_resolve_import() {
        let provider = fixture();
        assert_eq!(
            provider.resolve_import("/src/services/UserService.ts", "../models/User"),
            Some("/src/models/User.ts".to_string())
        );
        assert_eq!(
            provider.resolve_import("/src/services/UserService.ts", "express"),
            None
        );
        assert_eq!(
            provider.resolve_import("/src/services/UserService.ts", "./missing"),
            None
        );
    }
}
