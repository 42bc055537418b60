use crate::error::Result;
use crate::path_utils::{is_relative_specifier, join_relative, parent_dir};

/// Extensions tried when an import specifier omits one, then as
/// `index.*` for directory imports. Resolution order is significant.
pub const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "py"];

/// The sole I/O seam of the analysis layer.
///
/// Concrete adapters (local filesystem, IDE virtual filesystem, in-memory
/// fixture) implement reads, existence checks and glob listing; import
/// resolution is lexical and shared. Execution is synchronous and
/// single-threaded; any suspension happens inside an adapter, never in
/// the analysis logic above it.
pub trait FileProvider {
    /// Read a file's text. Fails with
    /// [`ProviderError::FileNotFound`](crate::ProviderError::FileNotFound)
    /// when absent.
    fn read_file(&self, path: &str) -> Result<String>;

    /// List known files matching a glob pattern
    fn list_files(&self, pattern: &str) -> Vec<String>;

    /// Whether a file exists at `path`
    fn exists(&self, path: &str) -> bool;

    /// Resolve a relative import specifier against the importing file.
    ///
    /// Non-relative (module/alias) specifiers intentionally resolve to
    /// `None`; build-graph resolution is out of scope. Tries the literal
    /// path, each [`RESOLVE_EXTENSIONS`] suffix, then `index.*` inside a
    /// directory import.
    fn resolve_import(&self, from_path: &str, specifier: &str) -> Option<String> {
        import_candidates(from_path, specifier)
            .into_iter()
            .find(|candidate| self.exists(candidate))
    }
}

/// Candidate paths for a relative import, in resolution order
pub fn import_candidates(from_path: &str, specifier: &str) -> Vec<String> {
    if !is_relative_specifier(specifier) {
        return Vec::new();
    }

    let base = join_relative(parent_dir(from_path), specifier);
    let mut candidates = vec![base.clone()];
    for ext in RESOLVE_EXTENSIONS {
        candidates.push(format!("{base}.{ext}"));
    }
    for ext in RESOLVE_EXTENSIONS {
        candidates.push(format!("{base}/index.{ext}"));
    }
    candidates
}
