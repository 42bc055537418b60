use crate::error::{ProviderError, Result};
use crate::path_utils::normalize_path;
use crate::provider::FileProvider;
use globset::Glob;
use ignore::WalkBuilder;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory scopes never surfaced by [`FsFileProvider::list_files`]
const IGNORED_SCOPES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    "node_modules",
    "dist",
    "build",
    "out",
    "coverage",
    ".next",
    ".turbo",
    ".cache",
    "target",
    "vendor",
    "third_party",
    "__pycache__",
    ".venv",
    "venv",
];

/// Files above this size are skipped during listing; generated bundles
/// are noise for relationship analysis.
const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB

/// Local-filesystem provider rooted at a project directory.
///
/// Listing is `.gitignore`-aware and excludes vendor/build/cache scopes;
/// paths are handed out as normalized absolute slash-separated strings so
/// they key visited-sets identically to other providers.
pub struct FsFileProvider {
    root: PathBuf,
}

impl FsFileProvider {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        relative.components().any(|component| {
            matches!(component, std::path::Component::Normal(name)
                if IGNORED_SCOPES
                    .iter()
                    .any(|ignored| name.to_string_lossy().eq_ignore_ascii_case(ignored)))
        })
    }
}

impl FileProvider for FsFileProvider {
    fn read_file(&self, path: &str) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ProviderError::not_found(path)
            } else {
                ProviderError::Io(e)
            }
        })
    }

    fn list_files(&self, pattern: &str) -> Vec<String> {
        let matcher = match Glob::new(pattern) {
            Ok(glob) => glob.compile_matcher(),
            Err(e) => {
                log::warn!("Invalid glob pattern {pattern}: {e}");
                return Vec::new();
            }
        };

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .sort_by_file_path(|a, b| a.cmp(b));
        builder.filter_entry(move |entry| !Self::is_ignored_scope(entry.path(), &root));

        let mut files = Vec::new();
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if let Ok(meta) = entry.metadata() {
                if meta.len() > MAX_FILE_SIZE_BYTES {
                    log::debug!("Skipping large file {}", entry.path().display());
                    continue;
                }
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path());
            if matcher.is_match(relative) {
                files.push(normalize_path(&entry.path().to_string_lossy()));
            }
        }
        files
    }

    fn exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }
}
