use thiserror::Error;

/// Result type for file-provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors reported at the I/O seam
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The requested path does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Underlying I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Create a file-not-found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}
