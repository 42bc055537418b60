//! # Relmap Provider
//!
//! The file-provider seam between the analysis layer and whatever holds
//! the source text: the local filesystem, an IDE virtual filesystem, or
//! an in-memory fixture. Everything above this crate performs I/O only
//! through [`FileProvider`].

mod error;
mod fs;
mod memory;
pub mod path_utils;
mod provider;

pub use error::{ProviderError, Result};
pub use fs::FsFileProvider;
pub use memory::MemoryFileProvider;
pub use provider::{import_candidates, FileProvider, RESOLVE_EXTENSIONS};
