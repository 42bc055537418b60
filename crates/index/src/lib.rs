//! # Relmap Import Index
//!
//! Session-scoped symbol table mapping declared type names to the files
//! declaring them, built with fast per-language heuristics instead of a
//! full parse. Strictly a performance layer for cross-file traversal:
//! lookups are O(1), and analysis results must be identical with or
//! without it.

mod declarations;
mod index;

pub use declarations::{declared_names, referenced_names};
pub use index::{ImportIndex, ImportIndexConfig, ReverseIndex, DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
