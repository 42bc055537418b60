//! # Relmap AST
//!
//! Unified AST and parser abstraction for multi-language relationship
//! extraction.
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Language Detection (extension table, URI tolerant)
//!     │
//!     ├──> ParserRegistry (language-keyed, lazy grammar loading)
//!     │
//!     ├──> Tree-sitter Parsing → grammar tree
//!     │
//!     └──> Grammar adapter walk
//!          └─> UnifiedAst { classes, interfaces, functions, imports, exports }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use relmap_ast::ParserService;
//!
//! let mut service = ParserService::with_default_parsers();
//! let ast = service
//!     .parse("export class User { name: string; }", "/src/User.ts")
//!     .unwrap();
//! assert_eq!(ast.classes[0].name, "User");
//! ```

mod error;
mod language;
mod parser;
mod parsers;
mod registry;
pub mod type_name;
mod types;

pub use error::{ParserError, Result};
pub use language::Language;
pub use parser::{LanguageParser, ParserService};
pub use parsers::{JavaScriptParser, PythonParser, TypeScriptParser};
pub use registry::ParserRegistry;
pub use types::{
    ClassInfo, ClassKind, FunctionInfo, ImportInfo, MethodInfo, ParameterInfo, PropertyInfo,
    UnifiedAst, Visibility,
};
