use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Language-agnostic structural summary of one source file.
///
/// Produced once per parse call and never persisted; every downstream
/// analyzer works from this shape regardless of the source grammar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnifiedAst {
    /// Source language
    pub language: Language,

    /// Path of the parsed file
    pub file_path: String,

    /// Class declarations
    pub classes: Vec<ClassInfo>,

    /// Interface declarations
    pub interfaces: Vec<ClassInfo>,

    /// Top-level functions
    pub functions: Vec<FunctionInfo>,

    /// Import statements
    pub imports: Vec<ImportInfo>,

    /// Exported names
    pub exports: Vec<String>,
}

impl UnifiedAst {
    /// Create an empty AST for a file
    pub fn new(language: Language, file_path: impl Into<String>) -> Self {
        Self {
            language,
            file_path: file_path.into(),
            classes: Vec::new(),
            interfaces: Vec::new(),
            functions: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
        }
    }

    /// Classes and interfaces together, classes first.
    ///
    /// Name uniqueness holds within one file; global identity is
    /// `(file_path, name)`.
    pub fn class_like(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.iter().chain(self.interfaces.iter())
    }
}

/// Kind of a class-like declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
}

/// A class or interface declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassInfo {
    /// Declared name
    pub name: String,

    /// Class or interface
    pub kind: ClassKind,

    /// Member properties/fields
    pub properties: Vec<PropertyInfo>,

    /// Member methods
    pub methods: Vec<MethodInfo>,

    /// Single base class, if any
    pub extends: Option<String>,

    /// Implemented interfaces
    pub implements: Vec<String>,

    /// Constructor parameters (injection analysis input)
    pub constructor_params: Vec<ParameterInfo>,

    /// Declaration line (1-indexed)
    pub line_number: usize,
}

impl ClassInfo {
    /// Create a class with a name and line, members empty
    pub fn new(name: impl Into<String>, kind: ClassKind, line_number: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            properties: Vec::new(),
            methods: Vec::new(),
            extends: None,
            implements: Vec::new(),
            constructor_params: Vec::new(),
            line_number,
        }
    }
}

/// Member visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

/// A property/field declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyInfo {
    /// Property name
    pub name: String,

    /// Raw type annotation text, if present
    pub type_annotation: Option<String>,

    /// Declared visibility
    pub visibility: Visibility,

    /// Whether the annotation is an array type (`T[]`, `Array<T>`)
    pub is_array: bool,

    /// Whether the annotation names a class-like type
    pub is_class_type: bool,

    /// Whether the property is static
    pub is_static: bool,

    /// Declaration line (1-indexed)
    pub line_number: usize,
}

/// A method declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodInfo {
    /// Method name
    pub name: String,

    /// Declared parameters
    pub parameters: Vec<ParameterInfo>,

    /// Raw return type annotation, if present
    pub return_type: Option<String>,

    /// Declared visibility
    pub visibility: Visibility,

    /// Declaration line (1-indexed)
    pub line_number: usize,
}

impl MethodInfo {
    /// Render a compact signature fragment, e.g. `save(user: User): void`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| match &p.type_annotation {
                Some(ty) => format!("{}: {}", p.name, ty),
                None => p.name.clone(),
            })
            .collect();
        match &self.return_type {
            Some(ret) => format!("{}({}): {}", self.name, params.join(", "), ret),
            None => format!("{}({})", self.name, params.join(", ")),
        }
    }
}

/// A function or method parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterInfo {
    /// Parameter name
    pub name: String,

    /// Raw type annotation text, if present
    pub type_annotation: Option<String>,

    /// Present only for constructor parameter properties
    /// (`constructor(private repo: Repo)`)
    pub visibility: Option<Visibility>,
}

/// A top-level function declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionInfo {
    /// Function name
    pub name: String,

    /// Declared parameters
    pub parameters: Vec<ParameterInfo>,

    /// Raw return type annotation, if present
    pub return_type: Option<String>,

    /// Whether the function is async
    pub is_async: bool,

    /// Declaration line (1-indexed)
    pub line_number: usize,
}

/// An import statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportInfo {
    /// Module specifier as written in source
    pub source: String,

    /// Imported names, order-preserving and duplicate-free
    pub specifiers: Vec<String>,

    /// `import X from '...'`
    pub is_default: bool,

    /// `import * as X from '...'`
    pub is_namespace: bool,

    /// Alias of a namespace import
    pub namespace_alias: Option<String>,

    /// `import type { ... }`
    pub is_type_only: bool,

    /// Statement line (1-indexed)
    pub line_number: usize,
}

impl ImportInfo {
    /// Create an import of a module specifier with no names yet
    pub fn new(source: impl Into<String>, line_number: usize) -> Self {
        Self {
            source: source.into(),
            specifiers: Vec::new(),
            is_default: false,
            is_namespace: false,
            namespace_alias: None,
            is_type_only: false,
            line_number,
        }
    }

    /// Append a specifier, preserving order and skipping duplicates
    pub fn push_specifier(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.specifiers.iter().any(|s| s == &name) {
            self.specifiers.push(name);
        }
    }

    /// Whether this import makes `name` visible in the importing file
    pub fn provides(&self, name: &str) -> bool {
        self.specifiers.iter().any(|s| s == name)
            || self.namespace_alias.as_deref() == Some(name)
    }
}
