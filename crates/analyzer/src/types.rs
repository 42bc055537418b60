use relmap_ast::ClassInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Relationship kind between two classes, by ownership strength and
/// declaration context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Owned part: private or instance-bound property, single value
    Composition,
    /// Owned collection: array-typed property
    Aggregation,
    /// Referenced peer: public property not claimed by composition
    Association,
    /// Used in a method signature
    Dependency,
    /// Supplied through the constructor
    Injection,
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Composition => "composition",
            RelationKind::Aggregation => "aggregation",
            RelationKind::Association => "association",
            RelationKind::Dependency => "dependency",
            RelationKind::Injection => "injection",
        }
    }
}

/// Multiplicity recorded on ownership edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "*")]
    Many,
}

impl Cardinality {
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::One => "1",
            Cardinality::Many => "*",
        }
    }
}

/// A directed relationship edge between two class-like types.
///
/// `to` is always a class-like type name; primitives and built-in
/// containers never appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyInfo {
    /// Owning/using class
    pub from: String,

    /// Target class-like type
    pub to: String,

    /// Relationship classification
    pub kind: RelationKind,

    /// Multiplicity, when the kind carries one
    pub cardinality: Option<Cardinality>,

    /// Declaration line (1-indexed)
    pub line_number: usize,

    /// Property or method signature text the edge was classified from
    pub context: String,

    /// Whether the target type is imported from another module
    pub is_external: bool,

    /// Module specifier the target was imported from
    pub source_module: Option<String>,
}

/// Derived classification of one type annotation. Recomputed per query,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTypeInfo {
    /// Base type name, array/generic markers stripped
    pub type_name: String,

    /// `T[]` or `Array<T>`
    pub is_array: bool,

    /// Primitive/scalar type
    pub is_primitive: bool,

    /// Class-like by the casing predicate
    pub is_class_type: bool,

    /// Interface-like (`I` + capital prefix)
    pub is_interface_type: bool,

    /// Imported from another module
    pub is_external: bool,

    /// Module specifier when external
    pub source_module: Option<String>,

    /// Top-level generic arguments, e.g. `["string", "User"]`
    pub generic_args: Vec<String>,
}

/// Per-file analysis output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Classes and interfaces declared in the file
    pub classes: Vec<ClassInfo>,

    /// Relationship edges classified from the file
    pub relationships: Vec<DependencyInfo>,
}

/// A class paired with its declaring file; global identity is
/// `(file_path, name)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecord {
    pub file_path: String,
    pub class: ClassInfo,
}

/// Traversal summary counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub total_files: usize,
    pub total_classes: usize,
    pub total_relationships: usize,
}

/// Aggregate result of a cross-file traversal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Per-file analyses, keyed by normalized path
    pub files: HashMap<String, FileAnalysis>,

    /// Deduplicated global class list
    pub classes: Vec<ClassRecord>,

    /// Merged relationship list, in visit order
    pub relationships: Vec<DependencyInfo>,

    /// Summary counters
    pub stats: AnalysisStats,

    /// Files reached but not analyzable (read or parse failure)
    pub skipped: Vec<String>,
}

/// Sequence-diagram actor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantKind {
    Class,
    Function,
    Module,
}

/// Sequence-diagram actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceParticipant {
    pub name: String,
    pub kind: ParticipantKind,
    pub line_number: Option<usize>,
}

/// Direction/style of one interaction edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionKind {
    Sync,
    Async,
    Return,
}

/// A directed call or return edge between participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceInteraction {
    pub from: String,
    pub to: String,
    pub message: String,
    pub kind: InteractionKind,
    pub line_number: Option<usize>,
}

/// A method or function eligible as a diagram start point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPoint {
    /// Owning participant (class name, or the function itself)
    pub participant: String,

    /// Method or function name
    pub name: String,

    /// Declaration line (1-indexed)
    pub line_number: usize,
}

/// Per-file sequence model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceModel {
    pub participants: Vec<SequenceParticipant>,
    pub interactions: Vec<SequenceInteraction>,
    pub entry_points: Vec<EntryPoint>,
}
