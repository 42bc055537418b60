//! # Relmap Analyzer
//!
//! Relationship extraction over parsed source files:
//!
//! - [`oo`] classifies one file's classes and imports into typed
//!   relationship edges (composition, aggregation, association,
//!   dependency, injection) plus an inheritance map.
//! - [`CrossFileAnalyzer`] walks the import graph breadth-first from an
//!   entry file, depth-bounded and cycle-safe, merging per-file results
//!   into one aggregate.
//! - [`SequenceAnalyzer`] builds a per-file participant/interaction
//!   model for sequence diagrams from call expressions.
//!
//! All outputs are plain serializable data; rendering them into diagram
//! text is a consumer concern.

mod cross_file;
mod error;
pub mod oo;
mod sequence;
mod types;

pub use cross_file::{CrossFileAnalyzer, TraversalMode};
pub use error::{AnalyzerError, Result};
pub use oo::{resolve_type_info, OoAnalysis};
pub use sequence::SequenceAnalyzer;
pub use types::{
    AnalysisResult, AnalysisStats, Cardinality, ClassRecord, DependencyInfo, EntryPoint,
    FileAnalysis, InteractionKind, ParticipantKind, RelationKind, ResolvedTypeInfo,
    SequenceInteraction, SequenceModel, SequenceParticipant,
};
