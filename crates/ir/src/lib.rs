//! # modelsql IR (Intermediate Representation)
//!
//! This crate provides the normalized representation produced by extraction
//! and consumed by every generator.
//!
//! ## Core Concepts
//!
//! - **Model**: A declared entity that maps to a table (e.g. Book, Author)
//! - **Field**: A declared attribute that maps to a column, optionally
//!   carrying a relation to another model by name
//! - **ExtractionResult**: The immutable `{models, queries}` aggregate of a run
//! - **ModelRegistry**: Name index used to resolve relation targets
//! - **Diagnostic**: A non-fatal finding from best-effort extraction
//!

// Module declarations
pub mod diagnostic;
pub mod extraction;
pub mod field;
pub mod model;
pub mod registry;

// Re-export commonly used types at crate root
pub use diagnostic::{Diagnostic, Severity};
pub use extraction::{ExtractionReport, ExtractionResult};
pub use field::Field;
pub use model::Model;
pub use registry::{ModelRegistry, UnresolvedRelation};

// Re-export core types that are commonly used with IR
pub use modelsql_core::{
    Dialect, EngineError, EngineResult, FieldKind, ParseError, RelationKind, Validatable,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        Diagnostic, Dialect, EngineError, EngineResult, ExtractionReport, ExtractionResult, Field,
        FieldKind, Model, ModelRegistry, RelationKind,
    };
}
