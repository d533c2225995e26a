//! # modelsql Core
//!
//! Core types, traits, and error handling for modelsql.
//!
//! This crate provides the foundational building blocks used by the
//! extraction and generation crates, including:
//!
//! - **Types**: Field kinds, relation kinds and SQL dialects
//! - **Naming**: The snake-case transform applied to table and column names
//! - **Traits**: `Validatable`
//! - **Errors**: Unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod naming;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult, ParseError, ResultExt};
pub use naming::{fk_column_name, join_table_name, to_snake};
pub use traits::Validatable;
pub use types::{Dialect, FieldKind, RelationKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
