//! Error types for modelsql
//!
//! This module provides unified error handling across the pipeline:
//! scanning errors, per-file parse errors, generation errors, relation
//! resolution errors, IO errors and configuration errors.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// ParseError
// ============================================================================

/// A single source file that does not conform to the host grammar.
///
/// Parse errors are recoverable: the offending file is excluded from the
/// aggregate and reported, every other file is still extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}:{line}:{column}: {message}", path.display())]
pub struct ParseError {
    /// File the error was found in
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub column: usize,
    /// What went wrong
    pub message: String,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(
        path: impl Into<PathBuf>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            line,
            column,
            message: message.into(),
        }
    }
}

// ============================================================================
// EngineError
// ============================================================================

/// The main error type for modelsql
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Scan Errors
    // ========================================================================
    /// The scan root does not exist or is not a directory
    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),

    /// A directory entry could not be traversed
    #[error("Failed to scan '{path}': {message}")]
    Scan { path: PathBuf, message: String },

    // ========================================================================
    // Parse Errors
    // ========================================================================
    /// A source file could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    // ========================================================================
    // Generation Errors
    // ========================================================================
    /// Generation failed because the model set is internally inconsistent
    #[error("Generation failed: {0}")]
    Generation(String),

    /// A relation field points at a model that was never declared
    #[error("Unresolved relation '{model}.{field}': {reason}")]
    UnresolvedRelation {
        model: String,
        field: String,
        reason: String,
    },

    /// Several relation fields could not be resolved
    #[error("{} unresolved relation(s): {}", .0.len(), .0.join("; "))]
    UnresolvedRelations(Vec<String>),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Unknown SQL dialect token
    #[error("Unsupported dialect '{0}': expected 'postgres' or 'mysql'")]
    InvalidDialect(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl EngineError {
    /// Create a scan error
    pub fn scan(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        EngineError::Scan {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a generation error
    pub fn generation(msg: impl Into<String>) -> Self {
        EngineError::Generation(msg.into())
    }

    /// Create an unresolved relation error
    pub fn unresolved_relation(
        model: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::UnresolvedRelation {
            model: model.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        EngineError::InvalidConfig(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error aborts a scan
    pub fn is_scan(&self) -> bool {
        matches!(
            self,
            EngineError::InputNotFound(_) | EngineError::Scan { .. } | EngineError::FileRead { .. }
        )
    }

    /// Check if this error is a per-file parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, EngineError::Parse(_))
    }

    /// Check if this error came from generation or relation resolution
    pub fn is_generation(&self) -> bool {
        matches!(
            self,
            EngineError::Generation(_)
                | EngineError::UnresolvedRelation { .. }
                | EngineError::UnresolvedRelations(_)
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            EngineError::Io(_)
                | EngineError::FileRead { .. }
                | EngineError::FileWrite { .. }
                | EngineError::DirectoryCreate { .. }
        )
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T>;
}

impl<T, E: Into<EngineError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T> {
        self.map_err(|e| {
            let err: EngineError = e.into();
            EngineError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("app/models.py", 3, 7, "expected ':'");
        assert_eq!(err.to_string(), "app/models.py:3:7: expected ':'");
    }

    #[test]
    fn test_parse_error_converts() {
        let err: EngineError = ParseError::new("a.py", 1, 1, "bad").into();
        assert!(err.is_parse());
        assert!(!err.is_scan());
        assert_eq!(err.to_string(), "Parse error: a.py:1:1: bad");
    }

    #[test]
    fn test_scan_error() {
        let err = EngineError::scan("/srv/app", "permission denied");
        assert!(err.is_scan());
        assert_eq!(
            err.to_string(),
            "Failed to scan '/srv/app': permission denied"
        );
    }

    #[test]
    fn test_unresolved_relation_error() {
        let err = EngineError::unresolved_relation("Book", "author", "no model named 'Author'");
        assert!(err.is_generation());
        assert_eq!(
            err.to_string(),
            "Unresolved relation 'Book.author': no model named 'Author'"
        );
    }

    #[test]
    fn test_unresolved_relations_error() {
        let err = EngineError::UnresolvedRelations(vec![
            "Book.author -> Author".to_string(),
            "Book.tags -> Tag".to_string(),
        ]);
        assert!(err.is_generation());
        assert_eq!(
            err.to_string(),
            "2 unresolved relation(s): Book.author -> Author; Book.tags -> Tag"
        );
    }

    #[test]
    fn test_invalid_dialect() {
        let err = EngineError::InvalidDialect("oracle".to_string());
        assert!(!err.is_generation());
        assert!(err.to_string().contains("oracle"));
    }

    #[test]
    fn test_error_with_context() {
        let err = EngineError::with_context("Writing schema", "Permission denied");
        assert_eq!(err.to_string(), "Writing schema: Permission denied");
    }

    #[test]
    fn test_result_ext() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = res.with_context("Reading models.py").unwrap_err();
        assert_eq!(err.to_string(), "Reading models.py: IO error: missing");
    }

    #[test]
    fn test_io_error_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EngineError = io_err.into();
        assert!(err.is_io());
    }
}
