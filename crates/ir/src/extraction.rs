//! Extraction results
//!
//! `ExtractionResult` is the immutable aggregate every generator consumes.
//! `ExtractionReport` wraps it with what went wrong along the way: files
//! that failed to parse and best-effort diagnostics.

use crate::diagnostic::Diagnostic;
use crate::model::Model;
use modelsql_core::{EngineResult, ParseError};
use serde::{Deserialize, Serialize};

// ============================================================================
// ExtractionResult
// ============================================================================

/// Models and raw query fragments gathered from one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Models in extraction order
    pub models: Vec<Model>,

    /// Query fragments in file-then-line order
    pub queries: Vec<String>,
}

impl ExtractionResult {
    /// Create a result from its parts
    pub fn new(models: Vec<Model>, queries: Vec<String>) -> Self {
        Self { models, queries }
    }

    /// Get a model by name (first declaration wins)
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Number of models
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Number of declared fields across every model
    pub fn field_count(&self) -> usize {
        self.models.iter().map(|m| m.fields.len()).sum()
    }

    /// Check if nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.queries.is_empty()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }
}

// ============================================================================
// ExtractionReport
// ============================================================================

/// An extraction result plus the per-file failures and diagnostics collected
/// while producing it
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Aggregate of every successfully parsed file
    pub result: ExtractionResult,

    /// Files that could not be parsed (excluded from `result`)
    pub parse_errors: Vec<ParseError>,

    /// Best-effort findings (skipped statements, unusable relation targets)
    pub diagnostics: Vec<Diagnostic>,

    /// Number of source files visited
    pub files_scanned: usize,
}

impl ExtractionReport {
    /// Check if any file failed to parse
    pub fn has_parse_errors(&self) -> bool {
        !self.parse_errors.is_empty()
    }

    /// Diagnostics at warning severity
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    /// Number of files that parsed successfully
    pub fn files_parsed(&self) -> usize {
        self.files_scanned - self.parse_errors.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
