//! Diagnostics emitted while extracting and resolving models
//!
//! Extraction is best-effort: statements that do not look like field
//! declarations are skipped rather than rejected. Each skip is recorded here
//! so malformed inputs can be debugged.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected skips (docstrings, methods, `Meta` classes)
    Info,
    /// Something was probably meant as a field or relation but could not be used
    Warning,
}

/// A single non-fatal finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Source file, when the finding came from extraction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// 1-based line number, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// How serious the finding is
    pub severity: Severity,

    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create an informational diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            path: None,
            line: None,
            severity: Severity::Info,
            message: message.into(),
        }
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::info(message)
        }
    }

    /// Attach a source location
    pub fn at(mut self, path: impl Into<PathBuf>, line: usize) -> Self {
        self.path = Some(path.into());
        self.line = Some(line);
        self
    }

    /// Check if this is a warning
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.path, self.line) {
            (Some(path), Some(line)) => write!(f, "{}:{}: {}", path.display(), line, self.message),
            (Some(path), None) => write!(f, "{}: {}", path.display(), self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}
