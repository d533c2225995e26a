//! # modelsql Codegen
//!
//! Turns an [`ExtractionResult`](modelsql_ir::ExtractionResult) into the
//! files a run writes:
//!
//! - **Schema**: `CREATE TABLE` statements for every model and join table
//! - **Migrations**: a matched up/down pair sharing one timestamp
//! - **Queries**: the collected ORM call sites as SQL comments
//! - **sqlc config**: a `sqlc.yaml` pointing at the schema and queries
//!

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod context;
pub mod generator;
pub mod migrations;
pub mod queries;
pub mod schema;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::GenerationContext;
pub use generator::{GenerationSummary, Generator, generate, generate_to_dir, summarize};
pub use migrations::MigrationPair;

use modelsql_core::{Dialect, EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ============================================================================
// TableOrder
// ============================================================================

/// Order in which tables are created and dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableOrder {
    /// Model declaration order
    #[default]
    Extraction,
    /// Referenced tables before the tables that reference them
    Dependency,
}

impl TableOrder {
    pub fn token(&self) -> &'static str {
        match self {
            TableOrder::Extraction => "extraction",
            TableOrder::Dependency => "dependency",
        }
    }
}

impl FromStr for TableOrder {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "extraction" => Ok(TableOrder::Extraction),
            "dependency" => Ok(TableOrder::Dependency),
            other => Err(EngineError::config(format!(
                "unknown table order '{}': expected 'extraction' or 'dependency'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TableOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Configuration for the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Output directory for generated files
    pub output_dir: PathBuf,

    /// Target SQL engine
    pub dialect: Dialect,

    /// Table creation order
    pub table_order: TableOrder,

    /// Fail when a relation target is missing or names no declared model
    pub strict_relations: bool,

    /// Fixed migration timestamp (`YYYYMMDDHHMMSS`); the current UTC time
    /// is used when unset
    pub timestamp: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./out"),
            dialect: Dialect::default(),
            table_order: TableOrder::default(),
            strict_relations: false,
            timestamp: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the dialect
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the table order
    pub fn with_table_order(mut self, order: TableOrder) -> Self {
        self.table_order = order;
        self
    }

    /// Treat unresolved relations as errors instead of warnings
    pub fn strict_relations(mut self) -> Self {
        self.strict_relations = true;
        self
    }

    /// Pin the migration timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

// ============================================================================
// GeneratedFile
// ============================================================================

/// Represents a single generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path from output directory
    pub path: PathBuf,

    /// File content
    pub content: String,

    /// File type for categorization
    pub file_type: FileType,
}

impl GeneratedFile {
    /// Create a new generated file
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, file_type: FileType) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            file_type,
        }
    }

    /// Create a SQL file
    pub fn sql(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileType::Sql)
    }

    /// Create a YAML config file
    pub fn yaml(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileType::Yaml)
    }

    /// Get the file extension
    pub fn extension(&self) -> &str {
        self.file_type.extension()
    }
}

/// Type of generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Sql,
    Yaml,
}

impl FileType {
    /// Get the file extension for this type
    pub fn extension(&self) -> &str {
        match self {
            FileType::Sql => "sql",
            FileType::Yaml => "yaml",
        }
    }
}

// ============================================================================
// GeneratedProject
// ============================================================================

/// Every file produced by one run
#[derive(Debug, Clone, Default)]
pub struct GeneratedProject {
    /// Run label shown in summaries
    pub name: String,

    /// All generated files
    pub files: Vec<GeneratedFile>,

    /// Warnings generated during generation
    pub warnings: Vec<String>,
}

impl GeneratedProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a file to the project
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Get the number of files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get a file by its relative path
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path.as_ref())
    }

    /// Get files by type
    pub fn files_by_type(&self, file_type: FileType) -> Vec<&GeneratedFile> {
        self.files
            .iter()
            .filter(|f| f.file_type == file_type)
            .collect()
    }

    /// Write all files below `base_dir`, creating directories as needed and
    /// overwriting existing files
    pub fn write_to_disk(&self, base_dir: impl AsRef<Path>) -> EngineResult<()> {
        let base_dir = base_dir.as_ref();

        for file in &self.files {
            let full_path = base_dir.join(&file.path);

            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }

            std::fs::write(&full_path, &file.content).map_err(|e| EngineError::FileWrite {
                path: full_path.clone(),
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
