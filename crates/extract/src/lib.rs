//! # modelsql Extract
//!
//! Turns a tree of Python sources into an [`ExtractionReport`]:
//!
//! - [`scanner`] finds source files in a deterministic order
//! - [`syntax`] parses each file in-process
//! - [`extractor`] recognises model classes and their field declarations
//! - [`queries`] copies ORM manager calls into query fragments
//! - [`pipeline`] ties them together with per-file failure isolation
//!
//! ## Example
//!
//! ```rust,ignore
//! use modelsql_extract::{extract_dir, ExtractConfig};
//!
//! let report = extract_dir(Path::new("./app"), &ExtractConfig::default())?;
//! println!("{} models", report.result.model_count());
//! ```

pub mod extractor;
pub mod pipeline;
pub mod queries;
pub mod scanner;
pub mod syntax;

pub use extractor::{DEFAULT_MARKER, FileExtraction, ModelExtractor};
pub use pipeline::{ExtractConfig, extract_dir};
pub use queries::QueryCollector;
pub use scanner::{SourceFile, SourceScanner};
pub use syntax::{SyntaxError, parse_module};

pub use modelsql_ir::ExtractionReport;
