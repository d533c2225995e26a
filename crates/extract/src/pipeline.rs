//! Directory extraction pipeline
//!
//! Scans a tree, extracts models and query fragments from every file and
//! aggregates them into one [`ExtractionReport`]. A file that fails to parse
//! is reported and excluded; it never aborts the run. Failing to walk or
//! read the tree does.

use crate::extractor::{DEFAULT_MARKER, ModelExtractor};
use crate::queries::QueryCollector;
use crate::scanner::{SourceFile, SourceScanner};
use modelsql_core::{EngineResult, ParseError};
use modelsql_ir::{ExtractionReport, ExtractionResult, ModelRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Base-class name that marks a model
    pub marker: String,
    /// Source file extension
    pub extension: String,
    /// Directory names to skip besides hidden ones and `__pycache__`
    pub exclude_dirs: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            extension: "py".to_string(),
            exclude_dirs: Vec::new(),
        }
    }
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_exclude_dir(mut self, dir: impl Into<String>) -> Self {
        self.exclude_dirs.push(dir.into());
        self
    }
}

/// Extract every model and query fragment below `root`
pub fn extract_dir(root: &Path, config: &ExtractConfig) -> EngineResult<ExtractionReport> {
    let scanner = SourceScanner::new()
        .with_extension(&config.extension)
        .with_exclude_dirs(config.exclude_dirs.iter().cloned());
    let files = scanner.scan(root)?;

    let extractor = ModelExtractor::new(&config.marker);
    let collector = QueryCollector::new();
    let mut report = ExtractionReport {
        files_scanned: files.len(),
        ..Default::default()
    };
    let (mut models, mut queries) = (Vec::new(), Vec::new());

    for file in &files {
        debug!(path = %file.path.display(), "extracting");
        let source = match decode(file)? {
            Ok(source) => source,
            Err(e) => {
                warn!("{}", e);
                report.parse_errors.push(e);
                continue;
            }
        };

        match extractor.extract(&file.path, &source) {
            Ok(extraction) => {
                models.extend(extraction.models);
                report.diagnostics.extend(extraction.diagnostics);
                queries.extend(collector.collect(&file.relative, &source));
            }
            Err(e) => {
                warn!("{}", e);
                report.parse_errors.push(e);
            }
        }
    }

    let registry = ModelRegistry::new(&models);
    for diagnostic in registry.diagnostics() {
        warn!("{}", diagnostic);
        report.diagnostics.push(diagnostic);
    }

    report.result = ExtractionResult::new(models, queries);
    info!(
        files = report.files_scanned,
        models = report.result.model_count(),
        queries = report.result.queries.len(),
        parse_errors = report.parse_errors.len(),
        "extraction complete"
    );
    Ok(report)
}

/// Read a file as UTF-8. Undecodable content is a parse failure of that
/// file; an unreadable file fails the whole run.
fn decode(file: &SourceFile) -> EngineResult<Result<String, ParseError>> {
    let bytes = file.read()?;
    Ok(String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = valid.iter().rev().take_while(|&&b| b != b'\n').count() + 1;
        ParseError::new(&file.path, line, column, "file is not valid UTF-8")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelsql_ir::Field;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_extracts_across_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(
            root,
            "library/models.py",
            b"class Author(Model):\n    name = CharField()\n\nclass Book(Model):\n    author = ForeignKey(Author)\n",
        );
        write(
            root,
            "library/views.py",
            b"def index():\n    return Book.objects.filter(author__name='x')\n",
        );
        write(root, "shop/models.py", b"class Item(models.Model):\n    price = FloatField()\n");

        let report = extract_dir(root, &ExtractConfig::default()).unwrap();
        assert_eq!(report.files_scanned, 3);
        assert!(!report.has_parse_errors());

        let names: Vec<_> = report.result.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Author", "Book", "Item"]);
        assert_eq!(
            report.result.models[1].fields,
            vec![Field::foreign_key("author", "Author")]
        );
        assert_eq!(
            report.result.queries,
            vec!["-- from: library/views.py\n-- return Book.objects.filter(author__name='x')"]
        );
    }

    #[test]
    fn test_broken_file_is_isolated() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for i in 0..8 {
            write(
                root,
                &format!("app{}/models.py", i),
                format!("class Model{}(Model):\n    name = CharField()\n", i).as_bytes(),
            );
        }
        write(
            root,
            "broken/models.py",
            b"class Broken(Model)\n    name = CharField()\n    q = Broken.objects.get(id=1)\n",
        );

        let report = extract_dir(root, &ExtractConfig::default()).unwrap();
        assert_eq!(report.files_scanned, 9);
        assert_eq!(report.parse_errors.len(), 1);
        assert_eq!(report.files_parsed(), 8);
        assert_eq!(report.result.model_count(), 8);
        assert!(report.parse_errors[0].path.ends_with("broken/models.py"));
        assert_eq!(report.parse_errors[0].line, 1);
        // Queries from the broken file are excluded too
        assert!(report.result.queries.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", b"x = 1\ny = '\xff'\n");
        write(dir.path(), "b.py", b"class B(Model):\n    pass\n");

        let report = extract_dir(dir.path(), &ExtractConfig::default()).unwrap();
        assert_eq!(report.parse_errors.len(), 1);
        assert_eq!(report.parse_errors[0].line, 2);
        assert_eq!(report.parse_errors[0].column, 6);
        assert_eq!(report.result.model_count(), 1);
    }

    #[test]
    fn test_duplicate_models_warn() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", b"class Book(Model):\n    pass\n");
        write(dir.path(), "b.py", b"class Book(Model):\n    pass\n");

        let report = extract_dir(dir.path(), &ExtractConfig::default()).unwrap();
        assert_eq!(report.result.model_count(), 2);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_config_marker_and_excludes() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", b"class A(Base):\n    x = CharField()\n");
        write(dir.path(), "vendor/b.py", b"class B(Base):\n    x = CharField()\n");

        let config = ExtractConfig::new()
            .with_marker("Base")
            .with_exclude_dir("vendor");
        let report = extract_dir(dir.path(), &config).unwrap();
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.result.models[0].name, "A");
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = extract_dir(&dir.path().join("nope"), &ExtractConfig::default()).unwrap_err();
        assert!(err.is_scan());
    }
}
