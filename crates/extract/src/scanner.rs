//! Source file discovery
//!
//! Walks the input tree in file-name order so that every run over the same
//! tree visits files in the same order.

use modelsql_core::{EngineError, EngineResult};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into
const ALWAYS_SKIPPED: &[&str] = &["__pycache__"];

/// A discovered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as found on disk
    pub path: PathBuf,
    /// Path relative to the scanned root, with `/` separators
    pub relative: String,
}

impl SourceFile {
    /// Read the raw file contents
    pub fn read(&self) -> EngineResult<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| EngineError::FileRead {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

/// Recursive source file finder
#[derive(Debug, Clone)]
pub struct SourceScanner {
    extension: String,
    exclude_dirs: Vec<String>,
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self {
            extension: "py".to_string(),
            exclude_dirs: Vec::new(),
        }
    }
}

impl SourceScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only files with this extension are returned
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Skip directories with these names, in addition to hidden ones
    pub fn with_exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Find every matching file below `root`.
    ///
    /// Any walk failure aborts the scan: a partially scanned tree would
    /// produce a partial schema.
    pub fn scan(&self, root: &Path) -> EngineResult<Vec<SourceFile>> {
        if !root.is_dir() {
            return Err(EngineError::InputNotFound(root.to_path_buf()));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_skipped_dir(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                EngineError::scan(path, e.to_string())
            })?;

            if !entry.file_type().is_file() || !self.matches_extension(entry.path()) {
                continue;
            }

            files.push(SourceFile {
                path: entry.path().to_path_buf(),
                relative: relative_path(root, entry.path()),
            });
        }

        debug!(root = %root.display(), files = files.len(), "scanned source tree");
        Ok(files)
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.')
            || ALWAYS_SKIPPED.contains(&&*name)
            || self.exclude_dirs.iter().any(|d| *d == name)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy() == self.extension.as_str())
    }
}

/// `path` relative to `root`, joined with `/`
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
