//! Model extraction from a parsed source file
//!
//! A top-level class is a model when one of its bases ends in the marker
//! name. Inside a model, every `name = Constructor(...)` assignment is a
//! field declaration; everything else is skipped with a diagnostic.

use crate::syntax::{self, Assign, Call, ClassDef, Expr, Stmt};
use modelsql_core::ParseError;
use modelsql_ir::{Diagnostic, Field, Model};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default base-class marker
pub const DEFAULT_MARKER: &str = "Model";

/// Models and diagnostics from one file
#[derive(Debug, Clone, Default)]
pub struct FileExtraction {
    pub models: Vec<Model>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Extracts model declarations from Python source
#[derive(Debug, Clone)]
pub struct ModelExtractor {
    marker: String,
}

impl Default for ModelExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl ModelExtractor {
    /// Create an extractor recognising classes whose base ends in `marker`
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// The base-class marker
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Parse `source` and extract its models. `path` is used for error and
    /// diagnostic locations only.
    pub fn extract(&self, path: &Path, source: &str) -> Result<FileExtraction, ParseError> {
        let module = syntax::parse_module(source).map_err(|e| e.into_parse_error(path))?;

        let mut out = FileExtraction::default();
        for stmt in &module.body {
            let Stmt::ClassDef(class) = stmt else {
                continue;
            };
            if !self.is_model(class) {
                debug!(class = %class.name, "skipping class without model base");
                continue;
            }
            let mut file = FileScope {
                path,
                diagnostics: &mut out.diagnostics,
            };
            out.models.push(file.model(class));
        }

        debug!(
            path = %path.display(),
            models = out.models.len(),
            "extracted models"
        );
        Ok(out)
    }

    fn is_model(&self, class: &ClassDef) -> bool {
        class
            .bases
            .iter()
            .any(|base| base.last_segment() == Some(self.marker.as_str()))
    }
}

/// Per-file state while walking model bodies
struct FileScope<'a> {
    path: &'a Path,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl FileScope<'_> {
    fn info(&mut self, line: usize, message: String) {
        debug!(path = %self.path.display(), line, "{}", message);
        self.diagnostics
            .push(Diagnostic::info(message).at(PathBuf::from(self.path), line));
    }

    fn warn(&mut self, line: usize, message: String) {
        warn!(path = %self.path.display(), line, "{}", message);
        self.diagnostics
            .push(Diagnostic::warning(message).at(PathBuf::from(self.path), line));
    }

    fn model(&mut self, class: &ClassDef) -> Model {
        let mut model = Model::new(&class.name);

        for stmt in &class.body {
            let field = match stmt {
                Stmt::Assign(assign) => self.field(class, assign),
                Stmt::Expr {
                    value: Expr::Str(_),
                    line,
                } => {
                    self.info(*line, format!("{}: skipped docstring", class.name));
                    None
                }
                Stmt::ClassDef(inner) => {
                    self.info(
                        inner.line,
                        format!("{}: skipped nested class '{}'", class.name, inner.name),
                    );
                    None
                }
                Stmt::Compound {
                    keyword,
                    name: Some(name),
                    line,
                    ..
                } => {
                    self.info(
                        *line,
                        format!("{}: skipped {} '{}'", class.name, keyword, name),
                    );
                    None
                }
                other => {
                    self.info(
                        other.line(),
                        format!("{}: skipped statement that is not a field declaration", class.name),
                    );
                    None
                }
            };

            let Some(field) = field else {
                continue;
            };

            // Re-assignment keeps the first position and the last declaration
            match model.fields.iter().position(|f| f.name == field.name) {
                Some(index) => {
                    self.warn(
                        stmt.line(),
                        format!(
                            "{}: field '{}' is declared more than once; the last declaration is used",
                            class.name, field.name
                        ),
                    );
                    model.fields[index] = field;
                }
                None => model.fields.push(field),
            }
        }

        model
    }

    fn field(&mut self, class: &ClassDef, assign: &Assign) -> Option<Field> {
        let Some(call) = assign.value.as_call() else {
            self.info(
                assign.line,
                format!("{}: skipped assignment whose value is not a call", class.name),
            );
            return None;
        };

        let Some(name) = assign.targets.first().and_then(Expr::as_name) else {
            self.warn(
                assign.line,
                format!("{}: skipped call assignment to a target that is not a name", class.name),
            );
            return None;
        };

        let Some(constructor) = call.func.last_segment() else {
            self.warn(
                assign.line,
                format!("{}.{}: constructor is not a name; skipped", class.name, name),
            );
            return None;
        };

        let mut field = Field::new(name, constructor);
        field.nullable = self.flag(class, name, call, "null", assign.line);
        field.unique = self.flag(class, name, call, "unique", assign.line);

        if field.is_relation() {
            field.related_model = self.relation_target(class, name, call, assign.line);
        }

        Some(field)
    }

    /// Literal boolean keyword argument; anything else counts as false
    fn flag(&mut self, class: &ClassDef, field: &str, call: &Call, keyword: &str, line: usize) -> bool {
        match call.keyword(keyword) {
            None => false,
            Some(Expr::Bool(value)) => *value,
            Some(_) => {
                self.warn(
                    line,
                    format!(
                        "{}.{}: '{}' is not a literal True/False; treated as False",
                        class.name, field, keyword
                    ),
                );
                false
            }
        }
    }

    /// Target of a relation: first positional argument, or `to=`
    fn relation_target(
        &mut self,
        class: &ClassDef,
        field: &str,
        call: &Call,
        line: usize,
    ) -> Option<String> {
        let Some(expr) = call.args.first().or_else(|| call.keyword("to")) else {
            self.warn(
                line,
                format!("{}.{}: relation has no target", class.name, field),
            );
            return None;
        };

        let target = match expr {
            Expr::Name(name) => Some(name.as_str()),
            Expr::Attribute { attr, .. } => Some(attr.as_str()),
            Expr::Str(s) if s == "self" => Some(class.name.as_str()),
            Expr::Str(s) => s.rsplit('.').next().filter(|segment| !segment.is_empty()),
            _ => None,
        };

        if target.is_none() {
            self.warn(
                line,
                format!("{}.{}: relation target is not a model name", class.name, field),
            );
        }
        target.map(str::to_string)
    }
}

// ============================================================================
// Tests
// ============================================================================
