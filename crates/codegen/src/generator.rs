//! # Generator Orchestrator
//!
//! The `Generator` is the top-level entry point for generation. It takes an
//! [`ExtractionResult`] and a [`GeneratorConfig`], checks the models and
//! their relations, builds a [`GenerationContext`], and delegates to the
//! schema, migration, query and sqlc generators.
//!
//! ## Pipeline
//!
//! ```text
//! ExtractionResult + GeneratorConfig
//!         │
//!         ▼
//!   validate models, resolve relations
//!         │
//!         ▼
//!   GenerationContext::new()
//!         │
//!         ├──► schema::generate_schema_file()          → schema.sql
//!         ├──► migrations::generate_migrations()       → migrations/{ts}_create_tables.{up,down}.sql
//!         ├──► queries::generate_queries_file()        → query.sql
//!         ├──► config::generate_sqlc_config_file()     → sqlc.yaml
//!         │
//!         ▼
//!   GeneratedProject { files, warnings }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use modelsql_codegen::{Generator, GeneratorConfig};
//!
//! let config = GeneratorConfig::new().with_output_dir("./out");
//! let output = Generator::new(config).generate_and_write(&report.result)?;
//! println!("Generated {} files", output.file_count());
//! ```

use modelsql_core::{EngineError, EngineResult, Validatable};
use modelsql_ir::ExtractionResult;

use crate::context::GenerationContext;
use crate::schema::join_tables;
use crate::{FileType, GeneratedProject, GeneratorConfig};
use crate::{config, migrations, queries, schema};

// ============================================================================
// Generator
// ============================================================================

/// Top-level generator that orchestrates the full pipeline.
///
/// The `Generator` is stateless aside from its configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    // ====================================================================
    // Construction
    // ====================================================================

    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(GeneratorConfig::default())
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GeneratorConfig) {
        self.config = config;
    }

    // ====================================================================
    // Generation
    // ====================================================================

    /// Run the full generation pipeline on an extraction result.
    ///
    /// # Errors
    ///
    /// - `Generation` if a model is internally inconsistent (empty name,
    ///   repeated field name).
    /// - `UnresolvedRelation(s)` in strict mode, if a relation target is
    ///   missing or names no declared model. Otherwise each one becomes a
    ///   warning and the SQL is generated as declared.
    pub fn generate(&self, result: &ExtractionResult) -> EngineResult<GeneratedProject> {
        // ── 1. Validate ──────────────────────────────────────────────────
        for model in &result.models {
            model.validate()?;
        }

        // ── 2. Build context ─────────────────────────────────────────────
        let ctx = GenerationContext::new(result, self.config.clone());

        // ── 3. Resolve relations ─────────────────────────────────────────
        let mut warnings: Vec<String> = Vec::new();

        let unresolved = ctx.unresolved_relations();
        if !unresolved.is_empty() {
            if self.config.strict_relations {
                return Err(ctx.registry().resolve().err().unwrap_or_else(|| {
                    EngineError::internal("unresolved relations reported but none found")
                }));
            }
            for relation in &unresolved {
                let warning = match relation.target {
                    Some(_) => format!(
                        "{}: {}; the generated SQL references a table that is not created",
                        relation,
                        relation.reason()
                    ),
                    None => format!(
                        "{}: {}; no foreign key or join table is generated",
                        relation,
                        relation.reason()
                    ),
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
            }
        }

        for name in ctx.registry().duplicates() {
            warnings.push(format!(
                "Model '{}' is declared more than once; both tables are generated",
                name
            ));
        }

        if ctx.model_count() == 0 {
            warnings.push("No models found; the schema and migrations are empty.".to_string());
        }

        // ── 4. Generate files ────────────────────────────────────────────
        let mut output = GeneratedProject::new(self.config.output_dir.display().to_string());

        output.add_file(schema::generate_schema_file(&ctx));
        for file in migrations::generate_migrations(&ctx).into_files() {
            output.add_file(file);
        }
        output.add_file(queries::generate_queries_file(&ctx));
        output.add_file(config::generate_sqlc_config_file(&ctx));

        for warning in warnings {
            output.add_warning(warning);
        }

        tracing::info!(
            files = output.file_count(),
            warnings = output.warnings.len(),
            models = ctx.model_count(),
            dialect = %ctx.dialect(),
            "generation complete",
        );

        Ok(output)
    }

    // ====================================================================
    // Convenience: generate and write to disk
    // ====================================================================

    /// Generate and write every file to the configured output directory.
    /// Nothing is written when generation fails.
    pub fn generate_and_write(&self, result: &ExtractionResult) -> EngineResult<GeneratedProject> {
        let output = self.generate(result)?;
        output.write_to_disk(&self.config.output_dir)?;
        tracing::info!(
            output_dir = %self.config.output_dir.display(),
            files = output.file_count(),
            "files written to disk",
        );
        Ok(output)
    }
}

// ============================================================================
// Standalone convenience functions
// ============================================================================

/// Generate with default configuration.
pub fn generate(result: &ExtractionResult) -> EngineResult<GeneratedProject> {
    Generator::with_defaults().generate(result)
}

/// Generate and write to the specified output directory.
pub fn generate_to_dir(
    result: &ExtractionResult,
    output_dir: impl Into<std::path::PathBuf>,
) -> EngineResult<GeneratedProject> {
    let config = GeneratorConfig::new().with_output_dir(output_dir);
    Generator::new(config).generate_and_write(result)
}

// ============================================================================
// GenerationSummary
// ============================================================================

/// A human-readable summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Output location
    pub output: String,
    /// Number of model tables
    pub models: usize,
    /// Number of join tables
    pub join_tables: usize,
    /// Number of query fragments
    pub queries: usize,
    /// Total number of files generated
    pub total_files: usize,
    /// Number of SQL files
    pub sql_files: usize,
    /// Number of other files (sqlc.yaml)
    pub other_files: usize,
    /// Number of warnings
    pub warning_count: usize,
    /// Total bytes of generated content
    pub total_bytes: usize,
}

impl GenerationSummary {
    /// Build a summary from the extraction result and its generated files
    pub fn new(result: &ExtractionResult, project: &GeneratedProject) -> Self {
        let sql_files = project.files_by_type(FileType::Sql).len();
        let total_bytes: usize = project.files.iter().map(|f| f.content.len()).sum();
        let join_tables = result.models.iter().map(|m| join_tables(m).len()).sum();

        Self {
            output: project.name.clone(),
            models: result.model_count(),
            join_tables,
            queries: result.queries.len(),
            total_files: project.file_count(),
            sql_files,
            other_files: project.file_count() - sql_files,
            warning_count: project.warnings.len(),
            total_bytes,
        }
    }

    /// Format the summary as a human-readable string.
    pub fn display(&self) -> String {
        let mut out = String::with_capacity(768);

        out.push_str("╔══════════════════════════════════════════════════╗\n");
        out.push_str("║         SQL Generation Complete                  ║\n");
        out.push_str("╠══════════════════════════════════════════════════╣\n");
        out.push_str(&format!("║  Output:      {:<35}║\n", elide_front(&self.output, 35)));
        out.push_str(&format!("║  Models:      {:<35}║\n", self.models));
        out.push_str(&format!("║  Join Tables: {:<35}║\n", self.join_tables));
        out.push_str(&format!("║  Queries:     {:<35}║\n", self.queries));
        out.push_str(&format!("║  Total Files: {:<35}║\n", self.total_files));
        out.push_str(&format!("║    SQL:       {:<35}║\n", self.sql_files));
        out.push_str(&format!("║    Other:     {:<35}║\n", self.other_files));
        out.push_str(&format!("║  Warnings:    {:<35}║\n", self.warning_count));

        let size_str = if self.total_bytes < 1024 {
            format!("{} B", self.total_bytes)
        } else if self.total_bytes < 1024 * 1024 {
            format!("{:.1} KB", self.total_bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", self.total_bytes as f64 / (1024.0 * 1024.0))
        };
        out.push_str(&format!("║  Total Size:  {:<35}║\n", size_str));
        out.push_str("╚══════════════════════════════════════════════════╝\n");

        out
    }
}

impl std::fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Keep the last `width` characters of `value`, marking a cut with `…`
fn elide_front(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len <= width {
        return value.to_string();
    }
    let tail: String = value.chars().skip(len - width + 1).collect();
    format!("…{}", tail)
}

/// Produce a [`GenerationSummary`] for a run.
pub fn summarize(result: &ExtractionResult, project: &GeneratedProject) -> GenerationSummary {
    GenerationSummary::new(result, project)
}

// ============================================================================
// Tests
// ============================================================================
