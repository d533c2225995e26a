//! # Migration Generation
//!
//! Produces one up/down migration pair per run:
//!
//! ```text
//! migrations/{timestamp}_create_tables.up.sql
//! migrations/{timestamp}_create_tables.down.sql
//! ```
//!
//! The up migration is the full schema; nothing is diffed against earlier
//! migrations. The down migration drops every table, join tables before the
//! tables they reference. Both files share the context's single timestamp.

use modelsql_ir::Model;

use crate::context::GenerationContext;
use crate::schema::{generate_schema, join_tables};
use crate::{GeneratedFile, TableOrder};

/// Directory the migration pair is written to
pub const MIGRATIONS_DIR: &str = "migrations";

/// Matched up/down migration contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPair {
    /// Shared `YYYYMMDDHHMMSS` token
    pub timestamp: String,
    pub up: String,
    pub down: String,
}

impl MigrationPair {
    /// Relative path of the up migration
    pub fn up_path(&self) -> String {
        format!("{}/{}_create_tables.up.sql", MIGRATIONS_DIR, self.timestamp)
    }

    /// Relative path of the down migration
    pub fn down_path(&self) -> String {
        format!("{}/{}_create_tables.down.sql", MIGRATIONS_DIR, self.timestamp)
    }

    /// Both migrations as files
    pub fn into_files(self) -> [GeneratedFile; 2] {
        let (up_path, down_path) = (self.up_path(), self.down_path());
        [
            GeneratedFile::sql(up_path, self.up),
            GeneratedFile::sql(down_path, self.down),
        ]
    }
}

/// Generate the migration pair for the run
pub fn generate_migrations(ctx: &GenerationContext) -> MigrationPair {
    MigrationPair {
        timestamp: ctx.timestamp().to_string(),
        up: generate_schema(ctx),
        down: generate_down(ctx),
    }
}

/// Down migration for the run.
///
/// In extraction order each model's join tables are dropped right before the
/// model itself. In dependency order the models are dropped in reverse, with
/// every join table dropped first.
pub fn generate_down(ctx: &GenerationContext) -> String {
    let mut out = String::with_capacity(ctx.model_count() * 40);

    match ctx.table_order() {
        TableOrder::Extraction => {
            for model in ctx.models() {
                push_model_drops(&mut out, model);
            }
        }
        TableOrder::Dependency => {
            for model in ctx.models().rev() {
                for join in join_tables(model).iter().rev() {
                    out.push_str(&drop_table(&join.name));
                }
            }
            for model in ctx.models().rev() {
                out.push_str(&drop_table(&model.table_name()));
            }
        }
    }

    out
}

fn push_model_drops(out: &mut String, model: &Model) {
    for join in join_tables(model) {
        out.push_str(&drop_table(&join.name));
    }
    out.push_str(&drop_table(&model.table_name()));
}

/// Existence-guarded `DROP TABLE` line
pub fn drop_table(name: &str) -> String {
    format!("DROP TABLE IF EXISTS {};\n", name)
}

// ============================================================================
// Tests
// ============================================================================
