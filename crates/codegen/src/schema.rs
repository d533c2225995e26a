//! # Schema Generation
//!
//! Generates the `CREATE TABLE` statements for every model, each followed
//! by the join tables of its many-to-many fields. In dependency order the
//! join tables come after all model tables instead.
//!
//! ```text
//! CREATE TABLE book (
//!     id SERIAL PRIMARY KEY,
//!     title TEXT NOT NULL,
//!     author_id INTEGER NOT NULL,
//!     FOREIGN KEY (author_id) REFERENCES author(id)
//! );
//!
//! CREATE TABLE book_tags (
//!     book_id INTEGER REFERENCES book(id),
//!     tag_id INTEGER REFERENCES tag(id)
//! );
//! ```
//!
//! Type mapping does not currently depend on the dialect; the parameter is
//! threaded through so it can.

use modelsql_core::{Dialect, join_table_name};
use modelsql_ir::{Field, Model};

use crate::{GeneratedFile, TableOrder};
use crate::context::GenerationContext;

/// Schema file name
pub const SCHEMA_FILE: &str = "schema.sql";

/// Primary key column every table starts with
pub const PRIMARY_KEY: &str = "id SERIAL PRIMARY KEY";

const INDENT: &str = "    ";

// ============================================================================
// Public API
// ============================================================================

/// Generate `schema.sql`
pub fn generate_schema_file(ctx: &GenerationContext) -> GeneratedFile {
    GeneratedFile::sql(SCHEMA_FILE, generate_schema(ctx))
}

/// DDL for every model of the run, in table order
pub fn generate_schema(ctx: &GenerationContext) -> String {
    match ctx.table_order() {
        TableOrder::Extraction => schema_sql(ctx.models(), ctx.dialect()),
        TableOrder::Dependency => dependency_schema_sql(ctx.models(), ctx.dialect()),
    }
}

/// DDL for `models` in the given order
pub fn schema_sql<'m>(models: impl IntoIterator<Item = &'m Model>, dialect: Dialect) -> String {
    let mut out = String::with_capacity(1024);
    for model in models {
        out.push_str(&create_table(model, dialect));
        for join in join_tables(model) {
            out.push_str(&join.create_sql());
        }
    }
    out
}

/// DDL for `models` with every join table after the last model table, so a
/// join table never precedes either side it references
pub fn dependency_schema_sql<'m>(models: impl IntoIterator<Item = &'m Model>, dialect: Dialect) -> String {
    let mut out = String::with_capacity(1024);
    let mut joins = Vec::new();
    for model in models {
        out.push_str(&create_table(model, dialect));
        joins.extend(join_tables(model));
    }
    for join in &joins {
        out.push_str(&join.create_sql());
    }
    out
}

/// `CREATE TABLE` statement for one model, followed by a blank line
pub fn create_table(model: &Model, dialect: Dialect) -> String {
    let mut lines = vec![format!("{}{}", INDENT, PRIMARY_KEY)];

    lines.extend(model.columns().map(|field| column_definition(field, dialect)));
    lines.extend(model.column_references().filter_map(foreign_key_constraint));

    let mut out = String::with_capacity(64 + lines.len() * 32);
    out.push_str(&format!("CREATE TABLE {} (\n", model.table_name()));
    out.push_str(&lines.join(",\n"));
    out.push_str("\n);\n\n");
    out
}

/// One column line: `name TYPE[ NOT NULL][ UNIQUE]`
pub fn column_definition(field: &Field, dialect: Dialect) -> String {
    let mut line = format!("{}{} {}", INDENT, field.column_name(), field.sql_type(dialect));
    if !field.nullable {
        line.push_str(" NOT NULL");
    }
    if field.unique {
        line.push_str(" UNIQUE");
    }
    line
}

/// Table-level `FOREIGN KEY` clause; `None` when the target is unknown
pub fn foreign_key_constraint(field: &Field) -> Option<String> {
    let target = field.related_table()?;
    Some(format!(
        "{}FOREIGN KEY ({}) REFERENCES {}(id)",
        INDENT,
        field.column_name(),
        target
    ))
}

// ============================================================================
// Join tables
// ============================================================================

/// Association table backing one many-to-many field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTable {
    pub name: String,
    pub owner_table: String,
    pub owner_column: String,
    pub target_table: String,
    pub target_column: String,
}

impl JoinTable {
    /// Join table for `field` of `model`; `None` for fields that are not
    /// many-to-many or have no target
    pub fn for_field(model: &Model, field: &Field) -> Option<Self> {
        if !field.is_many_to_many() {
            return None;
        }
        let target_table = field.related_table()?;
        let owner_table = model.table_name();

        let (owner_column, target_column) = if target_table == owner_table {
            (
                format!("from_{}_id", owner_table),
                format!("to_{}_id", owner_table),
            )
        } else {
            (
                format!("{}_id", owner_table),
                format!("{}_id", target_table),
            )
        };

        Some(Self {
            name: join_table_name(&model.name, &field.name),
            owner_table,
            owner_column,
            target_table,
            target_column,
        })
    }

    /// `CREATE TABLE` statement, followed by a blank line
    pub fn create_sql(&self) -> String {
        format!(
            "CREATE TABLE {} (\n{i}{} INTEGER REFERENCES {}(id),\n{i}{} INTEGER REFERENCES {}(id)\n);\n\n",
            self.name,
            self.owner_column,
            self.owner_table,
            self.target_column,
            self.target_table,
            i = INDENT,
        )
    }
}

/// Join tables owned by `model`, in field order
pub fn join_tables(model: &Model) -> Vec<JoinTable> {
    model
        .many_to_many()
        .filter_map(|field| JoinTable::for_field(model, field))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
