//! # sqlc Configuration
//!
//! Emits `sqlc.yaml`, pointing sqlc at the generated schema and query files.
//! The document depends only on the dialect.

use modelsql_core::Dialect;

use crate::GeneratedFile;
use crate::context::GenerationContext;
use crate::queries::QUERY_FILE;
use crate::schema::SCHEMA_FILE;

/// Config file name
pub const SQLC_CONFIG_FILE: &str = "sqlc.yaml";

/// Go package and directory the sqlc output is configured for
pub const GO_PACKAGE: &str = "db";

/// Generate `sqlc.yaml`
pub fn generate_sqlc_config_file(ctx: &GenerationContext) -> GeneratedFile {
    GeneratedFile::yaml(SQLC_CONFIG_FILE, sqlc_config(ctx.dialect()))
}

/// The sqlc version 2 configuration for `dialect`
pub fn sqlc_config(dialect: Dialect) -> String {
    let mut out = String::with_capacity(192);
    out.push_str("version: \"2\"\n");
    out.push_str("sql:\n");
    out.push_str(&format!("  - engine: {}\n", dialect.engine()));
    out.push_str(&format!("    queries: \"./{}\"\n", QUERY_FILE));
    out.push_str(&format!("    schema: \"./{}\"\n", SCHEMA_FILE));
    out.push_str("    gen:\n");
    out.push_str("      go:\n");
    out.push_str(&format!("        package: \"{}\"\n", GO_PACKAGE));
    out.push_str(&format!("        out: \"./{}\"\n", GO_PACKAGE));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_postgres_config() {
        assert_eq!(
            sqlc_config(Dialect::Postgres),
            "version: \"2\"\n\
             sql:\n  \
               - engine: postgresql\n    \
                 queries: \"./query.sql\"\n    \
                 schema: \"./schema.sql\"\n    \
                 gen:\n      \
                   go:\n        \
                     package: \"db\"\n        \
                     out: \"./db\"\n"
        );
    }

    #[test]
    fn test_mysql_engine() {
        let yaml = sqlc_config(Dialect::MySql);
        assert!(yaml.contains("  - engine: mysql\n"));
        assert_eq!(yaml.lines().count(), 9);
    }
}
