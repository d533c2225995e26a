//! # Query File
//!
//! Joins the collected query fragments into `query.sql`, one blank line
//! between fragments.

use crate::GeneratedFile;
use crate::context::GenerationContext;

/// Query file name
pub const QUERY_FILE: &str = "query.sql";

/// Generate `query.sql`
pub fn generate_queries_file(ctx: &GenerationContext) -> GeneratedFile {
    GeneratedFile::sql(QUERY_FILE, join_fragments(ctx.queries()))
}

/// Fragments joined by a blank line
pub fn join_fragments(fragments: &[String]) -> String {
    fragments.join("\n\n")
}
