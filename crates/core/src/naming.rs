//! Identifier transforms used for table and column names

/// Convert a model or field name to its SQL identifier.
///
/// Lower-cases the name and replaces spaces with underscores. No other
/// normalization is applied: `BookAuthor` becomes `bookauthor`, and
/// punctuation passes through untouched.
pub fn to_snake(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

/// Name of the join table backing a many-to-many field
pub fn join_table_name(model: &str, field: &str) -> String {
    format!("{}_{}", to_snake(model), to_snake(field))
}

/// Name of the column holding a foreign key for `field`
pub fn fk_column_name(field: &str) -> String {
    format!("{}_id", to_snake(field))
}
