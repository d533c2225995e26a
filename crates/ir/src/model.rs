//! Model definitions
//!
//! A `Model` is one declared entity: a name plus its fields in declaration
//! order. Field order is significant, it decides column order in the
//! generated DDL.

use crate::field::Field;
use modelsql_core::{EngineError, EngineResult, Validatable, join_table_name, to_snake};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Model
// ============================================================================

/// Represents one declared entity (maps to a table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Model name as declared in the source
    pub name: String,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Model {
    /// Create a new model with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field (builder style)
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Table name for this model
    pub fn table_name(&self) -> String {
        to_snake(&self.name)
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that become columns on this model's table, in declaration order
    pub fn columns(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_many_to_many())
    }

    /// Foreign-key and one-to-one fields, in declaration order
    pub fn column_references(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_column_reference())
    }

    /// Many-to-many fields, in declaration order
    pub fn many_to_many(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_many_to_many())
    }

    /// Names of the join tables owned by this model, in declaration order
    pub fn join_table_names(&self) -> Vec<String> {
        self.many_to_many()
            .map(|f| join_table_name(&self.name, &f.name))
            .collect()
    }

    /// Check if any field relates to another model
    pub fn has_relations(&self) -> bool {
        self.fields.iter().any(Field::is_relation)
    }
}

impl Validatable for Model {
    fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::generation("Model name cannot be empty"));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            field.validate().map_err(|e| {
                EngineError::generation(format!("Model '{}': {}", self.name, e))
            })?;
            if !seen.insert(field.name.as_str()) {
                return Err(EngineError::generation(format!(
                    "Model '{}' declares field '{}' more than once",
                    self.name, field.name
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn book() -> Model {
        Model::new("Book")
            .with_field(Field::new("title", "CharField"))
            .with_field(Field::foreign_key("author", "Author"))
            .with_field(Field::many_to_many("tags", "Tag"))
            .with_field(Field::one_to_one("cover", "Image"))
    }

    #[test]
    fn test_model_new() {
        let model = Model::new("Blog Post");
        assert_eq!(model.table_name(), "blog_post");
        assert!(model.fields.is_empty());
        assert!(!model.has_relations());
    }

    #[test]
    fn test_columns_skip_many_to_many() {
        let model = book();
        let names: Vec<&str> = model.columns().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "author", "cover"]);
    }

    #[test]
    fn test_column_references() {
        let model = book();
        let names: Vec<&str> = model
            .column_references()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["author", "cover"]);
    }

    #[test]
    fn test_join_table_names() {
        let model = book();
        assert_eq!(model.join_table_names(), vec!["book_tags".to_string()]);
        assert!(model.has_relations());
    }

    #[test]
    fn test_field_lookup() {
        let model = book();
        assert!(model.field("author").is_some());
        assert!(model.field("missing").is_none());
    }

    #[test]
    fn test_model_validation() {
        assert!(book().is_valid());
        assert!(!Model::new("").is_valid());

        let dup = Model::new("Book")
            .with_field(Field::new("title", "CharField"))
            .with_field(Field::new("title", "TextField"));
        let err = dup.validate().unwrap_err();
        assert!(err.is_generation());
        assert!(err.to_string().contains("more than once"));
    }
}
