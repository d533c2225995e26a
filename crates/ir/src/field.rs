//! Field definitions for model attributes
//!
//! This module contains the `Field` struct describing one declared
//! attribute of a model, including its optional relationship.

use modelsql_core::{
    Dialect, EngineError, EngineResult, FieldKind, RelationKind, Validatable, fk_column_name,
    to_snake,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Field
// ============================================================================

/// Represents one declared attribute of a model (maps to a column, or to a
/// join table for many-to-many relations)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as declared in the source
    pub name: String,

    /// Constructor name the field was declared with (e.g. `CharField`)
    pub type_name: String,

    /// Primitive kind derived from the constructor name
    pub kind: FieldKind,

    /// Whether the column accepts NULL
    #[serde(default)]
    pub nullable: bool,

    /// Whether the column must be unique
    #[serde(default)]
    pub unique: bool,

    /// Relationship carried by this field
    #[serde(default)]
    pub relation: RelationKind,

    /// Name of the related model, when the field is a relation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_model: Option<String>,
}

impl Field {
    /// Create a new field from its name and constructor name.
    ///
    /// Both the primitive kind and the relation kind are derived from the
    /// constructor name.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            name: name.into(),
            kind: FieldKind::from_constructor(&type_name),
            relation: RelationKind::from_constructor(&type_name),
            type_name,
            nullable: false,
            unique: false,
            related_model: None,
        }
    }

    /// Create a foreign key field
    pub fn foreign_key(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, "ForeignKey").with_related_model(target)
    }

    /// Create a one-to-one field
    pub fn one_to_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, "OneToOneField").with_related_model(target)
    }

    /// Create a many-to-many field
    pub fn many_to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, "ManyToManyField").with_related_model(target)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark the field as nullable
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the field as unique
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set the related model
    pub fn with_related_model(mut self, target: impl Into<String>) -> Self {
        self.related_model = Some(target.into());
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// Check if this field is a relation of any kind
    pub fn is_relation(&self) -> bool {
        self.relation.is_relation()
    }

    /// Check if this field is stored as a foreign key column on its model
    pub fn is_column_reference(&self) -> bool {
        self.relation.is_column_reference()
    }

    /// Check if this field is backed by a join table
    pub fn is_many_to_many(&self) -> bool {
        self.relation.requires_join_table()
    }

    /// Column name on the owning table.
    ///
    /// Foreign-key and one-to-one fields store the referenced id in
    /// `<field>_id`; every other field uses its snake-cased name.
    pub fn column_name(&self) -> String {
        if self.is_column_reference() {
            fk_column_name(&self.name)
        } else {
            to_snake(&self.name)
        }
    }

    /// SQL type of the column on the owning table
    pub fn sql_type(&self, dialect: Dialect) -> &'static str {
        if self.is_column_reference() {
            "INTEGER"
        } else {
            self.kind.sql_type(dialect)
        }
    }

    /// Snake-cased related model name, used as the referenced table
    pub fn related_table(&self) -> Option<String> {
        self.related_model.as_deref().map(to_snake)
    }
}

impl Validatable for Field {
    fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::generation("Field name cannot be empty"));
        }

        if !self.is_relation() && self.related_model.is_some() {
            return Err(EngineError::generation(format!(
                "Field '{}' names a related model but is not a relation",
                self.name
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
