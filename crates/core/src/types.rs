//! Core types used throughout modelsql
//!
//! This module contains the closed vocabularies shared by extraction and
//! generation: field kinds, relation kinds and SQL dialects.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Field Kinds
// ============================================================================

/// Primitive kind of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Character and long-form text fields
    Text,
    /// Whole numbers
    Integer,
    /// Floating point numbers
    Float,
    /// True/false
    Boolean,
    /// Dates and date-times
    Temporal,
    /// Any constructor outside the known vocabulary
    #[default]
    Unrecognized,
}

/// Constructor name → field kind.
const FIELD_KINDS: &[(&str, FieldKind)] = &[
    ("CharField", FieldKind::Text),
    ("TextField", FieldKind::Text),
    ("EmailField", FieldKind::Text),
    ("SlugField", FieldKind::Text),
    ("URLField", FieldKind::Text),
    ("IntegerField", FieldKind::Integer),
    ("BigIntegerField", FieldKind::Integer),
    ("SmallIntegerField", FieldKind::Integer),
    ("PositiveIntegerField", FieldKind::Integer),
    ("FloatField", FieldKind::Float),
    ("BooleanField", FieldKind::Boolean),
    ("DateField", FieldKind::Temporal),
    ("DateTimeField", FieldKind::Temporal),
];

impl FieldKind {
    /// Classify a field constructor name. Unknown names never fail.
    pub fn from_constructor(name: &str) -> Self {
        FIELD_KINDS
            .iter()
            .find(|(ctor, _)| *ctor == name)
            .map(|(_, kind)| *kind)
            .unwrap_or(FieldKind::Unrecognized)
    }

    /// SQL column type for this kind.
    ///
    /// The mapping is currently identical for every dialect; the parameter
    /// is where native-type divergence belongs.
    pub fn sql_type(&self, dialect: Dialect) -> &'static str {
        match (self, dialect) {
            (FieldKind::Text | FieldKind::Unrecognized, _) => "TEXT",
            (FieldKind::Integer, _) => "INTEGER",
            (FieldKind::Float, _) => "REAL",
            (FieldKind::Boolean, _) => "BOOLEAN",
            (FieldKind::Temporal, _) => "TIMESTAMP",
        }
    }

    /// Get a user-friendly display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Temporal => "temporal",
            FieldKind::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Relation Kinds
// ============================================================================

/// Relationship carried by a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Plain column
    #[default]
    None,
    /// Many rows point at one row of the target
    ForeignKey,
    /// Exactly one row points at one row of the target
    OneToOne,
    /// Rows on both sides relate through a join table
    ManyToMany,
}

/// Relation constructor name → relation kind.
const RELATION_KINDS: &[(&str, RelationKind)] = &[
    ("ForeignKey", RelationKind::ForeignKey),
    ("OneToOneField", RelationKind::OneToOne),
    ("ManyToManyField", RelationKind::ManyToMany),
];

impl RelationKind {
    /// Classify a field constructor name
    pub fn from_constructor(name: &str) -> Self {
        RELATION_KINDS
            .iter()
            .find(|(ctor, _)| *ctor == name)
            .map(|(_, kind)| *kind)
            .unwrap_or(RelationKind::None)
    }

    /// Check if this is any relation at all
    pub fn is_relation(&self) -> bool {
        !matches!(self, RelationKind::None)
    }

    /// Foreign-key and one-to-one relations live as a column on the owning table
    pub fn is_column_reference(&self) -> bool {
        matches!(self, RelationKind::ForeignKey | RelationKind::OneToOne)
    }

    /// Check if this relationship requires a join table
    pub fn requires_join_table(&self) -> bool {
        matches!(self, RelationKind::ManyToMany)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            RelationKind::None => "none",
            RelationKind::ForeignKey => "foreign-key",
            RelationKind::OneToOne => "one-to-one",
            RelationKind::ManyToMany => "many-to-many",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Dialects
// ============================================================================

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    MySql,
}

impl Dialect {
    /// Token accepted on the command line and in config files
    pub fn token(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
        }
    }

    /// Engine identifier understood by sqlc
    pub fn engine(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgresql",
            Dialect::MySql => "mysql",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "PostgreSQL",
            Dialect::MySql => "MySQL",
        }
    }

    /// Get all dialects
    pub fn all() -> &'static [Dialect] {
        &[Dialect::Postgres, Dialect::MySql]
    }
}

impl FromStr for Dialect {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            _ => Err(EngineError::InvalidDialect(s.to_string())),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_from_constructor() {
        assert_eq!(FieldKind::from_constructor("CharField"), FieldKind::Text);
        assert_eq!(FieldKind::from_constructor("TextField"), FieldKind::Text);
        assert_eq!(FieldKind::from_constructor("IntegerField"), FieldKind::Integer);
        assert_eq!(FieldKind::from_constructor("FloatField"), FieldKind::Float);
        assert_eq!(FieldKind::from_constructor("BooleanField"), FieldKind::Boolean);
        assert_eq!(FieldKind::from_constructor("DateField"), FieldKind::Temporal);
        assert_eq!(
            FieldKind::from_constructor("DateTimeField"),
            FieldKind::Temporal
        );
    }

    #[test]
    fn test_unrecognized_kind_maps_to_text() {
        for name in ["DecimalField", "JSONField", "", "charfield", "ForeignKey"] {
            let kind = FieldKind::from_constructor(name);
            assert_eq!(kind, FieldKind::Unrecognized);
            for dialect in Dialect::all() {
                assert_eq!(kind.sql_type(*dialect), "TEXT");
            }
        }
    }

    #[test]
    fn test_sql_types_are_dialect_invariant() {
        for kind in [
            FieldKind::Text,
            FieldKind::Integer,
            FieldKind::Float,
            FieldKind::Boolean,
            FieldKind::Temporal,
        ] {
            assert_eq!(
                kind.sql_type(Dialect::Postgres),
                kind.sql_type(Dialect::MySql)
            );
        }
        assert_eq!(FieldKind::Float.sql_type(Dialect::Postgres), "REAL");
        assert_eq!(FieldKind::Temporal.sql_type(Dialect::MySql), "TIMESTAMP");
    }

    #[test]
    fn test_relation_kind_table() {
        assert_eq!(
            RelationKind::from_constructor("ForeignKey"),
            RelationKind::ForeignKey
        );
        assert_eq!(
            RelationKind::from_constructor("OneToOneField"),
            RelationKind::OneToOne
        );
        assert_eq!(
            RelationKind::from_constructor("ManyToManyField"),
            RelationKind::ManyToMany
        );
        assert_eq!(
            RelationKind::from_constructor("ManyToManyRel"),
            RelationKind::None
        );
        assert_eq!(RelationKind::from_constructor("CharField"), RelationKind::None);
    }

    #[test]
    fn test_relation_kind_predicates() {
        assert!(RelationKind::ForeignKey.is_column_reference());
        assert!(RelationKind::OneToOne.is_column_reference());
        assert!(!RelationKind::ManyToMany.is_column_reference());
        assert!(RelationKind::ManyToMany.requires_join_table());
        assert!(!RelationKind::None.is_relation());
        assert_eq!(RelationKind::ManyToMany.to_string(), "many-to-many");
    }

    #[test]
    fn test_dialect_parse() {
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("PostgreSQL".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("mysql".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert!("sqlite".parse::<Dialect>().is_err());
        assert!("".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_dialect_engine() {
        assert_eq!(Dialect::Postgres.engine(), "postgresql");
        assert_eq!(Dialect::MySql.engine(), "mysql");
        assert_eq!(Dialect::default(), Dialect::Postgres);
        assert_eq!(Dialect::MySql.to_string(), "mysql");
    }
}
