//! Model registry and relation resolution
//!
//! Relations are stored by name, not by pointer, so a relation may name a
//! model that was never declared. The registry is built once after a full
//! scan and checks every relation against the declared names before any SQL
//! is generated.

use crate::diagnostic::Diagnostic;
use crate::model::Model;
use modelsql_core::{EngineError, EngineResult, RelationKind};
use std::collections::HashMap;

// ============================================================================
// UnresolvedRelation
// ============================================================================

/// A relation field whose target cannot be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRelation {
    /// Owning model
    pub model: String,
    /// Relation field
    pub field: String,
    /// Relation kind of the field
    pub kind: RelationKind,
    /// Named target, if the declaration had a usable one
    pub target: Option<String>,
}

impl UnresolvedRelation {
    /// Why the relation could not be resolved
    pub fn reason(&self) -> String {
        match &self.target {
            Some(target) => format!("no model named '{}' was declared", target),
            None => "the relation target could not be determined".to_string(),
        }
    }

    /// Convert into the matching engine error
    pub fn to_error(&self) -> EngineError {
        EngineError::unresolved_relation(&self.model, &self.field, self.reason())
    }
}

impl std::fmt::Display for UnresolvedRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{}.{} -> {}", self.model, self.field, target),
            None => write!(f, "{}.{} -> ?", self.model, self.field),
        }
    }
}

// ============================================================================
// ModelRegistry
// ============================================================================

/// Name index over the models of one extraction run
#[derive(Debug, Clone)]
pub struct ModelRegistry<'a> {
    models: &'a [Model],
    /// Model name → index of its first declaration
    index: HashMap<&'a str, usize>,
    /// Names declared more than once, in order of the repeated declaration
    duplicates: Vec<&'a str>,
}

impl<'a> ModelRegistry<'a> {
    /// Build the registry. The first declaration of a name wins.
    pub fn new(models: &'a [Model]) -> Self {
        let mut index = HashMap::with_capacity(models.len());
        let mut duplicates = Vec::new();

        for (i, model) in models.iter().enumerate() {
            if index.contains_key(model.name.as_str()) {
                duplicates.push(model.name.as_str());
            } else {
                index.insert(model.name.as_str(), i);
            }
        }

        Self {
            models,
            index,
            duplicates,
        }
    }

    /// Check if a model with this name was declared
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get a model by name
    pub fn get(&self, name: &str) -> Option<&'a Model> {
        self.index.get(name).map(|&i| &self.models[i])
    }

    /// Number of distinct model names
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if no models were registered
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Names declared more than once
    pub fn duplicates(&self) -> &[&'a str] {
        &self.duplicates
    }

    /// Every relation field whose target is missing or undeclared
    pub fn unresolved(&self) -> Vec<UnresolvedRelation> {
        let mut out = Vec::new();
        for model in self.models {
            for field in model.fields.iter().filter(|f| f.is_relation()) {
                let resolved = field
                    .related_model
                    .as_deref()
                    .is_some_and(|target| self.contains(target));
                if !resolved {
                    out.push(UnresolvedRelation {
                        model: model.name.clone(),
                        field: field.name.clone(),
                        kind: field.relation,
                        target: field.related_model.clone(),
                    });
                }
            }
        }
        out
    }

    /// Fail if any relation is unresolved
    pub fn resolve(&self) -> EngineResult<()> {
        let unresolved = self.unresolved();
        match unresolved.as_slice() {
            [] => Ok(()),
            [single] => Err(single.to_error()),
            many => Err(EngineError::UnresolvedRelations(
                many.iter().map(ToString::to_string).collect(),
            )),
        }
    }

    /// Warnings for duplicate model names
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.duplicates
            .iter()
            .map(|name| {
                Diagnostic::warning(format!(
                    "model '{}' is declared more than once; the first declaration is used for relation lookups",
                    name
                ))
            })
            .collect()
    }

    /// Model indices ordered so that foreign-key and one-to-one targets come
    /// before the models that reference them.
    ///
    /// Ties keep extraction order. Unresolved and self references are
    /// ignored. When a cycle leaves no model ready, the earliest remaining
    /// model is emitted next.
    pub fn dependency_order(&self) -> Vec<usize> {
        let deps: Vec<Vec<usize>> = self
            .models
            .iter()
            .enumerate()
            .map(|(i, model)| {
                model
                    .column_references()
                    .filter_map(|f| f.related_model.as_deref())
                    .filter_map(|target| self.index.get(target).copied())
                    .filter(|&j| j != i)
                    .collect()
            })
            .collect();

        let mut emitted = vec![false; self.models.len()];
        let mut order = Vec::with_capacity(self.models.len());

        while order.len() < self.models.len() {
            let ready = (0..self.models.len())
                .find(|&i| !emitted[i] && deps[i].iter().all(|&d| emitted[d]));
            let next = match ready {
                Some(i) => i,
                None => match (0..self.models.len()).find(|&i| !emitted[i]) {
                    Some(i) => {
                        tracing::debug!(model = %self.models[i].name, "breaking dependency cycle");
                        i
                    }
                    None => break,
                },
            };
            emitted[next] = true;
            order.push(next);
        }

        order
    }
}

// ============================================================================
// Tests
// ============================================================================
