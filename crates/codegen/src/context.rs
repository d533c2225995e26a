//! # Generation Context
//!
//! The `GenerationContext` holds everything the individual generators need:
//! the models in table order, the query fragments, the dialect and the one
//! migration timestamp shared by every artifact of the run.

use modelsql_core::Dialect;
use modelsql_ir::{ExtractionResult, Model, ModelRegistry, UnresolvedRelation};

use crate::{GeneratorConfig, TableOrder};

/// `strftime` pattern of the migration timestamp token
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

// ============================================================================
// GenerationContext
// ============================================================================

/// Context carrying all information needed for generation.
///
/// Built once per run and shared by reference with every generator.
#[derive(Debug, Clone)]
pub struct GenerationContext<'a> {
    result: &'a ExtractionResult,
    registry: ModelRegistry<'a>,
    /// Indices into `result.models` in table order
    order: Vec<usize>,
    config: GeneratorConfig,
    /// Migration timestamp token (`YYYYMMDDHHMMSS`)
    timestamp: String,
}

impl<'a> GenerationContext<'a> {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Build the context for one run
    pub fn new(result: &'a ExtractionResult, config: GeneratorConfig) -> Self {
        let registry = ModelRegistry::new(&result.models);

        let order = match config.table_order {
            TableOrder::Extraction => (0..result.models.len()).collect(),
            TableOrder::Dependency => registry.dependency_order(),
        };

        let timestamp = config
            .timestamp
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string());

        Self {
            result,
            registry,
            order,
            config,
            timestamp,
        }
    }

    /// Build with default generator config (convenience for tests)
    pub fn from_result_default(result: &'a ExtractionResult) -> Self {
        Self::new(result, GeneratorConfig::default())
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    /// Models in table order
    pub fn models(&self) -> impl DoubleEndedIterator<Item = &'a Model> + '_ {
        let result: &'a ExtractionResult = self.result;
        self.order.iter().map(move |&i| &result.models[i])
    }

    /// Number of models
    pub fn model_count(&self) -> usize {
        self.order.len()
    }

    /// Collected query fragments
    pub fn queries(&self) -> &'a [String] {
        let result: &'a ExtractionResult = self.result;
        &result.queries
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    pub fn table_order(&self) -> TableOrder {
        self.config.table_order
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Migration timestamp token shared by the up/down pair
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Name index over the models
    pub fn registry(&self) -> &ModelRegistry<'a> {
        &self.registry
    }

    /// Relation fields whose target is missing or undeclared
    pub fn unresolved_relations(&self) -> Vec<UnresolvedRelation> {
        self.registry.unresolved()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use modelsql_ir::Field;

    fn result() -> ExtractionResult {
        ExtractionResult::new(
            vec![
                Model::new("Book").with_field(Field::foreign_key("author", "Author")),
                Model::new("Author"),
            ],
            vec!["-- from: v.py\n-- Book.objects.get(id=1)".to_string()],
        )
    }

    fn names<'a>(ctx: &GenerationContext<'a>) -> Vec<&'a str> {
        ctx.models().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_extraction_order() {
        let result = result();
        let ctx = GenerationContext::from_result_default(&result);
        assert_eq!(names(&ctx), vec!["Book", "Author"]);
        assert_eq!(ctx.model_count(), 2);
        assert_eq!(ctx.queries().len(), 1);
        assert_eq!(ctx.dialect(), Dialect::Postgres);
    }

    #[test]
    fn test_dependency_order() {
        let result = result();
        let config = GeneratorConfig::new().with_table_order(TableOrder::Dependency);
        let ctx = GenerationContext::new(&result, config);
        assert_eq!(names(&ctx), vec!["Author", "Book"]);
        assert_eq!(ctx.models().rev().next().map(|m| m.name.as_str()), Some("Book"));
    }

    #[test]
    fn test_timestamp_token() {
        let result = result();
        let ctx = GenerationContext::from_result_default(&result);
        assert_eq!(ctx.timestamp().len(), 14);
        assert!(ctx.timestamp().chars().all(|c| c.is_ascii_digit()));

        let pinned = GenerationContext::new(&result, GeneratorConfig::new().with_timestamp("20240101000000"));
        assert_eq!(pinned.timestamp(), "20240101000000");
    }

    #[test]
    fn test_unresolved_relations() {
        let result = ExtractionResult::new(
            vec![Model::new("Book").with_field(Field::foreign_key("author", "Author"))],
            vec![],
        );
        let ctx = GenerationContext::from_result_default(&result);
        assert_eq!(ctx.unresolved_relations().len(), 1);
        assert!(!ctx.registry().contains("Author"));
    }
}
