//! Replays the examples and anti-examples every schema ships with.

use serde::Serialize;
use serde_json::Value;

use crate::schema::Schema;
use crate::validate::AppValidator;
use crate::validator::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExampleKind {
    Example,
    AntiExample,
}

/// An example that produced errors, or an anti-example that produced none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleFailure {
    pub schema_id: String,
    pub kind: ExampleKind,
    pub index: usize,
    pub example: Value,
    /// Rendered errors for a failing example; the anti-example's reason otherwise.
    pub details: Vec<String>,
}

/// Checks one schema's examples through the full pipeline (structure,
/// constraints, refinement). Skipped anti-examples are not replayed.
///
/// # Errors
/// Returns an [`EngineError`] when the schema cannot be validated against at all.
pub fn check_examples(validator: &AppValidator, schema: &Schema) -> Result<Vec<ExampleFailure>, EngineError> {
    let mut failures = Vec::new();

    for (index, example) in schema.examples().iter().enumerate() {
        let outcome = validator.validate(schema.id(), example)?;
        if !outcome.valid {
            failures.push(ExampleFailure {
                schema_id: schema.id().to_owned(),
                kind: ExampleKind::Example,
                index,
                example: example.clone(),
                details: outcome.errors.iter().map(|e| e.stack()).collect(),
            });
        }
    }

    for (index, anti) in schema.anti_examples().iter().enumerate() {
        if anti.skip {
            continue;
        }
        let outcome = validator.validate(schema.id(), &anti.example)?;
        if outcome.valid {
            failures.push(ExampleFailure {
                schema_id: schema.id().to_owned(),
                kind: ExampleKind::AntiExample,
                index,
                example: anti.example.clone(),
                details: vec![anti.reason.clone()],
            });
        }
    }

    if !failures.is_empty() {
        tracing::debug!("{} example(s) of {} misbehave", failures.len(), schema.id());
    }
    Ok(failures)
}

/// [`check_examples`] over every registered schema, in registration order.
///
/// # Errors
/// See [`check_examples`].
pub fn check_catalog(validator: &AppValidator) -> Result<Vec<ExampleFailure>, EngineError> {
    let mut failures = Vec::new();
    for schema in validator.registry().schemas() {
        failures.extend(check_examples(validator, schema)?);
    }
    Ok(failures)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::SchemaConfig;
    use crate::constraints::ConstraintEngine;
    use crate::registry::SchemaRegistry;
    use serde_json::json;

    #[test]
    fn test_builtin_catalog_examples_hold() {
        let validator = AppValidator::builtin(SchemaConfig::default()).unwrap();
        let failures = check_catalog(&validator).unwrap();
        assert!(failures.is_empty(), "misbehaving examples: {failures:#?}");
    }

    #[test]
    fn test_reports_both_directions() {
        let schema = Schema::define(
            json!({
                "id": "/ColorSchema",
                "type": "string",
                "enum": ["red", "green"],
                "examples": ["red", "blue"],
                "antiExamples": [
                    {"example": "green", "reason": "Pretend green is not allowed."},
                    {"example": "green", "reason": "Known gap.", "skip": true},
                    {"example": 1, "reason": "Must be a string."}
                ]
            }),
            &[],
        )
        .unwrap();
        let registry = SchemaRegistry::from_schemas(vec![schema]).unwrap();
        let validator = AppValidator::new(registry, ConstraintEngine::builtin(), SchemaConfig::default());

        let failures = check_catalog(&validator).unwrap();
        assert_eq!(failures.len(), 2);

        assert_eq!(failures[0].kind, ExampleKind::Example);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[0].details, vec!["instance is not one of enum values: red,green"]);

        assert_eq!(failures[1].kind, ExampleKind::AntiExample);
        assert_eq!(failures[1].index, 0);
        assert_eq!(failures[1].details, vec!["Pretend green is not allowed."]);
    }
}
