use serde_json::Value;

use super::FunctionalConstraint;
use super::walk::{ACTION_TYPES, OperationRef, action_operations, has_sample, resource_operations};
use crate::error::{ValidationError, rule};
use crate::schema::Schema;

/// Visible operations need a sample, either their own or one inherited from
/// a resource.
pub struct RequiredSamples;

impl RequiredSamples {
    fn inherits_sample(definition: &Value, operation: &OperationRef<'_>) -> bool {
        if let Some(resource) = operation.resource {
            return has_sample(resource.get("sample"));
        }

        // `operation.resource` looks like "contact.id"; the resource key is
        // everything before the first dot.
        operation
            .operation
            .get("resource")
            .and_then(Value::as_str)
            .and_then(|r| r.split('.').next())
            .and_then(|key| definition.get("resources")?.get(key))
            .is_some_and(|resource| has_sample(resource.get("sample")))
    }
}

impl FunctionalConstraint for RequiredSamples {
    fn name(&self) -> &'static str {
        "required_samples"
    }

    fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
        let operations = ACTION_TYPES
            .iter()
            .flat_map(|action_type| action_operations(definition, action_type))
            .chain(resource_operations(definition));

        operations
            .filter(|op| !op.is_hidden())
            .filter(|op| !has_sample(op.operation.get("sample")))
            .filter(|op| !Self::inherits_sample(definition, op))
            .map(|op| {
                ValidationError::new(
                    rule::MISSING,
                    "requires \"sample\", because it's not hidden",
                    Value::Object(op.operation.clone()),
                    op.path,
                )
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::constraints::tests_support::{app_root, stacks};
    use serde_json::json;

    #[test]
    fn test_visible_operation_without_sample() {
        let def = json!({
            "triggers": {
                "visible": {"display": {"label": "Visible"}, "operation": {"perform": {}}},
                "hidden": {"display": {"hidden": true}, "operation": {"perform": {}}},
                "sampled": {"display": {}, "operation": {"perform": {}, "sample": {"id": 1}}}
            }
        });
        let errors = RequiredSamples.check(&def, &app_root());
        assert_eq!(
            stacks(&errors),
            vec!["instance.triggers.visible.operation requires \"sample\", because it's not hidden"]
        );
        assert_eq!(errors[0].name, rule::MISSING);
    }

    #[test]
    fn test_empty_sample_does_not_count() {
        let def = json!({"searches": {"find": {"operation": {"sample": {}}}}});
        assert_eq!(RequiredSamples.check(&def, &app_root()).len(), 1);
    }

    #[test]
    fn test_sample_inherited_from_referenced_resource() {
        let def = json!({
            "resources": {"contact": {"key": "contact", "sample": {"id": 1}}},
            "creates": {"add": {"operation": {"resource": "contact.id", "perform": {}}}}
        });
        assert!(RequiredSamples.check(&def, &app_root()).is_empty());
    }

    #[test]
    fn test_resource_methods_inherit_resource_sample() {
        let with_sample = json!({"resources": {"contact": {
            "sample": {"id": 1},
            "get": {"display": {}, "operation": {"perform": {}}},
            "list": {"display": {}, "operation": {"perform": {}}}
        }}});
        assert!(RequiredSamples.check(&with_sample, &app_root()).is_empty());

        let without = json!({"resources": {"contact": {
            "list": {"display": {}, "operation": {"perform": {}}}
        }}});
        assert_eq!(
            stacks(&RequiredSamples.check(&without, &app_root())),
            vec!["instance.resources.contact.list.operation requires \"sample\", because it's not hidden"]
        );
    }
}
