use serde_json::Value;
use std::collections::HashMap;

use super::FunctionalConstraint;
use super::walk::{all_operations, input_fields};
use crate::error::{ValidationError, rule};
use crate::schema::Schema;

/// Input field keys are unique within an operation, children included.
pub struct UniqueInputFieldKeys;

impl FunctionalConstraint for UniqueInputFieldKeys {
    fn name(&self) -> &'static str {
        "unique_input_field_keys"
    }

    fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for operation in all_operations(definition) {
            let mut first_use: HashMap<&str, String> = HashMap::new();
            for field in input_fields(&operation) {
                let Some(key) = field.field.get("key").and_then(Value::as_str) else {
                    continue;
                };
                let relative = field.path.relative();
                match first_use.get(key) {
                    Some(first) => errors.push(ValidationError::new(
                        rule::DUPLICATE,
                        format!("must be unique across inputFields and their children (\"{key}\" is already used at {first})"),
                        Value::String(key.to_owned()),
                        field.path.key("key"),
                    )),
                    None => {
                        first_use.insert(key, relative);
                    }
                }
            }
        }
        errors
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::constraints::tests_support::{app_root, stacks};
    use serde_json::json;

    #[test]
    fn test_unique_keys_pass() {
        let def = json!({"creates": {"foo": {"operation": {"inputFields": [
            {"key": "a"},
            {"key": "b", "children": [{"key": "c"}]}
        ]}}}});
        assert!(UniqueInputFieldKeys.check(&def, &app_root()).is_empty());
    }

    #[test]
    fn test_duplicate_child_key_path() {
        let def = json!({"creates": {"foo": {"operation": {"inputFields": [
            {"key": "name"},
            {"key": "items", "children": [{"key": "name"}]}
        ]}}}});
        let errors = UniqueInputFieldKeys.check(&def, &app_root());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path(), "creates.foo.operation.inputFields[1].children[0].key");
        assert_eq!(
            stacks(&errors),
            vec!["instance.creates.foo.operation.inputFields[1].children[0].key must be unique across inputFields and their children (\"name\" is already used at creates.foo.operation.inputFields[0])"]
        );
    }

    #[test]
    fn test_keys_are_scoped_per_operation() {
        let def = json!({
            "creates": {"a": {"operation": {"inputFields": [{"key": "name"}]}}},
            "searches": {"b": {"operation": {"inputFields": [{"key": "name"}]}}}
        });
        assert!(UniqueInputFieldKeys.check(&def, &app_root()).is_empty());
    }
}
