use serde_json::Value;

use super::FunctionalConstraint;
use super::walk::{all_operations, input_fields};
use crate::error::{ValidationError, rule};
use crate::schema::Schema;

/// Field properties that cannot be combined on one input field.
const EXCLUSIVE_PAIRS: [(&str, &str); 9] = [
    ("children", "list"),
    ("children", "dict"),
    ("children", "type"),
    ("children", "placeholder"),
    ("children", "helpText"),
    ("children", "default"),
    ("dict", "list"),
    ("dynamic", "dict"),
    ("dynamic", "choices"),
];

/// Only an explicit `false` switches an option off; `""` and `0` still count.
fn is_set(value: &Value) -> bool {
    !matches!(value, Value::Bool(false))
}

pub struct MutuallyExclusiveFields;

impl FunctionalConstraint for MutuallyExclusiveFields {
    fn name(&self) -> &'static str {
        "mutually_exclusive_fields"
    }

    fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for operation in all_operations(definition) {
            for field in input_fields(&operation) {
                for (a, b) in EXCLUSIVE_PAIRS {
                    let both = field.field.get(a).is_some_and(is_set) && field.field.get(b).is_some_and(is_set);
                    if both {
                        errors.push(ValidationError::new(
                            rule::INVALID,
                            format!("must not contain {a} and {b}, as they're mutually exclusive."),
                            Value::Object(field.field.clone()),
                            field.path.clone(),
                        ));
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

    fn create_with_fields(fields: &Value) -> Value {
        json!({"creates": {"foo": {"key": "foo", "operation": {"inputFields": fields}}}})
    }

    #[test]
    fn test_children_and_list() {
        let def = create_with_fields(&json!([
            {"key": "name"},
            {"key": "line_items", "children": [{"key": "product"}], "list": true}
        ]));
        let errors = MutuallyExclusiveFields.check(&def, &app_root());
        assert_eq!(
            stacks(&errors),
            vec!["instance.creates.foo.operation.inputFields[1] must not contain children and list, as they're mutually exclusive."]
        );
    }

    #[test]
    fn test_falsy_booleans_are_exempt() {
        let def = create_with_fields(&json!([
            {"key": "a", "children": [{"key": "b"}], "list": false},
            {"key": "c", "dict": false, "list": true}
        ]));
        assert!(MutuallyExclusiveFields.check(&def, &app_root()).is_empty());
    }

    #[test]
    fn test_empty_values_still_conflict() {
        let def = create_with_fields(&json!([
            {"key": "a", "children": [{"key": "b"}], "default": ""},
            {"key": "c", "children": [{"key": "d"}], "placeholder": 0}
        ]));
        let errors = MutuallyExclusiveFields.check(&def, &app_root());
        assert_eq!(
            stacks(&errors),
            vec![
                "instance.creates.foo.operation.inputFields[0] must not contain children and default, as they're mutually exclusive.",
                "instance.creates.foo.operation.inputFields[1] must not contain children and placeholder, as they're mutually exclusive.",
            ]
        );
    }

    #[test]
    fn test_children_are_checked() {
        let def = create_with_fields(&json!([
            {"key": "a"},
            {"key": "b", "children": [{"key": "c", "dynamic": "contacts.id.name", "choices": ["x"]}]}
        ]));
        let errors = MutuallyExclusiveFields.check(&def, &app_root());
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].path(),
            "creates.foo.operation.inputFields[1].children[0]"
        );
        assert_eq!(
            errors[0].message,
            "must not contain dynamic and choices, as they're mutually exclusive."
        );
    }

    #[test]
    fn test_multiple_pairs_on_one_field() {
        let def = create_with_fields(&json!([
            {"key": "a", "dict": true, "list": true, "dynamic": "x.id"}
        ]));
        let errors = MutuallyExclusiveFields.check(&def, &app_root());
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "must not contain dict and list, as they're mutually exclusive.",
                "must not contain dynamic and dict, as they're mutually exclusive.",
            ]
        );
    }
}
