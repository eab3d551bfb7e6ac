use serde_json::Value;

use super::FunctionalConstraint;
use super::walk::{all_operations, input_fields};
use crate::error::{ValidationError, rule};
use crate::schema::Schema;

/// Defaults are written as strings; for typed fields the string has to parse
/// as that type. This is the only check that converts a value between types.
pub struct FieldDefaultTypes;

fn parses_as(kind: &str, raw: &str) -> Option<bool> {
    let raw = raw.trim();
    match kind {
        "integer" => Some(raw.parse::<i64>().is_ok()),
        "number" => Some(raw.parse::<f64>().is_ok_and(f64::is_finite)),
        "boolean" => Some(matches!(raw, "true" | "false")),
        _ => None,
    }
}

impl FunctionalConstraint for FieldDefaultTypes {
    fn name(&self) -> &'static str {
        "field_default_types"
    }

    fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for operation in all_operations(definition) {
            for field in input_fields(&operation) {
                let Some(kind) = field.field.get("type").and_then(Value::as_str) else {
                    continue;
                };
                let Some(default) = field.field.get("default").and_then(Value::as_str) else {
                    continue;
                };
                if parses_as(kind, default) == Some(false) {
                    errors.push(ValidationError::new(
                        rule::INVALID_DEFAULT,
                        format!("must be a valid {kind} to match the field's \"type\" (found \"{default}\")"),
                        Value::String(default.to_owned()),
                        field.path.key("default"),
                    ));
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
    fn test_parses_as() {
        assert_eq!(parses_as("integer", "10"), Some(true));
        assert_eq!(parses_as("integer", "1.5"), Some(false));
        assert_eq!(parses_as("number", "1.5"), Some(true));
        assert_eq!(parses_as("number", "NaN"), Some(false));
        assert_eq!(parses_as("boolean", "true"), Some(true));
        assert_eq!(parses_as("boolean", "yes"), Some(false));
        assert_eq!(parses_as("string", "anything"), None);
    }

    #[test]
    fn test_mismatched_default() {
        let def = json!({"creates": {"c": {"operation": {"inputFields": [
            {"key": "count", "type": "integer", "default": "10"},
            {"key": "limit", "type": "integer", "default": "ten"},
            {"key": "name", "type": "string", "default": "ten"}
        ]}}}});
        let errors = FieldDefaultTypes.check(&def, &app_root());
        assert_eq!(
            stacks(&errors),
            vec!["instance.creates.c.operation.inputFields[1].default must be a valid integer to match the field's \"type\" (found \"ten\")"]
        );
        assert_eq!(errors[0].name, rule::INVALID_DEFAULT);
    }
}
