use serde_json::Value;

use super::FunctionalConstraint;
use super::walk::{all_operations, input_fields};
use crate::error::{ValidationError, rule};
use crate::schema::Schema;

/// Line-item children may not declare children of their own.
pub struct DeepNestedFields;

impl FunctionalConstraint for DeepNestedFields {
    fn name(&self) -> &'static str {
        "deep_nested_fields"
    }

    fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
        all_operations(definition)
            .iter()
            .flat_map(input_fields)
            .filter(|field| field.depth > 0 && field.field.contains_key("children"))
            .map(|field| {
                ValidationError::new(
                    rule::DEEP_NESTING,
                    "must not contain deeply nested child fields. One level max.",
                    Value::Object(field.field.clone()),
                    field.path,
                )
            })
            .collect()
    }
}
