use serde_json::Value;
use std::collections::BTreeSet;

use super::FunctionalConstraint;
use super::walk::{all_operations, input_fields, options};
use crate::error::{ValidationError, rule};
use crate::schema::Schema;

/// Group keys of an operation are unique, and every field `group` names one
/// of them.
pub struct InputFieldGroups;

impl FunctionalConstraint for InputFieldGroups {
    fn name(&self) -> &'static str {
        "input_field_groups"
    }

    fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for operation in all_operations(definition) {
            let mut groups = BTreeSet::new();
            let declared = operation
                .operation
                .get("inputFieldGroups")
                .and_then(Value::as_array);
            let groups_path = operation.path.key("inputFieldGroups");

            for (idx, group) in declared.into_iter().flatten().enumerate() {
                let Some(key) = group.get("key").and_then(Value::as_str) else {
                    continue;
                };
                if !groups.insert(key) {
                    errors.push(ValidationError::new(
                        rule::DUPLICATE,
                        format!("must have a unique \"key\" (\"{key}\" is used more than once)"),
                        group.clone(),
                        groups_path.index(idx).key("key"),
                    ));
                }
            }

            for field in input_fields(&operation) {
                let Some(group) = field.field.get("group") else {
                    continue;
                };
                let Some(name) = group.as_str() else {
                    continue;
                };
                if groups.contains(name) {
                    continue;
                }
                let message = if groups.is_empty() {
                    "must match a \"key\" from inputFieldGroups (no groups are declared)".to_owned()
                } else {
                    format!(
                        "must match a \"key\" from inputFieldGroups (options: {})",
                        options(groups.iter().copied())
                    )
                };
                errors.push(ValidationError::new(
                    rule::INVALID_REFERENCE,
                    message,
                    group.clone(),
                    field.path.key("group"),
                ));
            }
        }
        errors
    }
}
