use serde_json::Value;

use super::FunctionalConstraint;
use super::walk::{all_operations, options, section_keys};
use crate::error::{ValidationError, rule};
use crate::schema::Schema;

/// `operation.resource` (e.g. `"contact.id"`) names a declared resource.
pub struct ResourceReferences;

impl FunctionalConstraint for ResourceReferences {
    fn name(&self) -> &'static str {
        "resource_references"
    }

    fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
        let resources = section_keys(definition, "resources");
        let mut errors = Vec::new();

        for operation in all_operations(definition) {
            let Some(reference) = operation.operation.get("resource") else {
                continue;
            };
            let Some(target) = reference.as_str().and_then(|r| r.split('.').next()) else {
                continue;
            };
            if resources.contains(target) {
                continue;
            }
            let message = if resources.is_empty() {
                "must match a \"key\" from a resource (no resources are declared)".to_owned()
            } else {
                format!(
                    "must match a \"key\" from a resource (options: {})",
                    options(resources.iter().copied())
                )
            };
            errors.push(ValidationError::new(
                rule::INVALID_REFERENCE,
                message,
                reference.clone(),
                operation.path.key("resource"),
            ));
        }
        errors
    }
}
