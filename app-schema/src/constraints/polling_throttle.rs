use serde_json::Value;

use super::FunctionalConstraint;
use super::walk::action_operations;
use crate::error::{ValidationError, rule};
use crate::schema::Schema;

const POLLING_THROTTLE_KEYS: [&str; 4] = ["window", "limit", "key", "scope"];

/// Polling triggers only honour part of the throttle configuration.
pub struct PollingThrottle;

impl FunctionalConstraint for PollingThrottle {
    fn name(&self) -> &'static str {
        "polling_throttle"
    }

    fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for operation in action_operations(definition, "triggers") {
            let op = operation.operation;
            let polling = op
                .get("type")
                .and_then(Value::as_str)
                .is_none_or(|kind| kind == "polling");
            if !polling {
                continue;
            }
            let Some(throttle) = op.get("throttle").and_then(Value::as_object) else {
                continue;
            };

            for (key, value) in throttle {
                if !POLLING_THROTTLE_KEYS.contains(&key.as_str()) {
                    errors.push(ValidationError::new(
                        rule::INVALID,
                        format!(
                            "must not be set on a polling trigger's throttle (allowed: {})",
                            POLLING_THROTTLE_KEYS.join(", ")
                        ),
                        value.clone(),
                        operation.path.key("throttle").key(key),
                    ));
                }
            }
        }
        errors
    }
}
