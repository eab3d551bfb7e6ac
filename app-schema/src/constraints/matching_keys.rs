use serde_json::Value;

use super::FunctionalConstraint;
use super::walk::{ACTION_TYPES, entries};
use crate::error::{ValidationError, rule};
use crate::schema::Schema;

/// The map key of every action must equal the action's own `key`.
pub struct MatchingKeys;

impl FunctionalConstraint for MatchingKeys {
    fn name(&self) -> &'static str {
        "matching_keys"
    }

    fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for action_type in ACTION_TYPES {
            for (outer, action, path) in entries(definition, action_type) {
                let Some(inner) = action.get("key").and_then(Value::as_str) else {
                    continue;
                };
                if inner != outer {
                    errors.push(ValidationError::new(
                        rule::INVALID_KEY,
                        format!("must have a matching top-level key (found \"{outer}\" and \"{inner}\")"),
                        Value::String(inner.to_owned()),
                        path.key("key"),
                    ));
                }
            }
        }
        errors
    }
}
