use serde_json::Value;

use super::FunctionalConstraint;
use super::walk::action_operations;
use crate::error::{ValidationError, rule};
use crate::schema::Schema;

/// A create performs either one record at a time (`perform`) or in batches
/// (`buffer` together with `performBuffer`), never both.
pub struct BufferedCreate;

impl FunctionalConstraint for BufferedCreate {
    fn name(&self) -> &'static str {
        "buffered_create"
    }

    fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for operation in action_operations(definition, "creates") {
            let op = operation.operation;
            let perform = op.contains_key("perform");
            let buffer = op.contains_key("buffer");
            let perform_buffer = op.contains_key("performBuffer");

            let problem = match (perform, buffer, perform_buffer) {
                (true, false, false) | (false, true, true) => continue,
                (true, _, _) => (
                    rule::INVALID,
                    "must contain either \"perform\" or \"buffer\" with \"performBuffer\", not both",
                ),
                (false, true, false) => (rule::MISSING, "must contain \"performBuffer\" because \"buffer\" is present"),
                (false, false, true) => (rule::MISSING, "must contain \"buffer\" because \"performBuffer\" is present"),
                (false, false, false) => (
                    rule::MISSING,
                    "requires either \"perform\" or \"buffer\" with \"performBuffer\"",
                ),
            };

            errors.push(ValidationError::new(
                problem.0,
                problem.1,
                Value::Object(op.clone()),
                operation.path,
            ));
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

    fn check(operation: &Value) -> Vec<String> {
        let def = json!({"creates": {"add": {"key": "add", "operation": operation}}});
        stacks(&BufferedCreate.check(&def, &app_root()))
    }

    #[test]
    fn test_single_or_buffered_is_fine() {
        assert!(check(&json!({"perform": {"url": "https://x"}})).is_empty());
        assert!(
            check(&json!({"buffer": {"groupedBy": ["a"], "limit": 10}, "performBuffer": "$func$0$f$"})).is_empty()
        );
    }

    #[test]
    fn test_both_modes() {
        assert_eq!(
            check(&json!({"perform": {}, "buffer": {}, "performBuffer": "$func$0$f$"})),
            vec!["instance.creates.add.operation must contain either \"perform\" or \"buffer\" with \"performBuffer\", not both"]
        );
    }

    #[test]
    fn test_incomplete_buffer() {
        assert_eq!(
            check(&json!({"buffer": {}})),
            vec!["instance.creates.add.operation must contain \"performBuffer\" because \"buffer\" is present"]
        );
        assert_eq!(
            check(&json!({"performBuffer": "$func$0$f$"})),
            vec!["instance.creates.add.operation must contain \"buffer\" because \"performBuffer\" is present"]
        );
    }

    #[test]
    fn test_neither_mode() {
        assert_eq!(
            check(&json!({"sample": {"id": 1}})),
            vec!["instance.creates.add.operation requires either \"perform\" or \"buffer\" with \"performBuffer\""]
        );
    }
}
