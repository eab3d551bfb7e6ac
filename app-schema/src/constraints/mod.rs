//! Whole-definition checks that a structural schema cannot express.
//!
//! Constraints run after the structural pass, in registration order, and
//! never short-circuit each other. A constraint reports what it can see: keys
//! it looks up that do not exist yet mean there is nothing to check.

use serde_json::Value;
use std::fmt;

use crate::catalog::ids;
use crate::error::ValidationError;
use crate::schema::Schema;

mod buffered_create;
mod deep_nested_fields;
mod field_default_types;
mod input_field_groups;
mod matching_keys;
mod mutually_exclusive_fields;
mod polling_throttle;
mod required_samples;
mod resource_references;
mod search_or_create_keys;
mod unique_input_field_keys;
pub mod walk;

pub use buffered_create::BufferedCreate;
pub use deep_nested_fields::DeepNestedFields;
pub use field_default_types::FieldDefaultTypes;
pub use input_field_groups::InputFieldGroups;
pub use matching_keys::MatchingKeys;
pub use mutually_exclusive_fields::MutuallyExclusiveFields;
pub use polling_throttle::PollingThrottle;
pub use required_samples::RequiredSamples;
pub use resource_references::ResourceReferences;
pub use search_or_create_keys::SearchOrCreateKeys;
pub use unique_input_field_keys::UniqueInputFieldKeys;

/// A stateless semantic check over the whole definition.
pub trait FunctionalConstraint: Send + Sync {
    fn name(&self) -> &'static str;

    /// Constraints describe app definitions, so by default they only run when
    /// validating against the app schema itself.
    fn applies_to(&self, root: &Schema) -> bool {
        root.id() == ids::APP
    }

    fn check(&self, definition: &Value, root: &Schema) -> Vec<ValidationError>;
}

/// Ordered list of constraints, injected at construction time.
pub struct ConstraintEngine {
    constraints: Vec<Box<dyn FunctionalConstraint>>,
}

impl ConstraintEngine {
    #[must_use]
    pub fn new(constraints: Vec<Box<dyn FunctionalConstraint>>) -> Self {
        Self { constraints }
    }

    /// The built-in checks; their order is the order errors are reported in.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            Box::new(MatchingKeys),
            Box::new(MutuallyExclusiveFields),
            Box::new(DeepNestedFields),
            Box::new(RequiredSamples),
            Box::new(SearchOrCreateKeys),
            Box::new(InputFieldGroups),
            Box::new(UniqueInputFieldKeys),
            Box::new(ResourceReferences),
            Box::new(BufferedCreate),
            Box::new(PollingThrottle),
            Box::new(FieldDefaultTypes),
        ])
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.constraints.iter().map(|c| c.name()).collect()
    }

    /// Runs every applicable constraint and concatenates their errors.
    #[must_use]
    pub fn run(&self, definition: &Value, root: &Schema) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for constraint in self.constraints.iter().filter(|c| c.applies_to(root)) {
            let found = constraint.check(definition, root);
            if !found.is_empty() {
                tracing::debug!("Constraint {} reported {} error(s)", constraint.name(), found.len());
            }
            errors.extend(found);
        }
        errors
    }
}

impl Default for ConstraintEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ConstraintEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintEngine")
            .field("constraints", &self.names())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests_support {
    use super::ids;
    use crate::error::ValidationError;
    use crate::schema::Schema;
    use serde_json::json;

    pub fn app_root() -> Schema {
        Schema::define(json!({"id": ids::APP, "type": "object"}), &[]).unwrap()
    }

    pub fn stacks(errors: &[ValidationError]) -> Vec<String> {
        errors.iter().map(ValidationError::stack).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::tests_support::app_root;
    use super::*;
    use crate::error::rule;
    use crate::path::PropertyPath;
    use serde_json::json;

    struct Always(&'static str);

    impl FunctionalConstraint for Always {
        fn name(&self) -> &'static str {
            self.0
        }

        fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
            vec![ValidationError::new(
                rule::INVALID,
                self.0,
                definition.clone(),
                PropertyPath::root(),
            )]
        }
    }

    #[test]
    fn test_run_concatenates_in_order() {
        let engine = ConstraintEngine::new(vec![Box::new(Always("first")), Box::new(Always("second"))]);
        let errors = engine.run(&json!({}), &app_root());
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_constraints_skip_other_roots() {
        let engine = ConstraintEngine::new(vec![Box::new(Always("first"))]);
        let other = Schema::define(json!({"id": "/FieldSchema", "type": "object"}), &[]).unwrap();
        assert!(engine.run(&json!({}), &other).is_empty());
    }

    #[test]
    fn test_builtin_order() {
        assert_eq!(
            ConstraintEngine::builtin().names(),
            vec![
                "matching_keys",
                "mutually_exclusive_fields",
                "deep_nested_fields",
                "required_samples",
                "search_or_create_keys",
                "input_field_groups",
                "unique_input_field_keys",
                "resource_references",
                "buffered_create",
                "polling_throttle",
                "field_default_types",
            ]
        );
    }
}
