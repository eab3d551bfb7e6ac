use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use crate::error::{Candidate, ErrorArgument, ValidationError, rule};
use crate::path::PropertyPath;
use crate::registry::SchemaRegistry;
use crate::schema::{AdditionalProperties, Composite, CompositeKind, Schema, SchemaError, SchemaNode};

/// Failures of the engine itself, as opposed to problems in the definition.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Schema '{0}' is not registered")]
    UnknownSchema(String),
    #[error("Reference '{reference}' is not reachable from root schema '{root}'")]
    UnresolvedRef { root: String, reference: String },
    #[error(transparent)]
    Catalog(#[from] SchemaError),
}

/// `$ref` targets currently being expanded, keyed by the path they were
/// entered at.
type ActiveRefs = HashSet<(String, PropertyPath)>;

/// Walks a definition alongside a root schema and collects structural errors.
/// `$ref`s resolve only within the root's dependency closure.
pub struct StructuralValidator<'a> {
    registry: &'a SchemaRegistry,
    root: Arc<Schema>,
    scope: HashSet<String>,
}

impl<'a> StructuralValidator<'a> {
    /// # Errors
    /// Returns [`EngineError::UnknownSchema`] when `root_id` is not registered,
    /// or [`EngineError::Catalog`] when its closure cannot be computed.
    pub fn new(registry: &'a SchemaRegistry, root_id: &str) -> Result<Self, EngineError> {
        let root = registry
            .get(root_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownSchema(root_id.to_owned()))?;
        let scope = registry.closure(root_id)?;
        Ok(Self {
            registry,
            root,
            scope,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Arc<Schema> {
        &self.root
    }

    /// # Errors
    /// Returns [`EngineError::UnresolvedRef`] when `reference` is outside the
    /// root schema's closure.
    pub fn resolve(&self, reference: &str) -> Result<&Arc<Schema>, EngineError> {
        self.scope
            .contains(reference)
            .then(|| self.registry.get(reference))
            .flatten()
            .ok_or_else(|| EngineError::UnresolvedRef {
                root: self.root.id().to_owned(),
                reference: reference.to_owned(),
            })
    }

    /// Validates `instance` against the root schema.
    ///
    /// # Errors
    /// Returns an [`EngineError`] when a `$ref` cannot be resolved.
    pub fn validate(&self, instance: &Value) -> Result<Vec<ValidationError>, EngineError> {
        self.validate_node(instance, self.root.root(), &PropertyPath::root())
    }

    /// Validates `instance` against any node of the closure, reporting errors
    /// under `path`.
    ///
    /// # Errors
    /// Returns an [`EngineError`] when a `$ref` cannot be resolved.
    pub fn validate_node(
        &self,
        instance: &Value,
        node: &SchemaNode,
        path: &PropertyPath,
    ) -> Result<Vec<ValidationError>, EngineError> {
        let mut errors = Vec::new();
        let mut active = ActiveRefs::new();
        self.visit(instance, node, path, &mut active, &mut errors)?;
        tracing::debug!(
            "Validated {} against {}: {} error(s)",
            path,
            node.id.as_deref().unwrap_or("inline schema"),
            errors.len()
        );
        Ok(errors)
    }

    fn visit(
        &self,
        instance: &Value,
        node: &SchemaNode,
        path: &PropertyPath,
        active: &mut ActiveRefs,
        errors: &mut Vec<ValidationError>,
    ) -> Result<(), EngineError> {
        if let Some(reference) = &node.reference {
            let target = self.resolve(reference)?;
            let key = (reference.clone(), path.clone());
            // Re-entering a reference at the same path would never consume input;
            // the branch fails instead of passing vacuously.
            if !active.insert(key.clone()) {
                errors.push(raise(
                    node,
                    instance,
                    path,
                    rule::REF_LOOP,
                    format!("cannot be validated: {reference} refers back to itself at this property"),
                ));
                return Ok(());
            }
            let result = self.visit(instance, target.root(), path, active, errors);
            active.remove(&key);
            return result;
        }

        if !node.types.is_empty() && !node.types.iter().any(|ty| ty.matches(instance)) {
            let names: Vec<&str> = node.types.iter().map(|ty| ty.as_str()).collect();
            errors.push(
                raise(node, instance, path, rule::TYPE, format!("is not of a type(s) {}", names.join(",")))
                    .with_argument(ErrorArgument::Value(Value::from(names))),
            );
            return Ok(());
        }

        if let Some(values) = &node.enum_values
            && !values.contains(instance)
        {
            errors.push(raise(
                node,
                instance,
                path,
                rule::ENUM,
                format!("is not one of enum values: {}", render_enum(values)),
            ));
        }

        match instance {
            Value::String(s) => check_string(node, s, instance, path, errors),
            Value::Number(_) => check_number(node, instance, path, errors),
            Value::Array(items) => {
                check_array_bounds(node, items.len(), instance, path, errors);
                if let Some(item_node) = &node.items {
                    for (idx, item) in items.iter().enumerate() {
                        self.visit(item, item_node, &path.index(idx), active, errors)?;
                    }
                }
            }
            Value::Object(map) => self.check_object(node, map, instance, path, active, errors)?,
            Value::Bool(_) | Value::Null => {}
        }

        if let Some(composite) = &node.composite {
            self.check_composite(node, composite, instance, path, active, errors)?;
        }
        Ok(())
    }

    fn check_object(
        &self,
        node: &SchemaNode,
        map: &Map<String, Value>,
        instance: &Value,
        path: &PropertyPath,
        active: &mut ActiveRefs,
        errors: &mut Vec<ValidationError>,
    ) -> Result<(), EngineError> {
        if let Some(min) = node.min_properties
            && map.len() < min
        {
            errors.push(raise(
                node,
                instance,
                path,
                rule::MIN_PROPERTIES,
                format!("does not meet minimum property length of {min}"),
            ));
        }

        for name in &node.required {
            if !map.contains_key(name) {
                errors.push(
                    raise(node, instance, path, rule::REQUIRED, format!("requires property {}", quote(name)))
                        .with_argument(ErrorArgument::Value(Value::String(name.clone()))),
                );
            }
        }

        for (key, value) in map {
            let child = path.key(key);
            let mut covered = false;

            if let Some(prop) = node.properties.get(key) {
                covered = true;
                self.visit(value, prop, &child, active, errors)?;
            }
            for pattern_prop in &node.pattern_properties {
                if pattern_prop.pattern.is_match(key) {
                    covered = true;
                    self.visit(value, &pattern_prop.node, &child, active, errors)?;
                }
            }
            if covered {
                continue;
            }

            match &node.additional_properties {
                AdditionalProperties::Allowed => {}
                AdditionalProperties::Forbidden => errors.push(
                    raise(
                        node,
                        instance,
                        path,
                        rule::ADDITIONAL_PROPERTIES,
                        format!("additionalProperty {} exists in instance when not allowed", quote(key)),
                    )
                    .with_argument(ErrorArgument::Value(Value::String(key.clone()))),
                ),
                AdditionalProperties::Schema(extra) => {
                    self.visit(value, extra, &child, active, errors)?;
                }
            }
        }
        Ok(())
    }

    fn check_composite(
        &self,
        node: &SchemaNode,
        composite: &Composite,
        instance: &Value,
        path: &PropertyPath,
        active: &mut ActiveRefs,
        errors: &mut Vec<ValidationError>,
    ) -> Result<(), EngineError> {
        let mut passing: Vec<Candidate> = Vec::new();
        let mut failing: Vec<Candidate> = Vec::new();
        for candidate in &composite.candidates {
            let mut sub_errors = Vec::new();
            self.visit(instance, &candidate.node, path, active, &mut sub_errors)?;
            if sub_errors.is_empty() {
                passing.push(candidate.clone());
            } else {
                failing.push(candidate.clone());
            }
        }

        let satisfied = match composite.kind {
            CompositeKind::OneOf => passing.len() == 1,
            CompositeKind::AnyOf => !passing.is_empty(),
            CompositeKind::AllOf => failing.is_empty(),
        };
        if satisfied {
            return Ok(());
        }

        // oneOf with several matches reports only the matching candidates.
        let (verb, tried) = match composite.kind {
            CompositeKind::OneOf if passing.is_empty() => {
                ("is not exactly one from", composite.candidates.clone())
            }
            CompositeKind::OneOf => ("is not exactly one from", passing),
            CompositeKind::AnyOf => ("is not any of", composite.candidates.clone()),
            CompositeKind::AllOf => ("does not match allOf schema", failing),
        };
        let listed: Vec<String> = tried.iter().map(|c| c.reference.to_string()).collect();
        errors.push(
            raise(
                node,
                instance,
                path,
                composite.kind.keyword(),
                format!("{verb} {}", listed.join(",")),
            )
            .with_argument(ErrorArgument::Candidates(tried)),
        );
        Ok(())
    }
}

fn raise(
    node: &SchemaNode,
    instance: &Value,
    path: &PropertyPath,
    name: &str,
    message: String,
) -> ValidationError {
    ValidationError::new(name, message, instance.clone(), path.clone()).with_schema(node.id.as_deref())
}

fn check_string(
    node: &SchemaNode,
    s: &str,
    instance: &Value,
    path: &PropertyPath,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(pattern) = &node.pattern
        && !pattern.is_match(s)
    {
        errors.push(raise(
            node,
            instance,
            path,
            rule::PATTERN,
            format!("does not match pattern {}", quote(pattern.as_str())),
        ));
    }

    let len = s.chars().count();
    if let Some(min) = node.min_length
        && len < min
    {
        errors.push(raise(
            node,
            instance,
            path,
            rule::MIN_LENGTH,
            format!("does not meet minimum length of {min}"),
        ));
    }
    if let Some(max) = node.max_length
        && len > max
    {
        errors.push(raise(
            node,
            instance,
            path,
            rule::MAX_LENGTH,
            format!("does not meet maximum length of {max}"),
        ));
    }
}

fn check_number(
    node: &SchemaNode,
    instance: &Value,
    path: &PropertyPath,
    errors: &mut Vec<ValidationError>,
) {
    let Some(value) = instance.as_f64() else {
        return;
    };
    if let Some(min) = &node.minimum
        && min.as_f64().is_some_and(|m| value < m)
    {
        errors.push(raise(
            node,
            instance,
            path,
            rule::MINIMUM,
            format!("must be greater than or equal to {min}"),
        ));
    }
    if let Some(max) = &node.maximum
        && max.as_f64().is_some_and(|m| value > m)
    {
        errors.push(raise(
            node,
            instance,
            path,
            rule::MAXIMUM,
            format!("must be less than or equal to {max}"),
        ));
    }
}

fn check_array_bounds(
    node: &SchemaNode,
    len: usize,
    instance: &Value,
    path: &PropertyPath,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(min) = node.min_items
        && len < min
    {
        errors.push(raise(
            node,
            instance,
            path,
            rule::MIN_ITEMS,
            format!("does not meet minimum length of {min}"),
        ));
    }
    if let Some(max) = node.max_items
        && len > max
    {
        errors.push(raise(
            node,
            instance,
            path,
            rule::MAX_ITEMS,
            format!("does not meet maximum length of {max}"),
        ));
    }
}

fn quote(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}

fn render_enum(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let schemas = vec![
            Schema::define(
                json!({
                    "id": "/ThingSchema",
                    "type": "object",
                    "required": ["key"],
                    "properties": {
                        "key": {"$ref": "/KeySchema"},
                        "kind": {"type": "string", "enum": ["a", "b"]},
                        "count": {"type": "integer", "minimum": 1, "maximum": 10},
                        "tags": {"type": "array", "minItems": 1, "items": {"type": "string"}},
                        "children": {"type": "array", "items": {"$ref": "/ThingSchema"}},
                        "test": {"oneOf": [{"$ref": "/RequestSchema"}, {"$ref": "/FunctionSchema"}]},
                        "label": {"anyOf": [{"type": "string"}, {"type": "null"}]}
                    },
                    "patternProperties": {"^x_": {"type": "boolean"}},
                    "additionalProperties": false
                }),
                &["/KeySchema", "/RequestSchema", "/FunctionSchema"],
            )
            .unwrap(),
            Schema::define(
                json!({"id": "/KeySchema", "type": "string", "minLength": 1, "pattern": "^[a-zA-Z_]+$"}),
                &[],
            )
            .unwrap(),
            Schema::define(
                json!({"id": "/RequestSchema", "type": "object", "properties": {"url": {"type": "string"}}}),
                &[],
            )
            .unwrap(),
            Schema::define(
                json!({"id": "/FunctionSchema", "type": "object", "required": ["source"], "properties": {"source": {"type": "string"}}}),
                &[],
            )
            .unwrap(),
        ];
        SchemaRegistry::from_schemas(schemas).unwrap()
    }

    fn stacks(errors: &[ValidationError]) -> Vec<String> {
        errors.iter().map(ValidationError::stack).collect()
    }

    #[test]
    fn test_valid_instance_has_no_errors() {
        let registry = registry();
        let validator = StructuralValidator::new(&registry, "/ThingSchema").unwrap();
        let errors = validator
            .validate(&json!({
                "key": "thing",
                "kind": "a",
                "count": 3,
                "tags": ["x"],
                "children": [{"key": "child"}],
                "x_flag": true,
                "label": null
            }))
            .unwrap();
        assert!(errors.is_empty(), "unexpected errors: {:?}", stacks(&errors));
    }

    #[test]
    fn test_type_mismatch_stops_at_node() {
        let registry = registry();
        let validator = StructuralValidator::new(&registry, "/ThingSchema").unwrap();
        let errors = validator.validate(&json!("nope")).unwrap();
        assert_eq!(stacks(&errors), vec!["instance is not of a type(s) object"]);
        assert_eq!(errors[0].schema.as_deref(), Some("/ThingSchema"));
    }

    #[test]
    fn test_scalar_rules() {
        let registry = registry();
        let validator = StructuralValidator::new(&registry, "/ThingSchema").unwrap();
        let errors = validator
            .validate(&json!({"key": "bad key", "kind": "c", "count": 0, "tags": []}))
            .unwrap();
        let mut rendered = stacks(&errors);
        rendered.sort();
        assert_eq!(
            rendered,
            vec![
                "instance.count must be greater than or equal to 1",
                "instance.key does not match pattern \"^[a-zA-Z_]+$\"",
                "instance.kind is not one of enum values: a,b",
                "instance.tags does not meet minimum length of 1",
            ]
        );

        let pattern = errors.iter().find(|e| e.name == rule::PATTERN).unwrap();
        assert_eq!(pattern.schema.as_deref(), Some("/KeySchema"));
        let enum_error = errors.iter().find(|e| e.name == rule::ENUM).unwrap();
        assert_eq!(enum_error.schema, None);
    }

    #[test]
    fn test_required_and_additional_properties() {
        let registry = registry();
        let validator = StructuralValidator::new(&registry, "/ThingSchema").unwrap();
        let errors = validator.validate(&json!({"bogus": 1, "x_ok": true})).unwrap();
        assert_eq!(
            stacks(&errors),
            vec![
                "instance requires property \"key\"",
                "instance additionalProperty \"bogus\" exists in instance when not allowed",
            ]
        );
        assert_eq!(errors[1].name, rule::ADDITIONAL_PROPERTIES);
        assert_eq!(errors[1].argument, Some(ErrorArgument::Value(json!("bogus"))));
    }

    #[test]
    fn test_pattern_properties_are_validated() {
        let registry = registry();
        let validator = StructuralValidator::new(&registry, "/ThingSchema").unwrap();
        let errors = validator.validate(&json!({"key": "k", "x_flag": "yes"})).unwrap();
        assert_eq!(stacks(&errors), vec!["instance.x_flag is not of a type(s) boolean"]);
    }

    #[test]
    fn test_self_reference_through_items() {
        let registry = registry();
        let validator = StructuralValidator::new(&registry, "/ThingSchema").unwrap();
        let errors = validator
            .validate(&json!({"key": "k", "children": [{"key": "ok"}, {"kind": "a"}]}))
            .unwrap();
        assert_eq!(stacks(&errors), vec!["instance.children[1] requires property \"key\""]);
    }

    #[test]
    fn test_one_of_records_candidates() {
        let registry = registry();
        let validator = StructuralValidator::new(&registry, "/ThingSchema").unwrap();
        let errors = validator.validate(&json!({"key": "k", "test": "not-an-object"})).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].name, rule::ONE_OF);
        assert_eq!(
            errors[0].stack(),
            "instance.test is not exactly one from </RequestSchema>,</FunctionSchema>"
        );
        assert_eq!(errors[0].candidates().map(<[Candidate]>::len), Some(2));
        assert_eq!(errors[0].instance, json!("not-an-object"));
    }

    #[test]
    fn test_one_of_with_several_matches_lists_matching_candidates() {
        let registry = registry();
        let validator = StructuralValidator::new(&registry, "/ThingSchema").unwrap();
        let errors = validator
            .validate(&json!({"key": "k", "test": {"url": "https://x", "source": "return 1"}}))
            .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "is not exactly one from </RequestSchema>,</FunctionSchema>"
        );
    }

    #[test]
    fn test_any_of_failure() {
        let registry = registry();
        let validator = StructuralValidator::new(&registry, "/ThingSchema").unwrap();
        let errors = validator.validate(&json!({"key": "k", "label": 5})).unwrap();
        assert_eq!(
            stacks(&errors),
            vec!["instance.label is not any of [subschema 0],[subschema 1]"]
        );
    }

    #[test]
    fn test_no_coercion() {
        let registry = registry();
        let validator = StructuralValidator::new(&registry, "/ThingSchema").unwrap();
        let errors = validator.validate(&json!({"key": "k", "count": "3"})).unwrap();
        assert_eq!(stacks(&errors), vec!["instance.count is not of a type(s) integer"]);
    }

    #[test]
    fn test_unknown_root_and_unresolved_ref() {
        let registry = registry();
        assert!(matches!(
            StructuralValidator::new(&registry, "/Nope"),
            Err(EngineError::UnknownSchema(_))
        ));

        let mut unchecked = SchemaRegistry::new();
        unchecked
            .register(Schema::define(json!({"id": "/Loose", "items": {"$ref": "/Gone"}}), &[]).unwrap())
            .unwrap();
        let validator = StructuralValidator::new(&unchecked, "/Loose").unwrap();
        let err = validator.validate(&json!([1])).unwrap_err();
        assert!(matches!(err, EngineError::UnresolvedRef { reference, .. } if reference == "/Gone"));
    }

    #[test]
    fn test_ref_loop_counts_as_failed_branch() {
        let looping = Schema::define(
            json!({"id": "/Loop", "anyOf": [{"$ref": "/Loop"}, {"type": "string"}]}),
            &["/Loop"],
        )
        .unwrap();
        let registry = SchemaRegistry::from_schemas([looping]).unwrap();
        let validator = StructuralValidator::new(&registry, "/Loop").unwrap();

        let errors = validator.validate(&json!(5)).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].name, rule::ANY_OF);
        assert_eq!(errors[0].schema.as_deref(), Some("/Loop"));

        assert!(validator.validate(&json!("looped")).unwrap().is_empty());
    }
}
