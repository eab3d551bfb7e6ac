//! Traversal helpers shared by the functional constraints. Every helper
//! tolerates shapes the structural pass already rejects: anything that is not
//! the expected type is skipped.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::path::PropertyPath;

/// Top-level maps of actions, in the order their errors are reported.
pub const ACTION_TYPES: [&str; 4] = ["triggers", "searches", "creates", "bulkReads"];

/// Methods a resource may declare, each wrapping one operation.
pub const RESOURCE_METHODS: [&str; 5] = ["get", "hook", "list", "search", "create"];

/// An action, or a resource method, together with its operation.
pub struct OperationRef<'d> {
    /// Path of the `operation` object.
    pub path: PropertyPath,
    pub operation: &'d Map<String, Value>,
    /// The action or resource method that owns `operation` (holds `display`).
    pub owner: &'d Map<String, Value>,
    /// The enclosing resource for resource methods.
    pub resource: Option<&'d Map<String, Value>>,
}

impl OperationRef<'_> {
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.owner
            .get("display")
            .and_then(|d| d.get("hidden"))
            .is_some_and(is_truthy)
    }
}

pub struct FieldRef<'d> {
    pub path: PropertyPath,
    pub field: &'d Map<String, Value>,
    /// 0 for `inputFields[i]`, 1 for `inputFields[i].children[j]`.
    pub depth: usize,
}

/// Entries of a top-level map such as `triggers`, with their paths.
pub fn entries<'d>(
    definition: &'d Value,
    section: &'d str,
) -> impl Iterator<Item = (&'d str, &'d Map<String, Value>, PropertyPath)> + 'd {
    definition
        .get(section)
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
        .filter_map(move |(key, value)| {
            value.as_object().map(|obj| {
                (
                    key.as_str(),
                    obj,
                    PropertyPath::root().key(section).key(key),
                )
            })
        })
}

/// Operations of one action type.
#[must_use]
pub fn action_operations<'d>(definition: &'d Value, action_type: &'d str) -> Vec<OperationRef<'d>> {
    entries(definition, action_type)
        .filter_map(|(_, action, path)| {
            action
                .get("operation")
                .and_then(Value::as_object)
                .map(|operation| OperationRef {
                    path: path.key("operation"),
                    operation,
                    owner: action,
                    resource: None,
                })
        })
        .collect()
}

/// Operations declared by resource methods, e.g. `resources.contact.get.operation`.
#[must_use]
pub fn resource_operations(definition: &Value) -> Vec<OperationRef<'_>> {
    let mut found = Vec::new();
    for (_, resource, path) in entries(definition, "resources") {
        for method in RESOURCE_METHODS {
            let Some(owner) = resource.get(method).and_then(Value::as_object) else {
                continue;
            };
            if let Some(operation) = owner.get("operation").and_then(Value::as_object) {
                found.push(OperationRef {
                    path: path.key(method).key("operation"),
                    operation,
                    owner,
                    resource: Some(resource),
                });
            }
        }
    }
    found
}

/// Every operation in the definition: actions first, then resource methods.
#[must_use]
pub fn all_operations(definition: &Value) -> Vec<OperationRef<'_>> {
    let mut found: Vec<OperationRef<'_>> = ACTION_TYPES
        .iter()
        .flat_map(|action_type| action_operations(definition, action_type))
        .collect();
    found.extend(resource_operations(definition));
    found
}

/// Object entries of `operation.inputFields`, each followed by its children.
/// Function entries (dynamic fields) are skipped.
#[must_use]
pub fn input_fields<'d>(operation: &OperationRef<'d>) -> Vec<FieldRef<'d>> {
    let mut found = Vec::new();
    let Some(fields) = operation.operation.get("inputFields").and_then(Value::as_array) else {
        return found;
    };
    let base = operation.path.key("inputFields");

    for (idx, field) in fields.iter().enumerate() {
        let Some(field) = field.as_object() else {
            continue;
        };
        let path = base.index(idx);
        let children = field.get("children").and_then(Value::as_array);
        found.push(FieldRef {
            path: path.clone(),
            field,
            depth: 0,
        });

        for (child_idx, child) in children.into_iter().flatten().enumerate() {
            if let Some(child) = child.as_object() {
                found.push(FieldRef {
                    path: path.key("children").index(child_idx),
                    field: child,
                    depth: 1,
                });
            }
        }
    }
    found
}

/// Keys of a `inputFields`/`outputFields` array, or `None` when any entry is a
/// function, since its fields are only known at runtime.
#[must_use]
pub fn static_field_keys(fields: Option<&Value>) -> Option<BTreeSet<&str>> {
    let Some(items) = fields.and_then(Value::as_array) else {
        return Some(BTreeSet::new());
    };
    let mut keys = BTreeSet::new();
    for item in items {
        let field = item.as_object()?;
        if let Some(key) = field.get("key").and_then(Value::as_str) {
            keys.insert(key);
        }
    }
    Some(keys)
}

/// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Bool(true) | Value::Array(_) | Value::Object(_) => true,
    }
}

/// `true` for a sample object with at least one key.
#[must_use]
pub fn has_sample(sample: Option<&Value>) -> bool {
    sample
        .and_then(Value::as_object)
        .is_some_and(|obj| !obj.is_empty())
}

/// Keys of a top-level map, e.g. every declared search key.
#[must_use]
pub fn section_keys<'d>(definition: &'d Value, section: &str) -> BTreeSet<&'d str> {
    definition
        .get(section)
        .and_then(Value::as_object)
        .map(|obj| obj.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Renders a set of keys for an `(options: ...)` suffix.
#[must_use]
pub fn options<'k>(keys: impl IntoIterator<Item = &'k str>) -> String {
    keys.into_iter().collect::<Vec<_>>().join(", ")
}
