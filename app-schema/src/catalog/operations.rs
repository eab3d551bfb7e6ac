use serde_json::{Map, Value, json};

use super::{ids, ref_to, request_or_function};
use crate::schema::{Schema, SchemaError};

pub(super) fn schemas() -> Result<Vec<Schema>, SchemaError> {
    Ok(vec![
        basic_display()?,
        basic_operation()?,
        basic_polling_operation()?,
        basic_hook_operation()?,
        basic_action_operation()?,
        buffer_config()?,
        basic_create_action_operation()?,
    ])
}

/// Schemas every operation variant references.
const OPERATION_DEPENDENCIES: [&str; 5] = [
    ids::REF_RESOURCE,
    ids::REQUEST,
    ids::FUNCTION,
    ids::DYNAMIC_FIELDS,
    ids::INPUT_FIELD_GROUPS,
];

/// Properties shared by every operation; variants add to (or override) these.
fn operation_properties() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("resource".to_owned(), ref_to(ids::REF_RESOURCE));
    properties.insert("perform".to_owned(), request_or_function());
    properties.insert("inputFields".to_owned(), ref_to(ids::DYNAMIC_FIELDS));
    properties.insert("outputFields".to_owned(), ref_to(ids::DYNAMIC_FIELDS));
    properties.insert("inputFieldGroups".to_owned(), ref_to(ids::INPUT_FIELD_GROUPS));
    properties.insert(
        "sample".to_owned(),
        json!({
            "description": "What does a sample of data look like? Will use resource sample if missing.",
            "type": "object",
            "minProperties": 1
        }),
    );
    properties
}

/// Builds an operation body from the shared properties plus `extra`.
fn operation_body(id: &str, description: &str, required: &[&str], extra: Value) -> Value {
    let mut properties = operation_properties();
    if let Value::Object(extra) = extra {
        properties.extend(extra);
    }
    let mut body = json!({
        "id": id,
        "description": description,
        "type": "object",
        "properties": properties,
        "additionalProperties": false
    });
    if !required.is_empty()
        && let Some(obj) = body.as_object_mut()
    {
        obj.insert("required".to_owned(), json!(required));
    }
    body
}

/// Attaches `examples` and `antiExamples` to a generated body.
fn with_examples(mut body: Value, examples: Value, anti_examples: Value) -> Value {
    if let Some(obj) = body.as_object_mut() {
        obj.insert("examples".to_owned(), examples);
        obj.insert("antiExamples".to_owned(), anti_examples);
    }
    body
}

fn basic_display() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::BASIC_DISPLAY,
            "description": "Defines how an action is presented to users.",
            "type": "object",
            "properties": {
                "label": {"description": "A short label like \"New Record\" or \"Create Record in Project\".", "type": "string", "minLength": 2, "maxLength": 64},
                "description": {"description": "A description of what this action does.", "type": "string", "minLength": 1, "maxLength": 1000},
                "directions": {"description": "A short blurb that can explain how to get this working.", "type": "string", "minLength": 12, "maxLength": 1000},
                "hidden": {"description": "Should this operation be unselectable by users?", "type": "boolean"},
                "important": {"description": "Is this an important operation?", "type": "boolean"}
            },
            "additionalProperties": false,
            "anyOf": [
                {"required": ["label", "description"]},
                {"required": ["hidden"], "properties": {"hidden": {"enum": [true]}}}
            ],
            "examples": [
                {"label": "New Thing", "description": "Gets a new thing for you."},
                {"label": "New Thing", "description": "Gets a new thing for you.", "directions": "This is how you use the thing.", "important": true},
                {"hidden": true}
            ],
            "antiExamples": [
                {"example": {"label": "New Thing"}, "reason": "Missing the description on a visible action."},
                {"example": {"label": "N", "description": "Gets a new thing for you."}, "reason": "The label is too short."},
                {"example": {"hidden": false}, "reason": "Visible actions need a label and description."},
                {"example": {"label": "New Thing", "description": "Gets a new thing for you.", "noun": "Thing"}, "reason": "Unknown property."}
            ]
        }),
        &[],
    )
}

fn basic_operation() -> Result<Schema, SchemaError> {
    let body = operation_body(
        ids::BASIC_OPERATION,
        "Represents the fundamental mechanics of triggers, searches, or creates.",
        &["perform"],
        json!({}),
    );
    Schema::define(
        with_examples(
            body,
            json!([
                {"perform": {"url": "https://example.com"}},
                {"perform": "$func$2$f$", "sample": {"id": 1}},
                {"perform": {"require": "some/path/to/file.js"}, "inputFields": [{"key": "name"}], "resource": "contact.id"}
            ]),
            json!([
                {"example": {}, "reason": "Missing perform."},
                {"example": {"perform": {"url": "https://example.com"}, "sample": {}}, "reason": "An empty sample."},
                {"example": {"perform": "funcy"}, "reason": "perform is neither a request nor a function."},
                {"example": {"perform": "$func$2$f$", "resource": "contact"}, "reason": "Malformed resource reference."}
            ]),
        ),
        &OPERATION_DEPENDENCIES,
    )
}

fn basic_polling_operation() -> Result<Schema, SchemaError> {
    let body = operation_body(
        ids::BASIC_POLLING_OPERATION,
        "Represents the fundamental mechanics of a polling trigger.",
        &["perform"],
        json!({
            "type": {"description": "Clarify how this operation works (polling == pull or hook == push).", "type": "string", "enum": ["polling"]},
            "canPaginate": {"description": "Does this endpoint support pagination via bundle.meta.page?", "type": "boolean"},
            "throttle": ref_to(ids::THROTTLE_OBJECT)
        }),
    );
    let mut dependencies = OPERATION_DEPENDENCIES.to_vec();
    dependencies.push(ids::THROTTLE_OBJECT);
    Schema::define(
        with_examples(
            body,
            json!([
                {"perform": {"url": "https://example.com"}},
                {"type": "polling", "perform": {"url": "https://example.com"}, "canPaginate": true},
                {"perform": "$func$2$f$", "throttle": {"window": 60, "limit": 10}}
            ]),
            json!([
                {"example": {"type": "hook", "perform": {"url": "https://example.com"}}, "reason": "Wrong operation type."},
                {"example": {"perform": {"url": "https://example.com"}, "throttle": {"window": 60}}, "reason": "Incomplete throttle."},
                {"example": {"perform": {"url": "https://example.com"}, "canPaginate": "yes"}, "reason": "canPaginate is a boolean."}
            ]),
        ),
        &dependencies,
    )
}

fn basic_hook_operation() -> Result<Schema, SchemaError> {
    let body = operation_body(
        ids::BASIC_HOOK_OPERATION,
        "Represents the inbound mechanics of hooks with optional subscribe/unsubscribe.",
        &["type", "perform"],
        json!({
            "type": {"description": "Must be explicitly set to \"hook\" unless this hook is defined as part of a resource.", "type": "string", "enum": ["hook"]},
            "perform": ref_to(ids::FUNCTION),
            "performList": request_or_function(),
            "performSubscribe": request_or_function(),
            "performUnsubscribe": request_or_function(),
            "throttle": ref_to(ids::THROTTLE_OBJECT)
        }),
    );
    let mut dependencies = OPERATION_DEPENDENCIES.to_vec();
    dependencies.push(ids::THROTTLE_OBJECT);
    Schema::define(
        with_examples(
            body,
            json!([
                {"type": "hook", "perform": "$func$2$f$"},
                {
                    "type": "hook",
                    "perform": "$func$2$f$",
                    "performList": {"url": "https://example.com/items"},
                    "performSubscribe": "$func$2$f$",
                    "performUnsubscribe": "$func$2$f$",
                    "sample": {"id": 1}
                }
            ]),
            json!([
                {"example": {"perform": "$func$2$f$"}, "reason": "Missing the type."},
                {"example": {"type": "hook", "perform": {"url": "https://example.com"}}, "reason": "A hook perform must be a function."},
                {"example": {"type": "polling", "perform": "$func$2$f$"}, "reason": "Wrong operation type."}
            ]),
        ),
        &dependencies,
    )
}

fn basic_action_operation() -> Result<Schema, SchemaError> {
    let body = operation_body(
        ids::BASIC_ACTION_OPERATION,
        "Represents the fundamental mechanics of a search or create.",
        &["perform"],
        json!({"lock": ref_to(ids::LOCK_OBJECT)}),
    );
    let mut dependencies = OPERATION_DEPENDENCIES.to_vec();
    dependencies.push(ids::LOCK_OBJECT);
    Schema::define(
        with_examples(
            body,
            json!([
                {"perform": {"url": "https://example.com"}},
                {"perform": "$func$2$f$", "lock": {"key": "{{bundle.inputData.id}}"}}
            ]),
            json!([
                {"example": {"lock": {"key": "x"}}, "reason": "Missing perform."},
                {"example": {"perform": "$func$2$f$", "lock": {}}, "reason": "A lock without a key."}
            ]),
        ),
        &dependencies,
    )
}

fn buffer_config() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::BUFFER_CONFIG,
            "description": "Currently an internal tool for grouping incoming records and sending them in one batch.",
            "type": "object",
            "required": ["groupedBy", "limit"],
            "properties": {
                "groupedBy": {
                    "description": "The list of keys of input fields to group by.",
                    "type": "array",
                    "items": {"type": "string", "minLength": 1},
                    "minItems": 1
                },
                "limit": {
                    "description": "The maximum number of records in a single batch.",
                    "type": "integer",
                    "minimum": 1
                }
            },
            "additionalProperties": false,
            "examples": [{"groupedBy": ["workspace"], "limit": 10}],
            "antiExamples": [
                {"example": {"groupedBy": [], "limit": 10}, "reason": "Nothing to group by."},
                {"example": {"groupedBy": ["workspace"], "limit": 0}, "reason": "The limit must be positive."},
                {"example": {"limit": 1}, "reason": "Missing groupedBy."}
            ]
        }),
        &[],
    )
}

fn basic_create_action_operation() -> Result<Schema, SchemaError> {
    // `perform` is optional here: buffered creates use performBuffer instead.
    let body = operation_body(
        ids::BASIC_CREATE_ACTION_OPERATION,
        "Represents the fundamental mechanics of a create.",
        &[],
        json!({
            "lock": ref_to(ids::LOCK_OBJECT),
            "buffer": ref_to(ids::BUFFER_CONFIG),
            "performBuffer": ref_to(ids::FUNCTION)
        }),
    );
    let mut dependencies = OPERATION_DEPENDENCIES.to_vec();
    dependencies.extend([ids::LOCK_OBJECT, ids::BUFFER_CONFIG]);
    Schema::define(
        with_examples(
            body,
            json!([
                {"perform": {"url": "https://example.com"}, "sample": {"id": 1}},
                {"buffer": {"groupedBy": ["workspace"], "limit": 10}, "performBuffer": "$func$2$f$", "sample": {"id": 1}}
            ]),
            json!([
                {"example": {"perform": {"url": "https://example.com"}, "buffer": {"groupedBy": [], "limit": 10}}, "reason": "Invalid buffer config."},
                {"example": {"performBuffer": "funcy"}, "reason": "performBuffer must be a function."},
                {"example": {"perform": "$func$2$f$", "throttle": {"window": 60, "limit": 1}}, "reason": "Creates do not take a throttle."}
            ]),
        ),
        &dependencies,
    )
}
