use serde_json::{Value, json};

use super::{ids, keyed_map, ref_to};
use crate::schema::{Schema, SchemaError};

pub(super) fn schemas() -> Result<Vec<Schema>, SchemaError> {
    Ok(vec![
        method(
            ids::RESOURCE_METHOD_GET,
            "How will the platform get a single record? If you find yourself reaching for this, consider resources and their built-in get methods.",
            ids::BASIC_OPERATION,
            json!({"perform": {"url": "https://example.com/tags/{{bundle.inputData.id}}"}, "sample": {"id": 385, "name": "proactive"}}),
        )?,
        method(
            ids::RESOURCE_METHOD_HOOK,
            "How will the platform get notified of new objects? Will be turned into a trigger automatically.",
            ids::BASIC_HOOK_OPERATION,
            json!({"type": "hook", "perform": "$func$2$f$", "performList": "$func$2$f$", "sample": {"id": 1}}),
        )?,
        method(
            ids::RESOURCE_METHOD_LIST,
            "How will the platform get a list of objects? Will be turned into a trigger automatically.",
            ids::BASIC_POLLING_OPERATION,
            json!({"perform": {"url": "https://example.com/tags"}, "sample": {"id": 1}}),
        )?,
        method(
            ids::RESOURCE_METHOD_SEARCH,
            "How will the platform search for existing objects? Will be turned into a search automatically.",
            ids::BASIC_ACTION_OPERATION,
            json!({"perform": {"url": "https://example.com/tags", "params": {"name": "{{bundle.inputData.name}}"}}}),
        )?,
        method(
            ids::RESOURCE_METHOD_CREATE,
            "How will the platform create a new object? Will be turned into a create automatically.",
            ids::BASIC_CREATE_ACTION_OPERATION,
            json!({"perform": {"method": "POST", "url": "https://example.com/tags"}, "inputFields": [{"key": "name"}]}),
        )?,
        resource()?,
        resources()?,
    ])
}

fn display(label: &str) -> Value {
    json!({"label": label, "description": "Works with a tag."})
}

/// A resource method wraps one operation of the given shape together with
/// how it displays.
fn method(id: &str, description: &str, operation: &str, example: Value) -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": id,
            "description": description,
            "type": "object",
            "required": ["display", "operation"],
            "properties": {
                "display": ref_to(ids::BASIC_DISPLAY),
                "operation": ref_to(operation)
            },
            "additionalProperties": false,
            "examples": [
                {"display": display("Tag"), "operation": example},
                {"display": {"hidden": true}, "operation": example}
            ],
            "antiExamples": [
                {"example": {"display": display("Tag")}, "reason": "Missing the operation."},
                {"example": {"operation": example}, "reason": "Missing the display."},
                {"example": {"display": display("Tag"), "operation": example, "key": "tag"}, "reason": "Methods do not carry a key."}
            ]
        }),
        &[ids::BASIC_DISPLAY, operation],
    )
}

fn tag_resource() -> Value {
    json!({
        "key": "tag",
        "noun": "Tag",
        "get": {
            "display": display("Get Tag"),
            "operation": {"perform": {"url": "https://example.com/tags/{{bundle.inputData.id}}"}}
        },
        "list": {
            "display": display("New Tag"),
            "operation": {"perform": {"url": "https://example.com/tags"}}
        },
        "sample": {"id": 385, "name": "proactive"}
    })
}

fn resource() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::RESOURCE,
            "description": "Represents a resource, which will in turn power triggers, searches, or creates.",
            "type": "object",
            "required": ["key", "noun"],
            "properties": {
                "key": ref_to(ids::KEY),
                "noun": {
                    "description": "A noun for this resource that completes the sentence \"create a new XXX\".",
                    "type": "string",
                    "minLength": 2,
                    "maxLength": 255
                },
                "get": ref_to(ids::RESOURCE_METHOD_GET),
                "hook": ref_to(ids::RESOURCE_METHOD_HOOK),
                "list": ref_to(ids::RESOURCE_METHOD_LIST),
                "search": ref_to(ids::RESOURCE_METHOD_SEARCH),
                "create": ref_to(ids::RESOURCE_METHOD_CREATE),
                "outputFields": ref_to(ids::DYNAMIC_FIELDS),
                "sample": {
                    "description": "What does a sample of data look like? Methods without their own sample use this one.",
                    "type": "object",
                    "minProperties": 1
                }
            },
            "additionalProperties": false,
            "examples": [
                {"key": "tag", "noun": "Tag"},
                tag_resource()
            ],
            "antiExamples": [
                {"example": {"key": "tag"}, "reason": "Missing the noun."},
                {"example": {"key": "tag", "noun": "Tag", "get": {"display": display("Get Tag")}}, "reason": "A method without an operation."},
                {"example": {"key": "tag", "noun": "Tag", "sample": {}}, "reason": "An empty sample."}
            ]
        }),
        &[
            ids::KEY,
            ids::RESOURCE_METHOD_GET,
            ids::RESOURCE_METHOD_HOOK,
            ids::RESOURCE_METHOD_LIST,
            ids::RESOURCE_METHOD_SEARCH,
            ids::RESOURCE_METHOD_CREATE,
            ids::DYNAMIC_FIELDS,
        ],
    )
}

fn resources() -> Result<Schema, SchemaError> {
    let mut body = keyed_map(
        ids::RESOURCES,
        "All the resources that underlie common CRUD methods powering triggers, searches, and creates.",
        ids::RESOURCE,
    );
    if let Some(obj) = body.as_object_mut() {
        obj.insert("examples".to_owned(), json!([{}, {"tag": tag_resource()}]));
        obj.insert(
            "antiExamples".to_owned(),
            json!([{"example": {"tag": {"key": "tag"}}, "reason": "An incomplete resource."}]),
        );
    }
    Schema::define(body, &[ids::RESOURCE])
}
