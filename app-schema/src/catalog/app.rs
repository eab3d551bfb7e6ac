use serde_json::{Value, json};

use super::{ids, ref_to};
use crate::schema::{Schema, SchemaError};

pub(super) fn schemas() -> Result<Vec<Schema>, SchemaError> {
    let mut body = json!({
        "id": ids::APP,
        "description": "Represents a full app.",
        "type": "object",
        "required": ["version", "platformVersion"],
        "properties": {
            "version": ref_to(ids::VERSION),
            "platformVersion": ref_to(ids::VERSION),
            "authentication": ref_to(ids::AUTHENTICATION),
            "requestTemplate": ref_to(ids::REQUEST),
            "beforeRequest": ref_to(ids::MIDDLEWARES),
            "afterResponse": ref_to(ids::MIDDLEWARES),
            "hydrators": ref_to(ids::HYDRATORS),
            "resources": ref_to(ids::RESOURCES),
            "triggers": ref_to(ids::TRIGGERS),
            "searches": ref_to(ids::SEARCHES),
            "creates": ref_to(ids::CREATES),
            "bulkReads": ref_to(ids::BULK_READS),
            "searchOrCreates": ref_to(ids::SEARCH_OR_CREATES),
            "searchAndCreates": ref_to(ids::SEARCH_OR_CREATES),
            "flags": ref_to(ids::APP_FLAGS),
            "throttle": ref_to(ids::THROTTLE_OBJECT)
        },
        "additionalProperties": false
    });
    if let Some(obj) = body.as_object_mut() {
        obj.insert("examples".to_owned(), examples());
        obj.insert("antiExamples".to_owned(), anti_examples());
    }

    Ok(vec![Schema::define(
        body,
        &[
            ids::VERSION,
            ids::AUTHENTICATION,
            ids::REQUEST,
            ids::MIDDLEWARES,
            ids::HYDRATORS,
            ids::RESOURCES,
            ids::TRIGGERS,
            ids::SEARCHES,
            ids::CREATES,
            ids::BULK_READS,
            ids::SEARCH_OR_CREATES,
            ids::APP_FLAGS,
            ids::THROTTLE_OBJECT,
        ],
    )?])
}

fn display(label: &str) -> Value {
    json!({"label": label, "description": "Works with recipes."})
}

fn versions() -> Value {
    json!({"version": "1.0.0", "platformVersion": "1.0.0"})
}

/// `versions()` plus the given top-level sections.
fn app_with(sections: Value) -> Value {
    let mut app = versions();
    if let (Some(app), Value::Object(sections)) = (app.as_object_mut(), sections) {
        app.extend(sections);
    }
    app
}

fn recipe_action(key: &str, label: &str, operation: Value) -> Value {
    json!({"key": key, "noun": "Recipe", "display": display(label), "operation": operation})
}

fn recipe_app() -> Value {
    app_with(json!({
        "authentication": {
            "type": "custom",
            "test": {"url": "https://example.com/me"},
            "fields": [{"key": "apiKey", "type": "password", "required": true}]
        },
        "beforeRequest": ["$func$2$f$"],
        "resources": {
            "tag": {
                "key": "tag",
                "noun": "Tag",
                "list": {"display": display("New Tag"), "operation": {"perform": {"url": "https://example.com/tags"}}},
                "sample": {"id": 1, "name": "vip"}
            }
        },
        "triggers": {
            "newRecipe": recipe_action("newRecipe", "New Recipe", json!({
                "perform": {"url": "https://example.com/recipes"},
                "resource": "tag.id",
                "throttle": {"window": 60, "limit": 10},
                "sample": {"id": 1}
            }))
        },
        "searches": {
            "findRecipe": recipe_action("findRecipe", "Find Recipe", json!({
                "perform": "$func$2$f$",
                "inputFields": [{"key": "name"}],
                "sample": {"id": 1, "name": "Pie"}
            }))
        },
        "creates": {
            "addRecipe": recipe_action("addRecipe", "Add Recipe", json!({
                "perform": "$func$2$f$",
                "inputFieldGroups": [{"key": "details"}],
                "inputFields": [
                    {"key": "name", "group": "details"},
                    {"key": "servings", "type": "integer", "default": "4"},
                    {"key": "ingredients", "children": [{"key": "ingredient"}, {"key": "amount"}]}
                ],
                "sample": {"id": 1}
            }))
        },
        "searchOrCreates": {
            "findOrAddRecipe": {"key": "findRecipe", "display": display("Find or Add Recipe"), "search": "findRecipe", "create": "addRecipe"}
        }
    }))
}

fn examples() -> Value {
    json!([
        versions(),
        app_with(json!({
            "triggers": {
                "newRecipe": recipe_action("newRecipe", "New Recipe", json!({
                    "perform": {"url": "https://example.com/recipes"},
                    "sample": {"id": 1}
                }))
            },
            "flags": {"skipHttpPatch": true}
        })),
        recipe_app()
    ])
}

fn anti_examples() -> Value {
    let create_with = |fields: Value| {
        app_with(json!({
            "creates": {
                "addRecipe": recipe_action("addRecipe", "Add Recipe", json!({
                    "perform": "$func$2$f$",
                    "inputFields": fields,
                    "sample": {"id": 1}
                }))
            }
        }))
    };

    json!([
        {"example": {"version": "1.0.0"}, "reason": "Missing the platform version."},
        {"example": app_with(json!({"foo": true})), "reason": "Unknown top-level property."},
        {
            "example": app_with(json!({
                "triggers": {
                    "newRecipe": recipe_action("newThing", "New Recipe", json!({"perform": "$func$2$f$", "sample": {"id": 1}}))
                }
            })),
            "reason": "The trigger key does not match its map key."
        },
        {
            "example": app_with(json!({
                "searches": {"findRecipe": recipe_action("findRecipe", "Find Recipe", json!({"perform": "$func$2$f$"}))}
            })),
            "reason": "A visible search without a sample."
        },
        {
            "example": create_with(json!([{"key": "lineItems", "children": [{"key": "sku"}], "list": true}])),
            "reason": "children and list are mutually exclusive."
        },
        {
            "example": create_with(json!([{"key": "name"}, {"key": "name"}])),
            "reason": "Duplicate input field keys."
        },
        {
            "example": app_with(json!({
                "searches": {"findRecipe": recipe_action("findRecipe", "Find Recipe", json!({"perform": "$func$2$f$", "sample": {"id": 1}}))},
                "creates": {"addRecipe": recipe_action("addRecipe", "Add Recipe", json!({"perform": "$func$2$f$", "sample": {"id": 1}}))},
                "searchOrCreates": {"findOrAdd": {"key": "searchRecipe", "search": "findRecipe", "create": "addRecipe"}}
            })),
            "reason": "The search-or-create key does not match a search."
        }
    ])
}
