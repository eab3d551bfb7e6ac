use serde_json::{Value, json};

use super::{ids, keyed_map, ref_to};
use crate::schema::{Schema, SchemaError};

pub(super) fn schemas() -> Result<Vec<Schema>, SchemaError> {
    Ok(vec![
        trigger()?,
        triggers()?,
        search()?,
        searches()?,
        create()?,
        creates()?,
        bulk_read()?,
        bulk_reads()?,
        search_or_create()?,
        search_or_creates()?,
    ])
}

fn display(label: &str, description: &str) -> Value {
    json!({"label": label, "description": description})
}

/// Body shared by every action: a key, a noun, how it displays, and one
/// operation of the given shape.
fn action_body(id: &str, description: &str, operation: Value) -> Value {
    json!({
        "id": id,
        "description": description,
        "type": "object",
        "required": ["key", "noun", "display", "operation"],
        "properties": {
            "key": ref_to(ids::KEY),
            "noun": {
                "description": "A noun for this action that completes the sentence \"triggers on a new XXX\".",
                "type": "string",
                "minLength": 2,
                "maxLength": 255
            },
            "display": ref_to(ids::BASIC_DISPLAY),
            "operation": operation
        },
        "additionalProperties": false
    })
}

fn define_action(
    mut body: Value,
    examples: Value,
    anti_examples: Value,
    dependencies: &[&str],
) -> Result<Schema, SchemaError> {
    if let Some(obj) = body.as_object_mut() {
        obj.insert("examples".to_owned(), examples);
        obj.insert("antiExamples".to_owned(), anti_examples);
    }
    Schema::define(body, dependencies)
}

fn polling_trigger() -> Value {
    json!({
        "key": "newRecipe",
        "noun": "Recipe",
        "display": display("New Recipe", "Triggers when a new recipe is added."),
        "operation": {"type": "polling", "perform": "$func$2$f$", "sample": {"id": 1}}
    })
}

fn trigger() -> Result<Schema, SchemaError> {
    let body = action_body(
        ids::TRIGGER,
        "How will the platform get notified of new objects?",
        json!({
            "description": "Powers the functionality for this trigger.",
            "oneOf": [ref_to(ids::BASIC_POLLING_OPERATION), ref_to(ids::BASIC_HOOK_OPERATION)]
        }),
    );
    define_action(
        body,
        json!([
            polling_trigger(),
            {
                "key": "newRecipe",
                "noun": "Recipe",
                "display": display("New Recipe", "Triggers when a new recipe is added."),
                "operation": {
                    "type": "hook",
                    "perform": "$func$2$f$",
                    "performSubscribe": "$func$2$f$",
                    "performUnsubscribe": "$func$2$f$",
                    "sample": {"id": 1}
                }
            },
            {
                "key": "newRecipe",
                "noun": "Recipe",
                "display": {"hidden": true},
                "operation": {"perform": {"url": "https://example.com/recipes"}}
            }
        ]),
        json!([
            {
                "example": {"key": "newRecipe", "noun": "Recipe", "operation": {"perform": "$func$2$f$"}},
                "reason": "Missing the display."
            },
            {
                "example": {
                    "key": "newRecipe",
                    "noun": "Recipe",
                    "display": display("New Recipe", "Triggers when a new recipe is added."),
                    "operation": {"type": "hook"}
                },
                "reason": "A hook operation without perform."
            },
            {
                "example": {
                    "key": "new-recipe",
                    "noun": "Recipe",
                    "display": display("New Recipe", "Triggers when a new recipe is added."),
                    "operation": {"perform": "$func$2$f$"}
                },
                "reason": "Invalid key."
            }
        ]),
        &[ids::KEY, ids::BASIC_DISPLAY, ids::BASIC_POLLING_OPERATION, ids::BASIC_HOOK_OPERATION],
    )
}

fn triggers() -> Result<Schema, SchemaError> {
    let mut bad_key = serde_json::Map::new();
    bad_key.insert("new-recipe".to_owned(), polling_trigger());
    define_action(
        keyed_map(ids::TRIGGERS, "Enumerates the triggers your app has available for users.", ids::TRIGGER),
        json!([{}, {"newRecipe": polling_trigger()}]),
        json!([
            {"example": Value::Object(bad_key), "reason": "Map keys must be valid keys."},
            {"example": {"newRecipe": {}}, "reason": "An empty trigger."}
        ]),
        &[ids::TRIGGER],
    )
}

fn find_recipe() -> Value {
    json!({
        "key": "findRecipe",
        "noun": "Recipe",
        "display": display("Find a Recipe", "Search for recipe by cuisine style."),
        "operation": {"perform": "$func$2$f$", "sample": {"id": 1}}
    })
}

fn search() -> Result<Schema, SchemaError> {
    let body = action_body(
        ids::SEARCH,
        "How will the platform search for existing objects?",
        ref_to(ids::BASIC_ACTION_OPERATION),
    );
    define_action(
        body,
        json!([find_recipe()]),
        json!([
            {
                "example": {
                    "key": "findRecipe",
                    "noun": "Recipe",
                    "display": display("Find a Recipe", "Search for recipe by cuisine style."),
                    "operation": {"sample": {"id": 1}}
                },
                "reason": "An operation without perform."
            },
            {"example": {"key": "findRecipe", "noun": "Recipe"}, "reason": "Missing display and operation."}
        ]),
        &[ids::KEY, ids::BASIC_DISPLAY, ids::BASIC_ACTION_OPERATION],
    )
}

fn searches() -> Result<Schema, SchemaError> {
    define_action(
        keyed_map(ids::SEARCHES, "Enumerates the searches your app has available for users.", ids::SEARCH),
        json!([{"findRecipe": find_recipe()}]),
        json!([{"example": {"findRecipe": {"key": "findRecipe"}}, "reason": "An incomplete search."}]),
        &[ids::SEARCH],
    )
}

fn add_recipe() -> Value {
    json!({
        "key": "addRecipe",
        "noun": "Recipe",
        "display": display("Add Recipe", "Creates a new recipe."),
        "operation": {"perform": "$func$2$f$", "sample": {"id": 1}}
    })
}

fn create() -> Result<Schema, SchemaError> {
    let body = action_body(
        ids::CREATE,
        "How will the platform create a new object?",
        ref_to(ids::BASIC_CREATE_ACTION_OPERATION),
    );
    define_action(
        body,
        json!([
            add_recipe(),
            {
                "key": "addRecipes",
                "noun": "Recipe",
                "display": display("Add Recipes", "Creates recipes in batches."),
                "operation": {
                    "buffer": {"groupedBy": ["cookbook"], "limit": 50},
                    "performBuffer": "$func$2$f$",
                    "sample": {"id": 1}
                }
            }
        ]),
        json!([
            {"example": {"key": "addRecipe", "noun": "Recipe", "operation": {"perform": "$func$2$f$"}}, "reason": "Missing the display."},
            {
                "example": {
                    "key": "addRecipe",
                    "noun": "R",
                    "display": display("Add Recipe", "Creates a new recipe."),
                    "operation": {"perform": "$func$2$f$"}
                },
                "reason": "The noun is too short."
            }
        ]),
        &[ids::KEY, ids::BASIC_DISPLAY, ids::BASIC_CREATE_ACTION_OPERATION],
    )
}

fn creates() -> Result<Schema, SchemaError> {
    define_action(
        keyed_map(ids::CREATES, "Enumerates the creates your app has available for users.", ids::CREATE),
        json!([{"addRecipe": add_recipe()}]),
        json!([{"example": {"addRecipe": {"key": "addRecipe"}}, "reason": "An incomplete create."}]),
        &[ids::CREATE],
    )
}

fn bulk_read() -> Result<Schema, SchemaError> {
    let body = action_body(
        ids::BULK_READ,
        "How will the platform fetch many records at once?",
        ref_to(ids::BASIC_OPERATION),
    );
    define_action(
        body,
        json!([{
            "key": "recipes",
            "noun": "Recipes",
            "display": display("Recipes", "Lists every recipe."),
            "operation": {"perform": {"url": "https://example.com/recipes"}, "sample": {"id": 1}}
        }]),
        json!([{
            "example": {
                "key": "recipes",
                "noun": "Recipes",
                "display": display("Recipes", "Lists every recipe."),
                "operation": {"perform": {"url": "https://example.com/recipes"}, "lock": {"key": "x"}}
            },
            "reason": "Bulk reads cannot be locked."
        }]),
        &[ids::KEY, ids::BASIC_DISPLAY, ids::BASIC_OPERATION],
    )
}

fn bulk_reads() -> Result<Schema, SchemaError> {
    define_action(
        keyed_map(ids::BULK_READS, "Lookup tables your app makes available in bulk.", ids::BULK_READ),
        json!([{}]),
        json!([{"example": {"recipes": {"noun": "Recipes"}}, "reason": "An incomplete bulk read."}]),
        &[ids::BULK_READ],
    )
}

fn search_or_create_entry() -> Value {
    json!({
        "key": "findRecipe",
        "display": display("Find or Create a Recipe", "Finds a recipe and creates it when missing."),
        "search": "findRecipe",
        "create": "addRecipe"
    })
}

fn search_or_create() -> Result<Schema, SchemaError> {
    let body = json!({
        "id": ids::SEARCH_OR_CREATE,
        "description": "Pair an existing search and a create to enable \"Find or Create\" functionality.",
        "type": "object",
        "required": ["key", "search", "create"],
        "properties": {
            "key": ref_to(ids::KEY),
            "display": ref_to(ids::BASIC_DISPLAY),
            "search": ref_to(ids::KEY),
            "create": ref_to(ids::KEY),
            "update": ref_to(ids::KEY),
            "updateInputFromSearchOutput": ref_to(ids::FLAT_OBJECT),
            "searchUniqueInputToOutputConstraint": ref_to(ids::FLAT_OBJECT)
        },
        "additionalProperties": false
    });
    define_action(
        body,
        json!([
            search_or_create_entry(),
            {
                "key": "findRecipe",
                "search": "findRecipe",
                "create": "addRecipe",
                "update": "updateRecipe",
                "updateInputFromSearchOutput": {"recipeId": "id"},
                "searchUniqueInputToOutputConstraint": {"name": "name"}
            }
        ]),
        json!([
            {"example": {"key": "findRecipe", "search": "findRecipe"}, "reason": "Missing the create."},
            {"example": {"key": "f", "search": "findRecipe", "create": "addRecipe"}, "reason": "The key is too short."},
            {
                "example": {"key": "findRecipe", "search": "findRecipe", "create": "addRecipe", "updateInputFromSearchOutput": {"a": ["b"]}},
                "reason": "Mappings must be flat."
            }
        ]),
        &[ids::KEY, ids::BASIC_DISPLAY, ids::FLAT_OBJECT],
    )
}

fn search_or_creates() -> Result<Schema, SchemaError> {
    define_action(
        keyed_map(
            ids::SEARCH_OR_CREATES,
            "Enumerates the search-or-creates your app has available for users.",
            ids::SEARCH_OR_CREATE,
        ),
        json!([{"findOrAddRecipe": search_or_create_entry()}]),
        json!([{"example": {"findOrAddRecipe": {"key": "findRecipe"}}, "reason": "An incomplete search-or-create."}]),
        &[ids::SEARCH_OR_CREATE],
    )
}
