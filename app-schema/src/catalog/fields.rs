use serde_json::json;

use super::{ids, ref_to};
use crate::schema::{Schema, SchemaError};

pub(super) fn schemas() -> Result<Vec<Schema>, SchemaError> {
    Ok(vec![
        field_choice_with_label()?,
        field_choices()?,
        field_dynamic()?,
        field_search()?,
        field()?,
        fields()?,
        dynamic_fields()?,
        input_field_group()?,
        input_field_groups()?,
    ])
}

fn field_choice_with_label() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::FIELD_CHOICE_WITH_LABEL,
            "description": "An object describing a labeled choice in a static dropdown.",
            "type": "object",
            "required": ["value", "sample", "label"],
            "properties": {
                "value": {"description": "The actual value that is sent into the app.", "type": "string", "minLength": 1},
                "sample": {"description": "Displayed as light grey text in the editor.", "type": "string", "minLength": 1},
                "label": {"description": "A human readable label for this value.", "type": "string", "minLength": 1}
            },
            "additionalProperties": false,
            "examples": [{"label": "Red", "sample": "#f00", "value": "#f00"}],
            "antiExamples": [
                {"example": {"label": "Red", "value": "#f00"}, "reason": "Missing the sample."},
                {"example": {"label": "", "sample": "#f00", "value": "#f00"}, "reason": "Empty label."}
            ]
        }),
        &[],
    )
}

fn field_choices() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::FIELD_CHOICES,
            "description": "A static dropdown of options. Which you use depends on your order and label requirements.",
            "oneOf": [
                {"type": "object", "minProperties": 1},
                {
                    "type": "array",
                    "minItems": 1,
                    "items": {"anyOf": [{"type": "string"}, ref_to(ids::FIELD_CHOICE_WITH_LABEL)]}
                }
            ],
            "examples": [
                {"label": "Red", "sample": "#f00", "value": "#f00"},
                ["first", "second", "third"],
                [{"label": "Red", "sample": "#f00", "value": "#f00"}, "blue"]
            ],
            "antiExamples": [
                {"example": [], "reason": "At least one choice is needed."},
                {"example": {}, "reason": "At least one choice is needed."},
                {"example": [1], "reason": "Choices are strings or labeled objects."},
                {"example": "first", "reason": "Must be an object or an array."}
            ]
        }),
        &[ids::FIELD_CHOICE_WITH_LABEL],
    )
}

fn field_dynamic() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::FIELD_DYNAMIC,
            "description": "A reference to a trigger that powers a dynamic dropdown, like `triggerKey.idField.labelField`.",
            "type": "string",
            "pattern": r"^[^.]+\.[^.]+(\.[^.]+)?$",
            "examples": ["uniqueKey.id", "contact.id.name"],
            "antiExamples": [
                {"example": "contact", "reason": "Missing the id field."},
                {"example": "a.b.c.d", "reason": "Too many segments."}
            ]
        }),
        &[],
    )
}

fn field_search() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::FIELD_SEARCH,
            "description": "A reference to a search that will guide the user to add a search step to populate this field.",
            "type": "string",
            "pattern": r"^[a-zA-Z0-9_]+\.[a-zA-Z0-9_]+$",
            "examples": ["findContact.id"],
            "antiExamples": [
                {"example": "findContact", "reason": "Missing the id field."},
                {"example": "find contact.id", "reason": "Spaces are not allowed."}
            ]
        }),
        &[],
    )
}

fn field() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::FIELD,
            "description": "Defines a field an app either needs as input, or gives as output.",
            "type": "object",
            "required": ["key"],
            "properties": {
                "key": {"description": "A unique machine readable key for this value.", "type": "string", "minLength": 1},
                "label": {"description": "A human readable label for this value.", "type": "string", "minLength": 1},
                "helpText": {"description": "A human readable description of this value.", "type": "string", "minLength": 1, "maxLength": 1000},
                "type": {
                    "description": "The type of this value.",
                    "type": "string",
                    "enum": ["string", "text", "integer", "number", "boolean", "datetime", "file", "password", "copy", "code"]
                },
                "required": {"description": "If this value is required or not.", "type": "boolean"},
                "placeholder": {"description": "An example value that is not saved.", "type": "string", "minLength": 1},
                "default": {"description": "A default value that is saved the first time a step is set up.", "type": "string", "minLength": 1},
                "dynamic": ref_to(ids::FIELD_DYNAMIC),
                "search": ref_to(ids::FIELD_SEARCH),
                "choices": ref_to(ids::FIELD_CHOICES),
                "list": {"description": "Acts differently when used in inputFields vs. outputFields.", "type": "boolean"},
                "children": {
                    "description": "An array of child fields that define the structure of a sub-object for this field. Usually used for line items.",
                    "type": "array",
                    "items": ref_to(ids::FIELD),
                    "minItems": 1
                },
                "dict": {"description": "Is this field a key/value input?", "type": "boolean"},
                "computed": {"description": "Is this field automatically populated (and hidden from the user)?", "type": "boolean"},
                "altersDynamicFields": {"description": "Does the value of this field affect the definitions of other fields in the set?", "type": "boolean"},
                "steadyState": {"description": "Prevents triggering on new output until all values for fields with this property remain unchanged.", "type": "boolean"},
                "inputFormat": {
                    "description": "Useful when you expect the input to be part of a longer string. Put `{{input}}` in place of the user's input.",
                    "type": "string",
                    "pattern": r"^.*\{\{\s*input\s*\}\}.*$"
                },
                "group": {"description": "A reference to a group key from the operation's inputFieldGroups.", "type": "string", "minLength": 1}
            },
            "additionalProperties": false,
            "examples": [
                {"key": "abc"},
                {"key": "abc", "choices": {"mobile": "Mobile Phone"}},
                {"key": "abc", "choices": ["first", "second", "third"]},
                {"key": "abc", "children": [{"key": "abc"}]},
                {"key": "abc", "type": "integer", "helpText": "Enter a number.", "default": "10"},
                {"key": "abc", "inputFormat": "https://{{input}}.example.com", "group": "account"}
            ],
            "antiExamples": [
                {"example": {}, "reason": "Missing the key."},
                {"example": {"key": "abc", "type": "loltype"}, "reason": "Unknown type."},
                {"example": {"key": "abc", "choices": {}}, "reason": "Empty choices."},
                {"example": {"key": "abc", "children": []}, "reason": "Empty children."},
                {"example": {"key": "abc", "inputFormat": "https://example.com"}, "reason": "inputFormat must contain {{input}}."},
                {
                    "example": {"key": "abc", "children": [{"key": "def"}], "list": true},
                    "reason": "children and list are mutually exclusive; a whole-definition check enforces it.",
                    "skip": true
                }
            ]
        }),
        &[ids::FIELD_DYNAMIC, ids::FIELD_SEARCH, ids::FIELD_CHOICES],
    )
}

fn fields() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::FIELDS,
            "description": "An array or collection of fields.",
            "type": "array",
            "items": ref_to(ids::FIELD),
            "examples": [[], [{"key": "abc"}], [{"key": "abc"}, {"key": "def", "type": "boolean"}]],
            "antiExamples": [
                {"example": [{}], "reason": "A field without a key."},
                {"example": [{"key": "abc", "choices": {}}], "reason": "A field with empty choices."},
                {"example": {"key": "abc"}, "reason": "Must be an array."}
            ]
        }),
        &[ids::FIELD],
    )
}

fn dynamic_fields() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::DYNAMIC_FIELDS,
            "description": "Like a /FieldsSchema but you can provide functions to create dynamic or custom fields.",
            "type": "array",
            "items": {"anyOf": [ref_to(ids::FIELD), ref_to(ids::FUNCTION)]},
            "examples": [
                [],
                [{"key": "abc"}],
                [{"key": "abc"}, "$func$2$f$"],
                ["$func$2$f$", {"source": "return [{key: 'def'}]"}]
            ],
            "antiExamples": [
                {"example": [{"key": "abc", "choices": {}}], "reason": "A field with empty choices."},
                {"example": ["funcy"], "reason": "Not a function pointer."},
                {"example": "$func$2$f$", "reason": "Must be an array."}
            ]
        }),
        &[ids::FIELD, ids::FUNCTION],
    )
}

fn input_field_group() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::INPUT_FIELD_GROUP,
            "description": "Object for visual grouping of input fields.",
            "type": "object",
            "required": ["key"],
            "properties": {
                "key": ref_to(ids::KEY),
                "label": {"description": "The human readable name for the group.", "type": "string", "minLength": 1},
                "emphasize": {"description": "Whether this group should be emphasized in the UI.", "type": "boolean"}
            },
            "additionalProperties": false,
            "examples": [
                {"key": "account"},
                {"key": "account", "label": "Account details", "emphasize": true}
            ],
            "antiExamples": [
                {"example": {"label": "Account details"}, "reason": "Missing the key."},
                {"example": {"key": "a"}, "reason": "The key is too short."},
                {"example": {"key": "account", "emphasize": "yes"}, "reason": "emphasize is a boolean."}
            ]
        }),
        &[ids::KEY],
    )
}

fn input_field_groups() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::INPUT_FIELD_GROUPS,
            "description": "An array of input field groups.",
            "type": "array",
            "items": ref_to(ids::INPUT_FIELD_GROUP),
            "examples": [[], [{"key": "account"}, {"key": "billing", "label": "Billing"}]],
            "antiExamples": [
                {"example": [{}], "reason": "A group without a key."},
                {"example": {"key": "account"}, "reason": "Must be an array."}
            ]
        }),
        &[ids::INPUT_FIELD_GROUP],
    )
}
