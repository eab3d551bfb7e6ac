use serde_json::json;

use super::{ids, ref_to};
use crate::schema::{Schema, SchemaError};

pub(super) fn schemas() -> Result<Vec<Schema>, SchemaError> {
    Ok(vec![
        key()?,
        version()?,
        flat_object()?,
        function_require()?,
        function_source()?,
        function()?,
        ref_resource()?,
        request()?,
        middlewares()?,
        hydrators()?,
        app_flags()?,
        throttle_object()?,
        lock_object()?,
    ])
}

fn key() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::KEY,
            "description": "A unique identifier for this item.",
            "type": "string",
            "minLength": 2,
            "pattern": "^[a-zA-Z]+[a-zA-Z0-9_]*$",
            "examples": ["vk", "validKey", "ValidKey", "valid_key", "valid_Key", "validKey2"],
            "antiExamples": [
                {"example": "a", "reason": "Too short."},
                {"example": "1", "reason": "Cannot start with a number."},
                {"example": "invalid-key", "reason": "Dashes are not allowed."},
                {"example": "_key", "reason": "Cannot start with an underscore."}
            ]
        }),
        &[],
    )
}

fn version() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::VERSION,
            "description": "Represents a simplified semver string, from `0.0.0` to `999.999.999`.",
            "type": "string",
            "pattern": r"^[0-9]+\.[0-9]+\.[0-9]+$",
            "examples": ["1.0.0", "2.11.3", "999.999.999"],
            "antiExamples": [
                {"example": "1.0", "reason": "Missing the patch version."},
                {"example": "v1.0.0", "reason": "No leading v."},
                {"example": 1, "reason": "Must be a string."}
            ]
        }),
        &[],
    )
}

fn flat_object() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::FLAT_OBJECT,
            "description": "An object whose values can only be primitives.",
            "type": "object",
            "additionalProperties": {"type": ["null", "boolean", "integer", "number", "string"]},
            "examples": [
                {"a": "b"},
                {"a": 1, "b": true, "c": null}
            ],
            "antiExamples": [
                {"example": {"a": {"b": "c"}}, "reason": "Nested objects are not allowed."},
                {"example": {"a": [1, 2]}, "reason": "Arrays are not allowed."},
                {"example": "a", "reason": "Must be an object."}
            ]
        }),
        &[],
    )
}

fn function_require() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::FUNCTION_REQUIRE,
            "description": "A path to a file that might have content like `module.exports = (z, bundle) => [{id: 123}];`.",
            "type": "object",
            "required": ["require"],
            "properties": {
                "require": {"type": "string"}
            },
            "additionalProperties": false,
            "examples": [{"require": "some/path/to/file.js"}],
            "antiExamples": [
                {"example": {}, "reason": "Missing the require property."},
                {"example": {"require": 1}, "reason": "The path must be a string."},
                {"example": {"require": "a.js", "source": "return 1"}, "reason": "Cannot also carry source."}
            ]
        }),
        &[],
    )
}

fn function_source() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::FUNCTION_SOURCE,
            "description": "Source code like `{source: \"return 1 + 2\"}` which the system will wrap in a function for you.",
            "type": "object",
            "required": ["source"],
            "properties": {
                "source": {
                    "type": "string",
                    "pattern": "return",
                    "description": "JavaScript code for the function body. This must end with a `return` statement."
                },
                "args": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Function signature. Defaults to `['z', 'bundle']` if not specified."
                }
            },
            "additionalProperties": false,
            "examples": [
                {"source": "return 1 + 2"},
                {"args": ["x", "y"], "source": "return x + y;"}
            ],
            "antiExamples": [
                {"example": {"source": "1 + 2"}, "reason": "The source must contain a return statement."},
                {"example": {"args": ["x"]}, "reason": "Missing the source property."},
                {"example": {"source": "return 1", "args": [1]}, "reason": "Arguments must be names."}
            ]
        }),
        &[],
    )
}

fn function() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::FUNCTION,
            "description": "Internal pointer to a function from the original source or the source code itself. Encodes arity and if `arguments` is used in the body.",
            "oneOf": [
                {"type": "string", "pattern": r"^\$func\$\d+\$f\$$"},
                ref_to(ids::FUNCTION_REQUIRE),
                ref_to(ids::FUNCTION_SOURCE)
            ],
            "examples": [
                "$func$0$f$",
                "$func$2$f$",
                {"require": "some/path/to/file.js"},
                {"source": "return 1 + 2"}
            ],
            "antiExamples": [
                {"example": "funcy", "reason": "Not a function pointer."},
                {"example": {"source": "1 + 2"}, "reason": "Source without a return statement."},
                {"example": 123, "reason": "Must be a pointer or an object."}
            ]
        }),
        &[ids::FUNCTION_REQUIRE, ids::FUNCTION_SOURCE],
    )
}

fn ref_resource() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::REF_RESOURCE,
            "description": "Reference a resource by key and the data it returns. In the format of: `{resource_key}.{foreign_key}(,{human_label_key})`.",
            "type": "string",
            "pattern": r"^[a-zA-Z0-9_]+\.[a-zA-Z0-9_\s\[\]]+(,[a-zA-Z0-9_\s\[\]]+)?$",
            "examples": ["contact.id", "contact.id,name", "contact.email,first_name"],
            "antiExamples": [
                {"example": "contact", "reason": "Missing the foreign key."},
                {"example": "contact.id,name,email", "reason": "Only one human label key is allowed."}
            ]
        }),
        &[],
    )
}

fn request() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::REQUEST,
            "description": "A representation of a HTTP request. You can use `{{syntax}}` to inject authentication, field or global variables.",
            "type": "object",
            "properties": {
                "method": {
                    "description": "The HTTP method for the request.",
                    "type": "string",
                    "default": "GET",
                    "enum": ["GET", "PUT", "POST", "PATCH", "DELETE", "HEAD"]
                },
                "url": {
                    "description": "A URL for the request (we will parse the querystring and merge with params). Keys and values will not be re-encoded.",
                    "type": "string"
                },
                "body": {
                    "description": "Can be nothing, a raw string or JSON (object or array).",
                    "type": ["null", "string", "object", "array"]
                },
                "params": ref_to(ids::FLAT_OBJECT),
                "headers": ref_to(ids::FLAT_OBJECT),
                "auth": {
                    "description": "An object holding the auth parameters for OAuth1 request signing, or an array of username and password.",
                    "anyOf": [
                        {"type": "array", "items": {"type": "string"}},
                        ref_to(ids::FLAT_OBJECT)
                    ]
                },
                "removeMissingValuesFrom": {
                    "description": "Should missing values be sent? (empty strings, `null`, and `undefined` only)",
                    "type": "object",
                    "properties": {
                        "params": {"type": "boolean", "default": false},
                        "body": {"type": "boolean", "default": false}
                    },
                    "additionalProperties": false
                },
                "serializeValueForCurlies": {"type": "boolean"},
                "skipThrowForStatus": {"type": "boolean", "default": false},
                "omitEmptyParams": {"type": "boolean", "default": false}
            },
            "additionalProperties": false,
            "examples": [
                {},
                {"method": "GET", "url": "https://example.com"},
                {
                    "url": "https://{{bundle.authData.subdomain}}.example.com/v2/items",
                    "headers": {"X-Api-Key": "{{bundle.authData.apiKey}}"},
                    "params": {"limit": 100, "archived": false},
                    "removeMissingValuesFrom": {"params": true}
                }
            ],
            "antiExamples": [
                {"example": {"method": "GO"}, "reason": "Unknown HTTP method."},
                {"example": {"url": 42}, "reason": "The url must be a string."},
                {"example": {"headers": {"X-Nested": {"a": "b"}}}, "reason": "Headers must be flat."},
                {"example": {"require": "some/path.js"}, "reason": "Functions are not requests."}
            ]
        }),
        &[ids::FLAT_OBJECT],
    )
}

fn middlewares() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::MIDDLEWARES,
            "description": "List of before or after middlewares. Can be an array of functions or a single function.",
            "oneOf": [
                {"type": "array", "items": ref_to(ids::FUNCTION)},
                ref_to(ids::FUNCTION)
            ],
            "examples": [["$func$2$f$", "$func$2$f$"], "$func$2$f$", []],
            "antiExamples": [
                {"example": ["$func$2$f$", "f"], "reason": "Every entry must be a function."},
                {"example": "funcy", "reason": "Not a function."}
            ]
        }),
        &[ids::FUNCTION],
    )
}

fn hydrators() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::HYDRATORS,
            "description": "A bank of named functions that you can use in `z.hydrate('someName')` to lazily load data.",
            "type": "object",
            "patternProperties": {
                "^[a-zA-Z]+$": ref_to(ids::FUNCTION)
            },
            "additionalProperties": false,
            "examples": [{"hydrateFile": "$func$2$f$"}, {}],
            "antiExamples": [
                {"example": {"hydrate_file": "$func$2$f$"}, "reason": "Names may only contain letters."},
                {"example": {"hydrateFile": "funcy"}, "reason": "Values must be functions."}
            ]
        }),
        &[ids::FUNCTION],
    )
}

fn app_flags() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::APP_FLAGS,
            "description": "Codifies high-level options for your app.",
            "type": "object",
            "properties": {
                "skipHttpPatch": {
                    "description": "Skip patching the built-in http modules when making requests.",
                    "type": "boolean"
                },
                "cleanInputData": {
                    "description": "Remove empty values from input data before it reaches the app.",
                    "type": "boolean"
                }
            },
            "additionalProperties": false,
            "examples": [{"skipHttpPatch": true}, {"skipHttpPatch": false, "cleanInputData": true}, {}],
            "antiExamples": [
                {"example": {"skipHttpPatch": "yes"}, "reason": "Flags are booleans."},
                {"example": {"foo": true}, "reason": "Unknown flag."}
            ]
        }),
        &[],
    )
}

fn throttle_object() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::THROTTLE_OBJECT,
            "description": "Enables throttling for an action or the whole app.",
            "type": "object",
            "required": ["window", "limit"],
            "properties": {
                "window": {
                    "description": "The timeframe, in seconds, within which the system tracks the number of invocations.",
                    "type": "integer",
                    "minimum": 0
                },
                "limit": {
                    "description": "The maximum number of invocations allowed within the window.",
                    "type": "integer",
                    "minimum": 0
                },
                "key": {
                    "description": "The key to throttle with in combination with the scope.",
                    "type": "string",
                    "minLength": 1
                },
                "scope": {
                    "description": "The level at which an app's access is restricted to.",
                    "type": "array",
                    "items": {"enum": ["user", "auth", "account"]}
                },
                "retry": {
                    "description": "Whether the invocation should be retried once the throttle window has passed.",
                    "type": "boolean"
                }
            },
            "additionalProperties": false,
            "examples": [
                {"window": 60, "limit": 10},
                {"window": 0, "limit": 0, "scope": ["user", "auth"]},
                {"window": 60, "limit": 100, "key": "test-key-{{bundle.inputData.name}}", "retry": false}
            ],
            "antiExamples": [
                {"example": {"window": 60}, "reason": "Missing the limit."},
                {"example": {"window": -1, "limit": 10}, "reason": "The window cannot be negative."},
                {"example": {"window": 60, "limit": 10, "scope": ["everyone"]}, "reason": "Unknown scope."},
                {"example": {"window": 60, "limit": 10, "overrides": []}, "reason": "Unknown property."}
            ]
        }),
        &[],
    )
}

fn lock_object() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::LOCK_OBJECT,
            "description": "Config for limiting or locking concurrent invocations of an action.",
            "type": "object",
            "required": ["key"],
            "properties": {
                "key": {
                    "description": "The key to use for locking. This can use the bundle data.",
                    "type": "string",
                    "minLength": 1
                },
                "scope": {
                    "description": "Which level the lock applies to. By default the lock is per app.",
                    "type": "array",
                    "items": {"enum": ["user", "auth", "account"]}
                },
                "timeout": {
                    "description": "Seconds before the lock is released automatically.",
                    "type": "integer",
                    "minimum": 1
                }
            },
            "additionalProperties": false,
            "examples": [
                {"key": "{{bundle.inputData.id}}"},
                {"key": "{{bundle.inputData.id}}", "scope": ["user"], "timeout": 120}
            ],
            "antiExamples": [
                {"example": {"scope": ["user"]}, "reason": "Missing the key."},
                {"example": {"key": ""}, "reason": "The key cannot be empty."},
                {"example": {"key": "k", "scope": ["world"]}, "reason": "Unknown scope."}
            ]
        }),
        &[],
    )
}
