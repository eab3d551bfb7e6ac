use serde_json::json;

use super::{ids, ref_to, request_or_function};
use crate::schema::{Schema, SchemaError};

pub(super) fn schemas() -> Result<Vec<Schema>, SchemaError> {
    Ok(vec![
        authentication()?,
        empty_config(ids::AUTHENTICATION_BASIC_CONFIG, "Config for Basic Authentication. No extra properties are required to set up Basic Auth, so you can leave this empty.")?,
        empty_config(ids::AUTHENTICATION_CUSTOM_CONFIG, "Config for custom authentication (like API keys). No extra properties are required to set up this auth type, so you can leave this empty.")?,
        empty_config(ids::AUTHENTICATION_DIGEST_CONFIG, "Config for Digest Authentication. No extra properties are required to set up Digest Auth, so you can leave this empty.")?,
        oauth1_config()?,
        oauth2_config()?,
        session_config()?,
    ])
}

fn empty_config(id: &str, description: &str) -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": id,
            "description": description,
            "type": "object",
            "properties": {},
            "additionalProperties": false,
            "examples": [{}],
            "antiExamples": [
                {"example": {"foo": true}, "reason": "No settings are supported."},
                {"example": [], "reason": "Must be an object."}
            ]
        }),
        &[],
    )
}

fn oauth1_config() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::AUTHENTICATION_OAUTH1_CONFIG,
            "description": "Config for OAuth1 authentication.",
            "type": "object",
            "required": ["getRequestToken", "authorizeUrl", "getAccessToken"],
            "properties": {
                "getRequestToken": request_or_function(),
                "authorizeUrl": request_or_function(),
                "getAccessToken": request_or_function()
            },
            "additionalProperties": false,
            "examples": [{
                "getRequestToken": {"method": "POST", "url": "https://example.com/request-token"},
                "authorizeUrl": {"url": "https://example.com/authorize"},
                "getAccessToken": "$func$2$f$"
            }],
            "antiExamples": [
                {"example": {"authorizeUrl": "$func$2$f$"}, "reason": "Missing the token requests."},
                {
                    "example": {"getRequestToken": "$func$2$f$", "authorizeUrl": "https://example.com", "getAccessToken": "$func$2$f$"},
                    "reason": "authorizeUrl must be a request or a function, not a bare URL."
                }
            ]
        }),
        &[ids::REQUEST, ids::FUNCTION],
    )
}

fn oauth2_config() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::AUTHENTICATION_OAUTH2_CONFIG,
            "description": "Config for OAuth2 authentication.",
            "type": "object",
            "required": ["authorizeUrl", "getAccessToken"],
            "properties": {
                "authorizeUrl": request_or_function(),
                "getAccessToken": request_or_function(),
                "refreshAccessToken": request_or_function(),
                "codeParam": {"description": "Define a non-standard code param the platform should scrape instead.", "type": "string", "minLength": 1},
                "scope": {"description": "What scope should the platform request?", "type": "string"},
                "autoRefresh": {"description": "Should the platform invoke refreshAccessToken when a request is rejected?", "type": "boolean"},
                "enablePkce": {"description": "Should the platform use PKCE for this app?", "type": "boolean"}
            },
            "additionalProperties": false,
            "examples": [
                {"authorizeUrl": {"url": "https://example.com/oauth/authorize"}, "getAccessToken": "$func$2$f$"},
                {
                    "authorizeUrl": "$func$2$f$",
                    "getAccessToken": {"method": "POST", "url": "https://example.com/oauth/token"},
                    "refreshAccessToken": "$func$2$f$",
                    "scope": "read,write",
                    "autoRefresh": true
                }
            ],
            "antiExamples": [
                {"example": {"authorizeUrl": "$func$2$f$"}, "reason": "Missing getAccessToken."},
                {"example": {"authorizeUrl": "$func$2$f$", "getAccessToken": "$func$2$f$", "autoRefresh": "yes"}, "reason": "autoRefresh is a boolean."}
            ]
        }),
        &[ids::REQUEST, ids::FUNCTION],
    )
}

fn session_config() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::AUTHENTICATION_SESSION_CONFIG,
            "description": "Config for session authentication.",
            "type": "object",
            "required": ["perform"],
            "properties": {
                "perform": request_or_function()
            },
            "additionalProperties": false,
            "examples": [{"perform": {"require": "some/path/to/file.js"}}],
            "antiExamples": [
                {"example": {}, "reason": "Missing perform."},
                {"example": {"perform": "funcy"}, "reason": "perform is neither a request nor a function."}
            ]
        }),
        &[ids::REQUEST, ids::FUNCTION],
    )
}

fn authentication() -> Result<Schema, SchemaError> {
    Schema::define(
        json!({
            "id": ids::AUTHENTICATION,
            "description": "Represents authentication schemes.",
            "type": "object",
            "required": ["type", "test"],
            "properties": {
                "type": {
                    "description": "Choose which scheme you want to use.",
                    "type": "string",
                    "enum": ["basic", "custom", "digest", "oauth1", "oauth2", "session"]
                },
                "test": request_or_function(),
                "fields": ref_to(ids::FIELDS),
                "connectionLabel": {
                    "description": "A string with variables, function, or request that returns the connection label for the authenticated user.",
                    "anyOf": [ref_to(ids::REQUEST), ref_to(ids::FUNCTION), {"type": "string"}]
                },
                "basicConfig": ref_to(ids::AUTHENTICATION_BASIC_CONFIG),
                "customConfig": ref_to(ids::AUTHENTICATION_CUSTOM_CONFIG),
                "digestConfig": ref_to(ids::AUTHENTICATION_DIGEST_CONFIG),
                "oauth1Config": ref_to(ids::AUTHENTICATION_OAUTH1_CONFIG),
                "oauth2Config": ref_to(ids::AUTHENTICATION_OAUTH2_CONFIG),
                "sessionConfig": ref_to(ids::AUTHENTICATION_SESSION_CONFIG)
            },
            "additionalProperties": false,
            "examples": [
                {"type": "basic", "test": "$func$2$f$"},
                {"type": "custom", "test": "$func$2$f$", "fields": [{"key": "apiKey", "type": "password"}], "connectionLabel": "{{bundle.inputData.email}}"},
                {
                    "type": "oauth2",
                    "test": {"url": "https://example.com/me"},
                    "oauth2Config": {"authorizeUrl": {"url": "https://example.com/oauth/authorize"}, "getAccessToken": "$func$2$f$"},
                    "connectionLabel": "$func$2$f$"
                }
            ],
            "antiExamples": [
                {"example": {}, "reason": "Missing the type and test."},
                {"example": {"type": "password", "test": "$func$2$f$"}, "reason": "Unknown authentication type."},
                {"example": {"type": "oauth2", "test": "not-an-object"}, "reason": "test must be a request or a function."},
                {"example": {"type": "basic", "test": "$func$2$f$", "fields": [{}]}, "reason": "A field without a key."}
            ]
        }),
        &[
            ids::REQUEST,
            ids::FUNCTION,
            ids::FIELDS,
            ids::AUTHENTICATION_BASIC_CONFIG,
            ids::AUTHENTICATION_CUSTOM_CONFIG,
            ids::AUTHENTICATION_DIGEST_CONFIG,
            ids::AUTHENTICATION_OAUTH1_CONFIG,
            ids::AUTHENTICATION_OAUTH2_CONFIG,
            ids::AUTHENTICATION_SESSION_CONFIG,
        ],
    )
}
