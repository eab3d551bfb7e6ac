//! The built-in schemas describing an integration app definition.
//!
//! Every schema carries examples that must validate and anti-examples that
//! must not; see [`crate::self_test`].

use serde_json::{Value, json};

use crate::registry::SchemaRegistry;
use crate::schema::{Schema, SchemaError};

mod actions;
mod app;
mod auth;
mod fields;
mod operations;
mod primitives;
mod resources;

pub mod ids {
    pub const APP: &str = "/AppSchema";

    pub const KEY: &str = "/KeySchema";
    pub const VERSION: &str = "/VersionSchema";
    pub const FLAT_OBJECT: &str = "/FlatObjectSchema";
    pub const FUNCTION_REQUIRE: &str = "/FunctionRequireSchema";
    pub const FUNCTION_SOURCE: &str = "/FunctionSourceSchema";
    pub const FUNCTION: &str = "/FunctionSchema";
    pub const REF_RESOURCE: &str = "/RefResourceSchema";
    pub const REQUEST: &str = "/RequestSchema";
    pub const MIDDLEWARES: &str = "/MiddlewaresSchema";
    pub const HYDRATORS: &str = "/HydratorsSchema";
    pub const APP_FLAGS: &str = "/AppFlagsSchema";
    pub const THROTTLE_OBJECT: &str = "/ThrottleObjectSchema";
    pub const LOCK_OBJECT: &str = "/LockObjectSchema";

    pub const FIELD_CHOICE_WITH_LABEL: &str = "/FieldChoiceWithLabelSchema";
    pub const FIELD_CHOICES: &str = "/FieldChoicesSchema";
    pub const FIELD_DYNAMIC: &str = "/FieldDynamicSchema";
    pub const FIELD_SEARCH: &str = "/FieldSearchSchema";
    pub const FIELD: &str = "/FieldSchema";
    pub const FIELDS: &str = "/FieldsSchema";
    pub const DYNAMIC_FIELDS: &str = "/DynamicFieldsSchema";
    pub const INPUT_FIELD_GROUP: &str = "/InputFieldGroupSchema";
    pub const INPUT_FIELD_GROUPS: &str = "/InputFieldGroupsSchema";

    pub const BASIC_DISPLAY: &str = "/BasicDisplaySchema";
    pub const BASIC_OPERATION: &str = "/BasicOperationSchema";
    pub const BASIC_POLLING_OPERATION: &str = "/BasicPollingOperationSchema";
    pub const BASIC_HOOK_OPERATION: &str = "/BasicHookOperationSchema";
    pub const BASIC_ACTION_OPERATION: &str = "/BasicActionOperationSchema";
    pub const BUFFER_CONFIG: &str = "/BufferConfigSchema";
    pub const BASIC_CREATE_ACTION_OPERATION: &str = "/BasicCreateActionOperationSchema";

    pub const TRIGGER: &str = "/TriggerSchema";
    pub const TRIGGERS: &str = "/TriggersSchema";
    pub const SEARCH: &str = "/SearchSchema";
    pub const SEARCHES: &str = "/SearchesSchema";
    pub const CREATE: &str = "/CreateSchema";
    pub const CREATES: &str = "/CreatesSchema";
    pub const BULK_READ: &str = "/BulkReadSchema";
    pub const BULK_READS: &str = "/BulkReadsSchema";
    pub const SEARCH_OR_CREATE: &str = "/SearchOrCreateSchema";
    pub const SEARCH_OR_CREATES: &str = "/SearchOrCreatesSchema";

    pub const RESOURCE_METHOD_GET: &str = "/ResourceMethodGetSchema";
    pub const RESOURCE_METHOD_HOOK: &str = "/ResourceMethodHookSchema";
    pub const RESOURCE_METHOD_LIST: &str = "/ResourceMethodListSchema";
    pub const RESOURCE_METHOD_SEARCH: &str = "/ResourceMethodSearchSchema";
    pub const RESOURCE_METHOD_CREATE: &str = "/ResourceMethodCreateSchema";
    pub const RESOURCE: &str = "/ResourceSchema";
    pub const RESOURCES: &str = "/ResourcesSchema";

    pub const AUTHENTICATION_BASIC_CONFIG: &str = "/AuthenticationBasicConfigSchema";
    pub const AUTHENTICATION_CUSTOM_CONFIG: &str = "/AuthenticationCustomConfigSchema";
    pub const AUTHENTICATION_DIGEST_CONFIG: &str = "/AuthenticationDigestConfigSchema";
    pub const AUTHENTICATION_OAUTH1_CONFIG: &str = "/AuthenticationOAuth1ConfigSchema";
    pub const AUTHENTICATION_OAUTH2_CONFIG: &str = "/AuthenticationOAuth2ConfigSchema";
    pub const AUTHENTICATION_SESSION_CONFIG: &str = "/AuthenticationSessionConfigSchema";
    pub const AUTHENTICATION: &str = "/AuthenticationSchema";
}

/// Key pattern shared by every map of named items (triggers, resources, ...).
const KEY_PATTERN: &str = "^[a-zA-Z]+[a-zA-Z0-9_]*$";

fn ref_to(id: &str) -> Value {
    json!({"$ref": id})
}

/// `oneOf` a request description or a function: the usual shape of anything
/// the platform performs.
fn request_or_function() -> Value {
    json!({"oneOf": [ref_to(ids::REQUEST), ref_to(ids::FUNCTION)]})
}

/// A map whose keys follow [`KEY_PATTERN`] and whose values are `item`.
fn keyed_map(id: &str, description: &str, item: &str) -> Value {
    json!({
        "id": id,
        "description": description,
        "type": "object",
        "patternProperties": {KEY_PATTERN: ref_to(item)},
        "additionalProperties": false
    })
}

/// All built-in schemas, the app schema first.
///
/// # Errors
/// Returns a [`SchemaError`] if any built-in body is malformed.
pub fn builtin_schemas() -> Result<Vec<Schema>, SchemaError> {
    let mut schemas = app::schemas()?;
    schemas.extend(auth::schemas()?);
    schemas.extend(actions::schemas()?);
    schemas.extend(resources::schemas()?);
    schemas.extend(operations::schemas()?);
    schemas.extend(fields::schemas()?);
    schemas.extend(primitives::schemas()?);
    Ok(schemas)
}

/// Registry holding every built-in schema, with references checked.
///
/// # Errors
/// Returns a [`SchemaError`] if a body is malformed or a `$ref` dangles.
pub fn builtin_registry() -> Result<SchemaRegistry, SchemaError> {
    SchemaRegistry::from_schemas(builtin_schemas()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_builds() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.ids()[0], ids::APP);
        assert!(registry.get(ids::FIELD).is_some());
    }

    #[test]
    fn test_app_closure_covers_catalog() {
        let registry = builtin_registry().unwrap();
        let closure = registry.closure(ids::APP).unwrap();
        assert_eq!(closure.len(), registry.len());
    }

    #[test]
    fn test_every_schema_ships_examples() {
        let registry = builtin_registry().unwrap();
        for schema in registry.schemas() {
            assert!(!schema.examples().is_empty(), "{} has no examples", schema.id());
            assert!(!schema.anti_examples().is_empty(), "{} has no anti-examples", schema.id());
        }
    }
}
