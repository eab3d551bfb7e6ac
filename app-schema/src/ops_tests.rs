#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use crate::catalog::ids;
    use crate::ops::{AppSchemaOps, INLINE_SOURCE};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn ops() -> AppSchemaOps {
        AppSchemaOps::new(Some("/nonexistent/app-schema.config.json"), 0).unwrap()
    }

    #[test]
    fn test_validate_definition_valid() {
        let result = ops().validate_definition(&json!({"version": "1.0.0", "platformVersion": "1.0.0"}));
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.error.is_empty());
        assert_eq!(result.source, INLINE_SOURCE);
        assert_eq!(result.schema_id, ids::APP);
    }

    #[test]
    fn test_validate_definition_invalid() {
        let result = ops().validate_definition(&json!({"version": "1.0.0"}));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].stack(), "instance requires property \"platformVersion\"");
    }

    #[test]
    fn test_validate_against_named_schema() {
        let ops = ops();
        assert!(ops.validate_against(ids::KEY, &json!("new_recipe")).valid);

        let result = ops.validate_against(ids::KEY, &json!("1recipe"));
        assert!(!result.valid);
        assert_eq!(result.errors[0].name, "pattern");
    }

    #[test]
    fn test_validate_against_unknown_schema() {
        let result = ops().validate_against("/MissingSchema", &json!({}));
        assert!(!result.valid);
        assert!(result.errors.is_empty());
        assert!(result.error.contains("/MissingSchema"));
    }

    #[test]
    fn test_validate_paths_mixed() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("good.json"),
            r#"{"version": "1.0.0", "platformVersion": "1.0.0"}"#,
        )
        .unwrap();
        fs::write(temp_dir.path().join("partial.yaml"), "version: 1.0.0\n").unwrap();
        fs::write(temp_dir.path().join("broken.json"), "{").unwrap();

        let path = temp_dir.path().to_string_lossy().to_string();
        let result = ops().validate_paths(&[path], None);

        assert!(!result.ok);
        assert_eq!(result.count, 3);
        // sorted by file name: broken, good, partial
        assert!(result.results[0].error.starts_with("Invalid JSON"));
        assert!(result.results[0].source.ends_with("broken.json"));
        assert!(result.results[1].valid);
        assert!(!result.results[2].valid);
        assert_eq!(result.results[2].errors.len(), 1);
    }

    #[test]
    fn test_validate_paths_nothing_found() {
        let result = ops().validate_paths(&["/nonexistent/definitions".to_owned()], None);
        assert!(!result.ok);
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_get_schema() {
        let ops = ops();
        let found = ops.get_schema(ids::FIELD);
        assert!(found.error.is_empty());
        let schema = found.schema.unwrap();
        assert_eq!(schema["id"], ids::FIELD);
        assert!(schema.get("examples").is_none());
        assert!(!found.examples.is_empty());
        assert!(!found.anti_examples.is_empty());

        let missing = ops.get_schema("/NopeSchema");
        assert!(missing.schema.is_none());
        assert!(missing.error.contains("/NopeSchema"));
    }

    #[test]
    fn test_list_schemas_in_catalog_order() {
        let result = ops().list_schemas();
        assert_eq!(result.count, result.schemas.len());
        assert_eq!(result.schemas[0].id, ids::APP);
        assert!(result.schemas.iter().all(|s| s.examples > 0 && s.anti_examples > 0));

        let field = result.schemas.iter().find(|s| s.id == ids::FIELD).unwrap();
        assert!(field.dependencies.iter().any(|d| d == ids::FIELD_CHOICES));
    }

    #[test]
    fn test_export_schema() {
        let ops = ops();
        let exported = ops.export_schema().unwrap();
        assert_eq!(exported.version, ops.cfg.version);
        assert!(exported.schemas.contains_key(ids::APP));
        assert!(exported.schemas.contains_key(ids::AUTHENTICATION));
    }

    #[test]
    fn test_check_examples() {
        let ops = ops();
        let result = ops.check_examples();
        assert!(result.ok, "{:#?}", result.failures);
        assert_eq!(result.checked, ops.list_schemas().count);
    }

    #[test]
    fn test_results_serialize_without_empty_error() {
        let result = ops().validate_definition(&json!({"version": "1.0.0", "platformVersion": "1.0.0"}));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["valid"], true);
        assert!(value.get("error").is_none());
    }
}
