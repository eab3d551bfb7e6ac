use serde::Serialize;
use serde_json::Value;

use crate::catalog::ids;
use crate::config::SchemaConfig;
use crate::error::ValidationError;
use crate::files_reader::DefinitionFileReader;
use crate::schema::{AntiExample, SchemaError};
use crate::self_test::{ExampleFailure, check_catalog};
use crate::validate::{AppValidator, ExportedSchemas};

/// Source label for definitions that did not come from a file.
pub const INLINE_SOURCE: &str = "<inline>";

#[derive(Debug, Clone, Serialize)]
pub struct DefinitionValidationResult {
    pub source: String,
    pub schema_id: String,
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    /// Set when the definition could not be validated at all (unreadable
    /// file, unknown schema).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl DefinitionValidationResult {
    fn failed(source: &str, schema_id: &str, error: String) -> Self {
        DefinitionValidationResult {
            source: source.to_owned(),
            schema_id: schema_id.to_owned(),
            valid: false,
            errors: Vec::new(),
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PathsValidationResult {
    pub ok: bool,
    pub count: usize,
    pub results: Vec<DefinitionValidationResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaSummary {
    pub id: String,
    pub dependencies: Vec<String>,
    pub examples: usize,
    pub anti_examples: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaListResult {
    pub count: usize,
    pub schemas: Vec<SchemaSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetSchemaResult {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    pub examples: Vec<Value>,
    pub anti_examples: Vec<AntiExample>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamplesCheckResult {
    pub ok: bool,
    pub checked: usize,
    pub failures: Vec<ExampleFailure>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

/// Entry points shared by the CLI and the HTTP service.
#[derive(Debug)]
pub struct AppSchemaOps {
    pub verbose: usize,
    pub cfg: SchemaConfig,
    validator: AppValidator,
}

impl AppSchemaOps {
    /// Loads the config (see [`SchemaConfig::load`]) and builds the catalog.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] when the built-in catalog is inconsistent.
    pub fn new(config: Option<&str>, verbose: usize) -> Result<Self, SchemaError> {
        let cfg = SchemaConfig::load(config);
        let validator = AppValidator::builtin(cfg.clone())?;
        Ok(AppSchemaOps {
            verbose,
            cfg,
            validator,
        })
    }

    #[must_use]
    pub fn validator(&self) -> &AppValidator {
        &self.validator
    }

    #[must_use]
    pub fn validate_definition(&self, definition: &Value) -> DefinitionValidationResult {
        self.validate_against(ids::APP, definition)
    }

    #[must_use]
    pub fn validate_against(&self, schema_id: &str, definition: &Value) -> DefinitionValidationResult {
        self.validate_source(INLINE_SOURCE, schema_id, definition)
    }

    fn validate_source(&self, source: &str, schema_id: &str, definition: &Value) -> DefinitionValidationResult {
        match self.validator.validate(schema_id, definition) {
            Ok(outcome) => DefinitionValidationResult {
                source: source.to_owned(),
                schema_id: schema_id.to_owned(),
                valid: outcome.valid,
                errors: outcome.errors,
                error: String::new(),
            },
            Err(e) => DefinitionValidationResult::failed(source, schema_id, e.to_string()),
        }
    }

    /// Validates every definition file found under `paths` against
    /// `schema_id` (the app schema when `None`).
    #[must_use]
    pub fn validate_paths(&self, paths: &[String], schema_id: Option<&str>) -> PathsValidationResult {
        let schema_id = schema_id.unwrap_or(ids::APP);
        let mut reader = DefinitionFileReader::new(paths);

        let results: Vec<DefinitionValidationResult> = reader
            .read_all()
            .into_iter()
            .map(|loaded| match loaded {
                Ok(file) => self.validate_source(&file.path, schema_id, &file.content),
                Err(e) => DefinitionValidationResult::failed(e.path(), schema_id, e.to_string()),
            })
            .collect();

        if results.is_empty() {
            tracing::warn!("No definition files found under {paths:?}");
        }
        PathsValidationResult {
            ok: !results.is_empty() && results.iter().all(|r| r.valid),
            count: results.len(),
            results,
        }
    }

    /// # Errors
    /// Returns a [`SchemaError`] when the app schema's closure cannot be built.
    pub fn export_schema(&self) -> Result<ExportedSchemas, SchemaError> {
        self.validator.export_schema()
    }

    #[must_use]
    pub fn get_schema(&self, id: &str) -> GetSchemaResult {
        match self.validator.registry().get(id) {
            Some(schema) => GetSchemaResult {
                id: id.to_owned(),
                schema: Some(schema.body().clone()),
                examples: schema.examples().to_vec(),
                anti_examples: schema.anti_examples().to_vec(),
                error: String::new(),
            },
            None => GetSchemaResult {
                id: id.to_owned(),
                schema: None,
                examples: Vec::new(),
                anti_examples: Vec::new(),
                error: format!("Schema '{id}' is not registered"),
            },
        }
    }

    #[must_use]
    pub fn list_schemas(&self) -> SchemaListResult {
        let schemas: Vec<SchemaSummary> = self
            .validator
            .registry()
            .schemas()
            .map(|schema| SchemaSummary {
                id: schema.id().to_owned(),
                dependencies: schema.dependencies().to_vec(),
                examples: schema.examples().len(),
                anti_examples: schema.anti_examples().len(),
            })
            .collect();
        SchemaListResult {
            count: schemas.len(),
            schemas,
        }
    }

    #[must_use]
    pub fn check_examples(&self) -> ExamplesCheckResult {
        let checked = self.validator.registry().len();
        match check_catalog(&self.validator) {
            Ok(failures) => ExamplesCheckResult {
                ok: failures.is_empty(),
                checked,
                failures,
                error: String::new(),
            },
            Err(e) => ExamplesCheckResult {
                ok: false,
                checked,
                failures: Vec::new(),
                error: e.to_string(),
            },
        }
    }
}
