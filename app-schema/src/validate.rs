use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::catalog::{builtin_registry, ids};
use crate::config::SchemaConfig;
use crate::constraints::ConstraintEngine;
use crate::error::ValidationOutcome;
use crate::refine::ErrorRefiner;
use crate::registry::SchemaRegistry;
use crate::schema::SchemaError;
use crate::validator::{EngineError, StructuralValidator};

/// The flattened, versioned catalog handed to documentation and editor tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedSchemas {
    pub version: String,
    pub schemas: BTreeMap<String, Value>,
}

/// Full validation pipeline: structural pass, then functional constraints,
/// then refinement of the combined error list.
///
/// Read-only once built, so one instance can serve concurrent validations.
#[derive(Debug)]
pub struct AppValidator {
    registry: SchemaRegistry,
    constraints: ConstraintEngine,
    config: SchemaConfig,
}

impl AppValidator {
    #[must_use]
    pub fn new(registry: SchemaRegistry, constraints: ConstraintEngine, config: SchemaConfig) -> Self {
        Self {
            registry,
            constraints,
            config,
        }
    }

    /// Built-in catalog and constraints.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] when the built-in catalog is inconsistent.
    pub fn builtin(config: SchemaConfig) -> Result<Self, SchemaError> {
        Ok(Self::new(builtin_registry()?, ConstraintEngine::builtin(), config))
    }

    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    #[must_use]
    pub fn constraints(&self) -> &ConstraintEngine {
        &self.constraints
    }

    #[must_use]
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Validates `definition` against the schema registered as `schema_id`.
    ///
    /// # Errors
    /// Returns an [`EngineError`] when `schema_id` is unknown or the catalog
    /// holds an unresolvable `$ref`. Problems in `definition` are reported in
    /// the outcome instead.
    pub fn validate(&self, schema_id: &str, definition: &Value) -> Result<ValidationOutcome, EngineError> {
        let structural = StructuralValidator::new(&self.registry, schema_id)?;
        let mut errors = structural.validate(definition)?;
        errors.extend(self.constraints.run(definition, structural.root()));

        let refined = ErrorRefiner::new(&structural, &self.config).refine(errors)?;
        tracing::debug!("Validated definition against {schema_id}: {} error(s)", refined.len());
        Ok(ValidationOutcome::from_errors(refined))
    }

    /// Validates a whole app definition.
    ///
    /// # Errors
    /// See [`AppValidator::validate`].
    pub fn validate_definition(&self, definition: &Value) -> Result<ValidationOutcome, EngineError> {
        self.validate(ids::APP, definition)
    }

    /// Every schema reachable from the app schema, without examples.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] when the app schema's closure cannot be built.
    pub fn export_schema(&self) -> Result<ExportedSchemas, SchemaError> {
        Ok(ExportedSchemas {
            version: self.config.version.clone(),
            schemas: self.registry.export_closure(ids::APP)?,
        })
    }
}
