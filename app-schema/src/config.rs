use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_PATH: &str = "app-schema.config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings that shape the output of a validation run: the catalog version
/// and the base URLs documentation links are built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaConfig {
    pub version: String,
    pub code_base_url: String,
    pub docs_base_url: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        SchemaConfig {
            version: env!("CARGO_PKG_VERSION").to_owned(),
            code_base_url: "https://github.com/app-schema/app-schema".to_owned(),
            docs_base_url: "https://docs.app-schema.dev/schema".to_owned(),
        }
    }
}

impl SchemaConfig {
    /// Loads the config from `path`, then from [`DEFAULT_PATH`], then falls
    /// back to defaults. Fields missing from a file keep their defaults.
    #[must_use]
    pub fn load(path: Option<&str>) -> Self {
        if let Some(path) = path {
            match Self::from_path(Path::new(path)) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!("Ignoring config {path}: {e}"),
            }
        }

        let default_path = Path::new(DEFAULT_PATH);
        if default_path.is_file() {
            match Self::from_path(default_path) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!("Ignoring config {DEFAULT_PATH}: {e}"),
            }
        }

        SchemaConfig::default()
    }

    /// # Errors
    /// Returns a [`ConfigError`] if the file cannot be read or is not a JSON
    /// object of config fields.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Link to the source of a named schema, e.g.
    /// `.../blob/app-schema@1.0.0/schemas/FieldSchema.json`.
    #[must_use]
    pub fn code_link(&self, schema_id: &str) -> String {
        format!(
            "{}/blob/app-schema@{}/schemas/{}.json",
            self.code_base_url.trim_end_matches('/'),
            self.version,
            schema_name(schema_id)
        )
    }

    /// Link to the documentation anchor of a named schema.
    #[must_use]
    pub fn doc_link(&self, schema_id: &str) -> String {
        format!(
            "{}/{}/schema.html#{}",
            self.docs_base_url.trim_end_matches('/'),
            self.version,
            schema_name(schema_id).to_lowercase()
        )
    }
}

fn schema_name(schema_id: &str) -> &str {
    schema_id.trim_start_matches('/')
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_version_is_crate_version() {
        assert_eq!(SchemaConfig::default().version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"version": "15.0.0"}}"#).unwrap();

        let cfg = SchemaConfig::from_path(file.path()).unwrap();
        assert_eq!(cfg.version, "15.0.0");
        assert_eq!(cfg.code_base_url, SchemaConfig::default().code_base_url);
    }

    #[test]
    fn test_load_falls_back_on_bad_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let path = file.path().to_string_lossy().to_string();
        assert!(SchemaConfig::from_path(file.path()).is_err());
        assert_eq!(SchemaConfig::load(Some(&path)).code_base_url, SchemaConfig::default().code_base_url);
    }

    #[test]
    fn test_links() {
        let cfg = SchemaConfig {
            version: "2.1.0".to_owned(),
            code_base_url: "https://example.com/repo/".to_owned(),
            docs_base_url: "https://docs.example.com".to_owned(),
        };
        assert_eq!(
            cfg.code_link("/FieldSchema"),
            "https://example.com/repo/blob/app-schema@2.1.0/schemas/FieldSchema.json"
        );
        assert_eq!(
            cfg.doc_link("/FieldSchema"),
            "https://docs.example.com/2.1.0/schema.html#fieldschema"
        );
    }
}
