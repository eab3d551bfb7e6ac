use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const EXCLUDE_LIST: &[&str] = &["node_modules", "dist", "build", "target", ".git"];
const VALID_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid YAML in {path}: {message}")]
    Yaml { path: String, message: String },
}

impl ReaderError {
    /// The file the error refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            ReaderError::Io { path, .. } | ReaderError::Json { path, .. } | ReaderError::Yaml { path, .. } => path,
        }
    }
}

/// One definition loaded from disk.
#[derive(Debug, Clone)]
pub struct DefinitionFile {
    pub path: String,
    pub content: Value,
}

/// Discovers definition files under a set of files and directories.
pub struct DefinitionFileReader {
    paths: Vec<PathBuf>,
    files: Vec<PathBuf>,
    initialized: bool,
}

fn has_valid_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| VALID_EXTENSIONS.contains(&ext.as_str()))
}

impl DefinitionFileReader {
    /// `~` in paths is expanded to the home directory.
    #[must_use]
    pub fn new(paths: &[String]) -> Self {
        let paths = paths
            .iter()
            .map(|p| PathBuf::from(shellexpand::tilde(p).to_string()))
            .collect();

        DefinitionFileReader {
            paths,
            files: Vec::new(),
            initialized: false,
        }
    }

    fn collect_files(&mut self) {
        let mut seen = HashSet::new();
        let mut collected = Vec::new();

        for path in &self.paths {
            let resolved = path.canonicalize().unwrap_or_else(|_| path.clone());

            if resolved.is_file() {
                if has_valid_extension(&resolved) && seen.insert(resolved.clone()) {
                    tracing::debug!("- discovered file: {}", resolved.display());
                    collected.push(resolved);
                }
                continue;
            }
            if !resolved.is_dir() {
                tracing::warn!("Path {} does not exist, skipping", path.display());
                continue;
            }

            let walker = WalkDir::new(&resolved)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| {
                    !(entry.depth() > 0
                        && entry.file_type().is_dir()
                        && EXCLUDE_LIST.contains(&entry.file_name().to_string_lossy().as_ref()))
                });
            for entry in walker.flatten() {
                let file = entry.path();
                if !file.is_file() || !has_valid_extension(file) {
                    continue;
                }
                let canonical = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());
                if seen.insert(canonical.clone()) {
                    tracing::debug!("- discovered file: {}", canonical.display());
                    collected.push(canonical);
                }
            }
        }

        self.files = collected;
        self.initialized = true;
    }

    /// Every definition file found under the configured paths, in discovery
    /// order and without duplicates.
    pub fn files(&mut self) -> &[PathBuf] {
        if !self.initialized {
            self.collect_files();
        }
        &self.files
    }

    /// Parses one file as JSON, or as YAML for `.yaml`/`.yml`.
    ///
    /// # Errors
    /// Returns a [`ReaderError`] when the file cannot be read or parsed.
    pub fn load_file(path: &Path) -> Result<Value, ReaderError> {
        let display = path.to_string_lossy().to_string();
        let content = fs::read_to_string(path).map_err(|source| ReaderError::Io {
            path: display.clone(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "yaml" | "yml" => serde_saphyr::from_str(&content).map_err(|e| ReaderError::Yaml {
                path: display,
                message: e.to_string(),
            }),
            _ => serde_json::from_str(&content).map_err(|source| ReaderError::Json { path: display, source }),
        }
    }

    /// Loads every discovered file. Failures are returned per file so one bad
    /// file does not hide the others.
    pub fn read_all(&mut self) -> Vec<Result<DefinitionFile, ReaderError>> {
        let files = self.files().to_vec();
        files
            .iter()
            .map(|path| {
                let loaded = Self::load_file(path).map(|content| DefinitionFile {
                    path: path.to_string_lossy().to_string(),
                    content,
                });
                if let Err(e) = &loaded {
                    tracing::warn!("{e}");
                }
                loaded
            })
            .collect()
    }
}
