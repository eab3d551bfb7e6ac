#![recursion_limit = "256"]

pub mod catalog;
pub mod config;
pub mod constraints;
pub mod error;
pub mod files_reader;
pub mod ops;
pub mod path;
pub mod refine;
pub mod registry;
pub mod schema;
pub mod self_test;
pub mod validate;
pub mod validator;

#[cfg(test)]
#[path = "ops_tests.rs"]
mod ops_tests;


// Re-export commonly used types
pub use config::{ConfigError, SchemaConfig};
pub use constraints::{ConstraintEngine, FunctionalConstraint};
pub use error::{ValidationError, ValidationOutcome};
pub use files_reader::{DefinitionFile, DefinitionFileReader, ReaderError};
pub use ops::AppSchemaOps;
pub use path::PropertyPath;
pub use refine::ErrorRefiner;
pub use registry::SchemaRegistry;
pub use schema::{Schema, SchemaError};
pub use self_test::{ExampleFailure, ExampleKind};
pub use validate::{AppValidator, ExportedSchemas};
pub use validator::{EngineError, StructuralValidator};
