use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::path::PropertyPath;
use crate::schema::SchemaNode;

/// Machine-readable error categories.
pub mod rule {
    pub const TYPE: &str = "type";
    pub const REQUIRED: &str = "required";
    pub const ENUM: &str = "enum";
    pub const PATTERN: &str = "pattern";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const MINIMUM: &str = "minimum";
    pub const MAXIMUM: &str = "maximum";
    pub const MIN_ITEMS: &str = "minItems";
    pub const MAX_ITEMS: &str = "maxItems";
    pub const MIN_PROPERTIES: &str = "minProperties";
    pub const ADDITIONAL_PROPERTIES: &str = "additionalProperties";
    pub const ONE_OF: &str = "oneOf";
    pub const ANY_OF: &str = "anyOf";
    pub const ALL_OF: &str = "allOf";
    pub const REF_LOOP: &str = "refLoop";

    pub const INVALID_KEY: &str = "invalidKey";
    pub const INVALID: &str = "invalid";
    pub const MISSING: &str = "missing";
    pub const DEEP_NESTING: &str = "deepNesting";
    pub const DUPLICATE: &str = "duplicate";
    pub const INVALID_REFERENCE: &str = "invalidReference";
    pub const INVALID_DEFAULT: &str = "invalidDefault";

    #[must_use]
    pub fn is_composite(name: &str) -> bool {
        matches!(name, ONE_OF | ANY_OF | ALL_OF)
    }
}

/// How a composite candidate is referred to in messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CandidateRef {
    /// A `$ref` to a named schema, rendered `</SchemaId>`.
    Named(String),
    /// An inline sub-schema at the given position, rendered `[subschema N]`.
    Inline(usize),
}

impl CandidateRef {
    #[must_use]
    pub fn schema_id(&self) -> Option<&str> {
        match self {
            CandidateRef::Named(id) => Some(id),
            CandidateRef::Inline(_) => None,
        }
    }
}

impl fmt::Display for CandidateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateRef::Named(id) => write!(f, "<{id}>"),
            CandidateRef::Inline(idx) => write!(f, "[subschema {idx}]"),
        }
    }
}

/// One alternative tried by a composite keyword, kept with its parsed node so
/// the refinement pass can re-validate against it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub reference: CandidateRef,
    pub node: Arc<SchemaNode>,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference && Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Serialize for Candidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.reference)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorArgument {
    Candidates(Vec<Candidate>),
    Value(Value),
}

/// A single structural or functional failure found in a definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub message: String,
    pub property: PropertyPath,
    pub name: String,
    pub argument: Option<ErrorArgument>,
    /// Id of the named schema that rejected the value; `None` for inline
    /// sub-schemas and functional constraints.
    pub schema: Option<String>,
    pub instance: Value,
    pub code_links: Vec<String>,
    pub doc_links: Vec<String>,
}

impl ValidationError {
    #[must_use]
    pub fn new(
        name: &str,
        message: impl Into<String>,
        instance: Value,
        property: PropertyPath,
    ) -> Self {
        Self {
            message: message.into(),
            property,
            name: name.to_owned(),
            argument: None,
            schema: None,
            instance,
            code_links: Vec::new(),
            doc_links: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Option<&str>) -> Self {
        self.schema = schema.map(str::to_owned);
        self
    }

    #[must_use]
    pub fn with_argument(mut self, argument: ErrorArgument) -> Self {
        self.argument = Some(argument);
        self
    }

    /// Moves the error under `prefix`, for errors produced by validating a
    /// nested value on its own.
    #[must_use]
    pub fn relocated(mut self, prefix: &PropertyPath) -> Self {
        self.property = prefix.join(&self.property);
        self
    }

    /// Appends a sentence to the message unless it is already there.
    #[must_use]
    pub fn with_hint(mut self, hint: &str) -> Self {
        if !self.message.ends_with(hint) {
            self.message = format!("{}. {hint}", self.message.trim_end_matches('.'));
        }
        self
    }

    #[must_use]
    pub fn with_links(mut self, code_links: Vec<String>, doc_links: Vec<String>) -> Self {
        self.code_links = code_links;
        self.doc_links = doc_links;
        self
    }

    /// `"<property> <message>"`, e.g. `instance.key does not match pattern "..."`.
    #[must_use]
    pub fn stack(&self) -> String {
        format!("{} {}", self.property, self.message)
    }

    /// Property path without the leading `instance` segment.
    #[must_use]
    pub fn path(&self) -> String {
        self.property.relative()
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        rule::is_composite(&self.name)
    }

    #[must_use]
    pub fn candidates(&self) -> Option<&[Candidate]> {
        match &self.argument {
            Some(ErrorArgument::Candidates(c)) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stack())
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationError", 9)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("property", &self.property)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("argument", &self.argument)?;
        state.serialize_field("stack", &self.stack())?;
        state.serialize_field("schema", &self.schema)?;
        state.serialize_field("instance", &self.instance)?;
        state.serialize_field("codeLinks", &self.code_links)?;
        state.serialize_field("docLinks", &self.doc_links)?;
        state.end()
    }
}

/// Result of validating one definition. `errors` is empty iff `valid`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationOutcome {
    #[must_use]
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_error() -> ValidationError {
        ValidationError::new(
            rule::TYPE,
            "is not of a type(s) object",
            json!("not-an-object"),
            PropertyPath::root().key("test"),
        )
    }

    #[test]
    fn test_stack_combines_property_and_message() {
        assert_eq!(
            sample_error().stack(),
            "instance.test is not of a type(s) object"
        );
    }

    #[test]
    fn test_relocated_prefixes_path() {
        let err = sample_error().relocated(&PropertyPath::root().key("authentication"));
        assert_eq!(err.property.render(), "instance.authentication.test");
        assert_eq!(err.path(), "authentication.test");
        assert_eq!(
            err.stack(),
            "instance.authentication.test is not of a type(s) object"
        );
    }

    #[test]
    fn test_with_hint_applies_once() {
        let hint = "Consult the docs below for valid subschemas.";
        let err = sample_error().with_hint(hint).with_hint(hint);
        assert_eq!(
            err.message,
            "is not of a type(s) object. Consult the docs below for valid subschemas."
        );
    }

    #[test]
    fn test_candidate_ref_display() {
        assert_eq!(
            CandidateRef::Named("/RequestSchema".to_owned()).to_string(),
            "</RequestSchema>"
        );
        assert_eq!(CandidateRef::Inline(1).to_string(), "[subschema 1]");
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(sample_error()).unwrap();
        assert_eq!(value["property"], json!("instance.test"));
        assert_eq!(value["name"], json!("type"));
        assert_eq!(
            value["stack"],
            json!("instance.test is not of a type(s) object")
        );
        assert_eq!(value["codeLinks"], json!([]));
        assert_eq!(value["docLinks"], json!([]));
        assert_eq!(value["argument"], Value::Null);
    }

    #[test]
    fn test_outcome_validity_tracks_errors() {
        assert!(ValidationOutcome::from_errors(Vec::new()).valid);
        assert!(!ValidationOutcome::from_errors(vec![sample_error()]).valid);
    }
}
