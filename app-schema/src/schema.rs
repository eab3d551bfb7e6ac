use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;

use crate::error::{Candidate, CandidateRef};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Schema body at '{pointer}' of '{id}' must be a JSON object")]
    NotAnObject { id: String, pointer: String },
    #[error("Schema body has no string 'id'")]
    MissingId,
    #[error("Schema id '{0}' must start with '/'")]
    InvalidId(String),
    #[error("Schema '{id}' uses unsupported keyword '{keyword}' at '{pointer}'")]
    UnsupportedKeyword {
        id: String,
        pointer: String,
        keyword: String,
    },
    #[error("Schema '{id}' has a malformed '{keyword}' at '{pointer}': {reason}")]
    Malformed {
        id: String,
        pointer: String,
        keyword: String,
        reason: String,
    },
    #[error("Schema '{id}' has an invalid pattern at '{pointer}': {source}")]
    InvalidPattern {
        id: String,
        pointer: String,
        #[source]
        source: regex::Error,
    },
    #[error("Schema '{id}' requires '{property}' at '{pointer}' but never declares it")]
    UndeclaredRequired {
        id: String,
        pointer: String,
        property: String,
    },
    #[error("Schema '{0}' is not a valid JSON Schema document")]
    MetaSchema(String),
    #[error("Schema '{0}' is already registered")]
    Duplicate(String),
    #[error("Schema '{id}' references '{reference}', which is not in its dependency closure")]
    DanglingRef { id: String, reference: String },
    #[error("Schema '{id}' depends on unregistered schema '{dependency}'")]
    UnknownDependency { id: String, dependency: String },
    #[error("Schema '{0}' is not registered")]
    NotRegistered(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl JsonType {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "object" => Some(JsonType::Object),
            "array" => Some(JsonType::Array),
            "string" => Some(JsonType::String),
            "integer" => Some(JsonType::Integer),
            "number" => Some(JsonType::Number),
            "boolean" => Some(JsonType::Boolean),
            "null" => Some(JsonType::Null),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::String => "string",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Null => "null",
        }
    }

    /// Exact type test; `1.0` counts as an integer, `"1"` never counts as a number.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (JsonType::Object, Value::Object(_))
            | (JsonType::Array, Value::Array(_))
            | (JsonType::String, Value::String(_))
            | (JsonType::Number, Value::Number(_))
            | (JsonType::Boolean, Value::Bool(_))
            | (JsonType::Null, Value::Null) => true,
            (JsonType::Integer, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    OneOf,
    AnyOf,
    AllOf,
}

impl CompositeKind {
    pub const ALL: [CompositeKind; 3] = [CompositeKind::OneOf, CompositeKind::AnyOf, CompositeKind::AllOf];

    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            CompositeKind::OneOf => "oneOf",
            CompositeKind::AnyOf => "anyOf",
            CompositeKind::AllOf => "allOf",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Composite {
    pub kind: CompositeKind,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default)]
pub enum AdditionalProperties {
    #[default]
    Allowed,
    Forbidden,
    Schema(Arc<SchemaNode>),
}

#[derive(Debug, Clone)]
pub struct PatternProperty {
    pub pattern: Regex,
    pub node: Arc<SchemaNode>,
}

/// Parsed schema body. Only the closed keyword set below is understood.
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    /// Set on the root node of a named schema only.
    pub id: Option<String>,
    /// Target of a `$ref`; a referencing node carries no other keywords.
    pub reference: Option<String>,
    pub types: Vec<JsonType>,
    pub enum_values: Option<Vec<Value>>,
    pub pattern: Option<Regex>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub min_properties: Option<usize>,
    pub required: Vec<String>,
    pub properties: BTreeMap<String, Arc<SchemaNode>>,
    pub pattern_properties: Vec<PatternProperty>,
    pub additional_properties: AdditionalProperties,
    pub items: Option<Arc<SchemaNode>>,
    pub composite: Option<Composite>,
}

const KEYWORDS: &[&str] = &[
    "$ref",
    "type",
    "enum",
    "pattern",
    "minLength",
    "maxLength",
    "minimum",
    "maximum",
    "minItems",
    "maxItems",
    "minProperties",
    "required",
    "properties",
    "patternProperties",
    "additionalProperties",
    "items",
    "oneOf",
    "anyOf",
    "allOf",
];

const ANNOTATIONS: &[&str] = &["description", "title", "default", "docAnnotation"];

struct NodeParser<'a> {
    id: &'a str,
    references: BTreeSet<String>,
}

impl NodeParser<'_> {
    fn malformed(&self, pointer: &str, keyword: &str, reason: &str) -> SchemaError {
        SchemaError::Malformed {
            id: self.id.to_owned(),
            pointer: pointer.to_owned(),
            keyword: keyword.to_owned(),
            reason: reason.to_owned(),
        }
    }

    fn parse(&mut self, value: &Value, pointer: &str, root: bool) -> Result<SchemaNode, SchemaError> {
        let Some(obj) = value.as_object() else {
            return Err(SchemaError::NotAnObject {
                id: self.id.to_owned(),
                pointer: pointer.to_owned(),
            });
        };

        for key in obj.keys() {
            let key = key.as_str();
            if !(KEYWORDS.contains(&key) || ANNOTATIONS.contains(&key) || (root && key == "id")) {
                return Err(SchemaError::UnsupportedKeyword {
                    id: self.id.to_owned(),
                    pointer: pointer.to_owned(),
                    keyword: key.to_owned(),
                });
            }
        }

        let mut node = SchemaNode {
            id: root.then(|| self.id.to_owned()),
            ..SchemaNode::default()
        };

        if let Some(reference) = obj.get("$ref") {
            let Some(target) = reference.as_str() else {
                return Err(self.malformed(pointer, "$ref", "expected a schema id string"));
            };
            if obj.keys().any(|k| k != "$ref" && KEYWORDS.contains(&k.as_str())) {
                return Err(self.malformed(pointer, "$ref", "cannot be combined with other keywords"));
            }
            self.references.insert(target.to_owned());
            node.reference = Some(target.to_owned());
            return Ok(node);
        }

        self.parse_scalars(obj, pointer, &mut node)?;
        self.parse_object_keywords(obj, pointer, &mut node)?;

        if let Some(items) = obj.get("items") {
            let items_ptr = format!("{pointer}/items");
            node.items = Some(Arc::new(self.parse(items, &items_ptr, false)?));
        }

        node.composite = self.parse_composite(obj, pointer)?;
        Ok(node)
    }

    fn parse_scalars(
        &self,
        obj: &Map<String, Value>,
        pointer: &str,
        node: &mut SchemaNode,
    ) -> Result<(), SchemaError> {
        if let Some(types) = obj.get("type") {
            let names: Vec<&str> = match types {
                Value::String(s) => vec![s.as_str()],
                Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                _ => Vec::new(),
            };
            if names.is_empty() {
                return Err(self.malformed(pointer, "type", "expected a type name or list of names"));
            }
            for name in names {
                let Some(ty) = JsonType::parse(name) else {
                    return Err(self.malformed(pointer, "type", &format!("unknown type '{name}'")));
                };
                node.types.push(ty);
            }
        }

        if let Some(values) = obj.get("enum") {
            match values {
                Value::Array(items) if !items.is_empty() => node.enum_values = Some(items.clone()),
                _ => return Err(self.malformed(pointer, "enum", "expected a non-empty array")),
            }
        }

        if let Some(pattern) = obj.get("pattern") {
            let Some(source) = pattern.as_str() else {
                return Err(self.malformed(pointer, "pattern", "expected a string"));
            };
            node.pattern = Some(self.compile(source, pointer)?);
        }

        node.min_length = self.bound(obj, "minLength", pointer)?;
        node.max_length = self.bound(obj, "maxLength", pointer)?;
        node.min_items = self.bound(obj, "minItems", pointer)?;
        node.max_items = self.bound(obj, "maxItems", pointer)?;
        node.min_properties = self.bound(obj, "minProperties", pointer)?;

        for keyword in ["minimum", "maximum"] {
            let Some(limit) = obj.get(keyword) else {
                continue;
            };
            let Value::Number(n) = limit else {
                return Err(self.malformed(pointer, keyword, "expected a number"));
            };
            if keyword == "minimum" {
                node.minimum = Some(n.clone());
            } else {
                node.maximum = Some(n.clone());
            }
        }
        Ok(())
    }

    fn parse_object_keywords(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &str,
        node: &mut SchemaNode,
    ) -> Result<(), SchemaError> {
        if let Some(required) = obj.get("required") {
            let Some(items) = required.as_array() else {
                return Err(self.malformed(pointer, "required", "expected an array of names"));
            };
            for item in items {
                let Some(name) = item.as_str() else {
                    return Err(self.malformed(pointer, "required", "expected an array of names"));
                };
                node.required.push(name.to_owned());
            }
        }

        if let Some(properties) = obj.get("properties") {
            let Some(props) = properties.as_object() else {
                return Err(self.malformed(pointer, "properties", "expected an object"));
            };
            for (name, sub) in props {
                let sub_ptr = format!("{pointer}/properties/{name}");
                node.properties
                    .insert(name.clone(), Arc::new(self.parse(sub, &sub_ptr, false)?));
            }
        }

        if let Some(patterns) = obj.get("patternProperties") {
            let Some(patterns) = patterns.as_object() else {
                return Err(self.malformed(pointer, "patternProperties", "expected an object"));
            };
            for (source, sub) in patterns {
                let sub_ptr = format!("{pointer}/patternProperties/{source}");
                let pattern = self.compile(source, &sub_ptr)?;
                let sub = Arc::new(self.parse(sub, &sub_ptr, false)?);
                node.pattern_properties.push(PatternProperty { pattern, node: sub });
            }
        }

        match obj.get("additionalProperties") {
            None | Some(Value::Bool(true)) => {}
            Some(Value::Bool(false)) => node.additional_properties = AdditionalProperties::Forbidden,
            Some(sub @ Value::Object(_)) => {
                let sub_ptr = format!("{pointer}/additionalProperties");
                node.additional_properties =
                    AdditionalProperties::Schema(Arc::new(self.parse(sub, &sub_ptr, false)?));
            }
            Some(_) => {
                return Err(self.malformed(pointer, "additionalProperties", "expected a boolean or schema"));
            }
        }

        if matches!(node.additional_properties, AdditionalProperties::Forbidden) {
            for name in &node.required {
                let declared = node.properties.contains_key(name)
                    || node.pattern_properties.iter().any(|p| p.pattern.is_match(name));
                if !declared {
                    return Err(SchemaError::UndeclaredRequired {
                        id: self.id.to_owned(),
                        pointer: pointer.to_owned(),
                        property: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn parse_composite(
        &mut self,
        obj: &Map<String, Value>,
        pointer: &str,
    ) -> Result<Option<Composite>, SchemaError> {
        let present: Vec<CompositeKind> = CompositeKind::ALL
            .into_iter()
            .filter(|kind| obj.contains_key(kind.keyword()))
            .collect();
        let kind = match present.as_slice() {
            [] => return Ok(None),
            [kind] => *kind,
            _ => {
                return Err(self.malformed(pointer, "oneOf", "only one composite keyword is allowed per node"));
            }
        };

        let keyword = kind.keyword();
        let items = match obj.get(keyword) {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(self.malformed(pointer, keyword, "expected a non-empty array of schemas")),
        };

        let mut candidates = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let sub_ptr = format!("{pointer}/{keyword}/{idx}");
            let node = self.parse(item, &sub_ptr, false)?;
            let reference = match &node.reference {
                Some(target) => CandidateRef::Named(target.clone()),
                None => CandidateRef::Inline(idx),
            };
            candidates.push(Candidate {
                reference,
                node: Arc::new(node),
            });
        }
        Ok(Some(Composite { kind, candidates }))
    }

    fn bound(&self, obj: &Map<String, Value>, keyword: &str, pointer: &str) -> Result<Option<usize>, SchemaError> {
        match obj.get(keyword) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.malformed(pointer, keyword, "expected a non-negative integer")),
        }
    }

    fn compile(&self, source: &str, pointer: &str) -> Result<Regex, SchemaError> {
        Regex::new(source).map_err(|source| SchemaError::InvalidPattern {
            id: self.id.to_owned(),
            pointer: pointer.to_owned(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AntiExample {
    pub example: Value,
    pub reason: String,
    pub skip: bool,
}

/// A named, immutable schema: parsed body, the body as exported (without
/// examples), its examples and anti-examples, and the ids it depends on.
#[derive(Debug, Clone)]
pub struct Schema {
    id: String,
    body: Value,
    root: Arc<SchemaNode>,
    examples: Vec<Value>,
    anti_examples: Vec<AntiExample>,
    dependencies: Vec<String>,
    references: BTreeSet<String>,
}

impl Schema {
    /// Builds a schema from its JSON body and the ids of the schemas it
    /// references.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] when the body has no `/`-prefixed `id`, uses a
    /// keyword outside the supported set, carries a malformed keyword value or
    /// an invalid regex, or requires a property it forbids.
    pub fn define(mut body: Value, dependencies: &[&str]) -> Result<Self, SchemaError> {
        let Some(obj) = body.as_object_mut() else {
            return Err(SchemaError::NotAnObject {
                id: String::new(),
                pointer: "#".to_owned(),
            });
        };
        let Some(id) = obj.get("id").and_then(Value::as_str).map(str::to_owned) else {
            return Err(SchemaError::MissingId);
        };
        if !id.starts_with('/') || id.len() < 2 {
            return Err(SchemaError::InvalidId(id));
        }

        let examples = match obj.remove("examples") {
            None => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(SchemaError::Malformed {
                    id,
                    pointer: "#".to_owned(),
                    keyword: "examples".to_owned(),
                    reason: "expected an array".to_owned(),
                });
            }
        };
        let anti_examples = match obj.remove("antiExamples") {
            None => Vec::new(),
            Some(raw) => parse_anti_examples(&id, raw)?,
        };

        let mut parser = NodeParser {
            id: &id,
            references: BTreeSet::new(),
        };
        let root = parser.parse(&body, "#", true)?;
        let references = parser.references;

        if cfg!(debug_assertions) && !jsonschema::meta::is_valid(&body) {
            return Err(SchemaError::MetaSchema(id));
        }

        Ok(Schema {
            id,
            body,
            root: Arc::new(root),
            examples,
            anti_examples,
            dependencies: dependencies.iter().map(|d| (*d).to_owned()).collect(),
            references,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The body without `examples`/`antiExamples`.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    #[must_use]
    pub fn root(&self) -> &Arc<SchemaNode> {
        &self.root
    }

    #[must_use]
    pub fn examples(&self) -> &[Value] {
        &self.examples
    }

    #[must_use]
    pub fn anti_examples(&self) -> &[AntiExample] {
        &self.anti_examples
    }

    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Every `$ref` target found in the body.
    #[must_use]
    pub fn references(&self) -> &BTreeSet<String> {
        &self.references
    }
}

fn parse_anti_examples(id: &str, raw: Value) -> Result<Vec<AntiExample>, SchemaError> {
    let malformed = |reason: &str| SchemaError::Malformed {
        id: id.to_owned(),
        pointer: "#".to_owned(),
        keyword: "antiExamples".to_owned(),
        reason: reason.to_owned(),
    };
    let Value::Array(items) = raw else {
        return Err(malformed("expected an array"));
    };

    items
        .into_iter()
        .map(|item| {
            let Value::Object(mut entry) = item else {
                return Err(malformed("each entry must be an object"));
            };
            let example = entry
                .remove("example")
                .ok_or_else(|| malformed("entry has no 'example'"))?;
            let reason = entry
                .remove("reason")
                .and_then(|r| r.as_str().map(str::to_owned))
                .ok_or_else(|| malformed("entry has no string 'reason'"))?;
            let skip = entry.get("skip").and_then(Value::as_bool).unwrap_or(false);
            Ok(AntiExample {
                example,
                reason,
                skip,
            })
        })
        .collect()
}
