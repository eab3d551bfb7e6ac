use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::FunctionalConstraint;
use super::walk::{entries, has_sample, options, section_keys, static_field_keys};
use crate::error::{ValidationError, rule};
use crate::path::PropertyPath;
use crate::schema::Schema;

/// Sections holding search-or-create combinations.
const SECTIONS: [&str; 2] = ["searchOrCreates", "searchAndCreates"];

const UPDATE_MAPPINGS: [&str; 2] = ["updateInputFromSearchOutput", "searchUniqueInputToOutputConstraint"];

/// Cross-references of search-or-create entries must resolve to declared
/// searches and creates, and their field mappings to declared field keys.
pub struct SearchOrCreateKeys;

struct Declared<'d> {
    definition: &'d Value,
    searches: BTreeSet<&'d str>,
    creates: BTreeSet<&'d str>,
}

impl<'d> Declared<'d> {
    fn operation(&self, section: &str, key: &str) -> Option<&'d Map<String, Value>> {
        self.definition
            .get(section)?
            .get(key)?
            .get("operation")?
            .as_object()
    }

    /// Keys a search is known to return: its `outputFields` plus the keys of
    /// its sample. `None` when the search declares neither, or declares
    /// dynamic output fields.
    fn search_outputs(&self, search: &str) -> Option<BTreeSet<&'d str>> {
        let operation = self.operation("searches", search)?;
        let output_fields = operation.get("outputFields");
        let sample = operation.get("sample");
        if output_fields.is_none() && !has_sample(sample) {
            return None;
        }

        let mut keys = static_field_keys(output_fields)?;
        if let Some(sample) = sample.and_then(Value::as_object) {
            keys.extend(sample.keys().map(String::as_str));
        }
        Some(keys)
    }

    fn input_keys(&self, section: &str, key: &str) -> Option<BTreeSet<&'d str>> {
        static_field_keys(self.operation(section, key)?.get("inputFields"))
    }
}

fn invalid_key(message: String, instance: &Value, path: PropertyPath) -> ValidationError {
    ValidationError::new(rule::INVALID_KEY, message, instance.clone(), path)
}

impl SearchOrCreateKeys {
    fn check_entry(
        declared: &Declared<'_>,
        entry: &Map<String, Value>,
        path: &PropertyPath,
        errors: &mut Vec<ValidationError>,
    ) {
        let searches = options(declared.searches.iter().copied());
        let creates = options(declared.creates.iter().copied());

        if let Some(key) = entry.get("key")
            && let Some(k) = key.as_str()
            && !declared.searches.contains(k)
        {
            errors.push(invalid_key(
                format!("must have a matching \"key\" from a search (options: {searches})"),
                key,
                path.key("key"),
            ));
        }

        for (property, known, kind, listed) in [
            ("search", &declared.searches, "search", &searches),
            ("create", &declared.creates, "create", &creates),
            ("update", &declared.creates, "create", &creates),
        ] {
            if let Some(value) = entry.get(property)
                && let Some(target) = value.as_str()
                && !known.contains(target)
            {
                errors.push(invalid_key(
                    format!("must match a \"key\" from a {kind} (options: {listed})"),
                    value,
                    path.key(property),
                ));
            }
        }

        if !entry.contains_key("update") {
            for mapping in UPDATE_MAPPINGS {
                if let Some(value) = entry.get(mapping) {
                    errors.push(ValidationError::new(
                        rule::MISSING,
                        format!("must contain property \"update\" because property \"{mapping}\" is present"),
                        value.clone(),
                        path.clone(),
                    ));
                }
            }
        }

        Self::check_mappings(declared, entry, path, errors);
    }

    fn check_mappings(
        declared: &Declared<'_>,
        entry: &Map<String, Value>,
        path: &PropertyPath,
        errors: &mut Vec<ValidationError>,
    ) {
        let search = entry.get("search").and_then(Value::as_str);
        let update = entry.get("update").and_then(Value::as_str);
        let outputs = search.and_then(|s| declared.search_outputs(s));

        for mapping in UPDATE_MAPPINGS {
            let Some(pairs) = entry.get(mapping).and_then(Value::as_object) else {
                continue;
            };
            let mapping_path = path.key(mapping);

            // Keys name inputs: of the update action, or of the search itself.
            let (owner_kind, owner, inputs) = if mapping == "updateInputFromSearchOutput" {
                ("create", update, update.and_then(|u| declared.input_keys("creates", u)))
            } else {
                ("search", search, search.and_then(|s| declared.input_keys("searches", s)))
            };

            for (key, value) in pairs {
                if let (Some(owner), Some(inputs)) = (owner, &inputs)
                    && !inputs.contains(key.as_str())
                {
                    errors.push(invalid_key(
                        format!(
                            "has key \"{key}\", which must match an input field key of {owner_kind} \"{owner}\" (options: {})",
                            options(inputs.iter().copied())
                        ),
                        &Value::Object(pairs.clone()),
                        mapping_path.clone(),
                    ));
                }

                if let (Some(search), Some(outputs), Some(target)) = (search, &outputs, value.as_str())
                    && !outputs.contains(target)
                {
                    errors.push(invalid_key(
                        format!(
                            "must match an output field key of search \"{search}\" (options: {})",
                            options(outputs.iter().copied())
                        ),
                        value,
                        mapping_path.key(key),
                    ));
                }
            }
        }
    }
}

impl FunctionalConstraint for SearchOrCreateKeys {
    fn name(&self) -> &'static str {
        "search_or_create_keys"
    }

    fn check(&self, definition: &Value, _root: &Schema) -> Vec<ValidationError> {
        let declared = Declared {
            definition,
            searches: section_keys(definition, "searches"),
            creates: section_keys(definition, "creates"),
        };

        let mut errors = Vec::new();
        for section in SECTIONS {
            for (_, entry, path) in entries(definition, section) {
                Self::check_entry(&declared, entry, &path, &mut errors);
            }
        }
        errors
    }
}
