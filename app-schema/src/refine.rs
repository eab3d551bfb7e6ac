use std::collections::HashSet;
use std::sync::Arc;

use crate::config::SchemaConfig;
use crate::error::{CandidateRef, ValidationError};
use crate::path::PropertyPath;
use crate::validator::{EngineError, StructuralValidator};

/// Appended to composite errors whose candidates are all inline sub-schemas.
pub const SUBSCHEMA_HINT: &str = "Consult the docs below for valid subschemas.";

/// Candidate nodes being re-validated, keyed by node address and the path of
/// the composite error.
type Expanding = HashSet<(usize, PropertyPath)>;

/// Turns ambiguous `oneOf`/`anyOf`/`allOf` errors into the errors of the
/// candidate the definition most likely meant, and attaches links.
///
/// Re-validation picks the candidate with the fewest errors, ties going to the
/// candidate declared first. That is a heuristic: two candidates with one
/// plausible error each resolve to the earlier one.
pub struct ErrorRefiner<'v, 'r> {
    validator: &'v StructuralValidator<'r>,
    config: &'v SchemaConfig,
}

impl<'v, 'r> ErrorRefiner<'v, 'r> {
    #[must_use]
    pub fn new(validator: &'v StructuralValidator<'r>, config: &'v SchemaConfig) -> Self {
        Self { validator, config }
    }

    /// Refines every error in order. Running this on its own output returns
    /// the same list.
    ///
    /// # Errors
    /// Returns an [`EngineError`] when re-validating a candidate hits an
    /// unresolvable `$ref`.
    pub fn refine(&self, errors: Vec<ValidationError>) -> Result<Vec<ValidationError>, EngineError> {
        let mut expanding = Expanding::new();
        let mut refined = Vec::with_capacity(errors.len());
        for error in errors {
            refined.extend(self.refine_one(error, &mut expanding)?);
        }
        Ok(refined)
    }

    fn refine_one(
        &self,
        error: ValidationError,
        expanding: &mut Expanding,
    ) -> Result<Vec<ValidationError>, EngineError> {
        let Some(candidates) = error.candidates().filter(|_| error.is_composite()) else {
            return Ok(vec![self.finish(error)]);
        };

        if candidates
            .iter()
            .all(|c| matches!(c.reference, CandidateRef::Inline(_)))
        {
            return Ok(vec![self.finish(error.with_hint(SUBSCHEMA_HINT))]);
        }

        let mut best: Option<Vec<ValidationError>> = None;
        for candidate in candidates {
            let key = (Arc::as_ptr(&candidate.node).addr(), error.property.clone());
            if !expanding.insert(key.clone()) {
                continue;
            }

            let branch = self
                .validator
                .validate_node(&error.instance, &candidate.node, &PropertyPath::root())
                .and_then(|sub_errors| {
                    let mut resolved = Vec::new();
                    for sub in sub_errors {
                        resolved.extend(self.refine_one(sub.relocated(&error.property), expanding)?);
                    }
                    Ok(resolved)
                });
            expanding.remove(&key);
            let branch = branch?;

            tracing::debug!(
                "Candidate {} at {} leaves {} error(s)",
                candidate.reference,
                error.property,
                branch.len()
            );
            if best.as_ref().is_none_or(|b| branch.len() < b.len()) {
                best = Some(branch);
            }
        }

        match best {
            Some(branch) if !branch.is_empty() => Ok(branch),
            _ => Ok(vec![self.finish(error)]),
        }
    }

    /// Attaches one code link and one doc link per named schema involved.
    fn finish(&self, error: ValidationError) -> ValidationError {
        let mut ids: Vec<String> = Vec::new();
        if let Some(schema) = &error.schema {
            ids.push(schema.clone());
        }
        for candidate in error.candidates().unwrap_or_default() {
            if let Some(id) = candidate.reference.schema_id()
                && !ids.iter().any(|known| known == id)
            {
                ids.push(id.to_owned());
            }
        }

        let code_links = ids.iter().map(|id| self.config.code_link(id)).collect();
        let doc_links = ids.iter().map(|id| self.config.doc_link(id)).collect();
        error.with_links(code_links, doc_links)
    }
}
