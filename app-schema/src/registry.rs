use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::schema::{Schema, SchemaError};

/// Read-only after construction: schemas are shared as `Arc<Schema>`.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    by_id: HashMap<String, Arc<Schema>>,
    order: Vec<String>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from `schemas` and checks that every `$ref` resolves.
    ///
    /// # Errors
    /// Returns [`SchemaError::Duplicate`] on a repeated id, or the first
    /// reference error found by [`SchemaRegistry::check_references`].
    pub fn from_schemas(schemas: impl IntoIterator<Item = Schema>) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for schema in schemas {
            registry.register(schema)?;
        }
        registry.check_references()?;
        tracing::info!("Populated SchemaRegistry with {} schemas", registry.len());
        Ok(registry)
    }

    /// # Errors
    /// Returns [`SchemaError::Duplicate`] if a schema with the same id exists.
    pub fn register(&mut self, schema: Schema) -> Result<(), SchemaError> {
        let id = schema.id().to_owned();
        if self.by_id.contains_key(&id) {
            return Err(SchemaError::Duplicate(id));
        }
        self.order.push(id.clone());
        self.by_id.insert(id, Arc::new(schema));
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Schema>> {
        self.by_id.get(id)
    }

    /// Ids in registration order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Schemas in registration order.
    pub fn schemas(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids reachable from `id` through declared dependencies, `id` included.
    /// Dependency cycles are expected and handled with a visited set.
    ///
    /// # Errors
    /// Returns [`SchemaError::NotRegistered`] for an unknown root and
    /// [`SchemaError::UnknownDependency`] when a dependency was never registered.
    pub fn closure(&self, id: &str) -> Result<HashSet<String>, SchemaError> {
        if !self.by_id.contains_key(id) {
            return Err(SchemaError::NotRegistered(id.to_owned()));
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([id.to_owned()]);
        visited.insert(id.to_owned());

        while let Some(current) = queue.pop_front() {
            let Some(schema) = self.by_id.get(&current) else {
                continue;
            };
            for dep in schema.dependencies() {
                if !self.by_id.contains_key(dep) {
                    return Err(SchemaError::UnknownDependency {
                        id: current.clone(),
                        dependency: dep.clone(),
                    });
                }
                if visited.insert(dep.clone()) {
                    queue.push_back(dep.clone());
                }
            }
        }
        Ok(visited)
    }

    /// Flattens the closure of `id` into an id-sorted map of exported bodies.
    ///
    /// # Errors
    /// Same as [`SchemaRegistry::closure`].
    pub fn export_closure(&self, id: &str) -> Result<BTreeMap<String, Value>, SchemaError> {
        let closure = self.closure(id)?;
        Ok(closure
            .into_iter()
            .filter_map(|dep| {
                self.by_id
                    .get(&dep)
                    .map(|schema| (dep, schema.body().clone()))
            })
            .collect())
    }

    /// Checks that every `$ref` of every schema resolves inside that schema's
    /// own dependency closure.
    ///
    /// # Errors
    /// Returns [`SchemaError::DanglingRef`] for the first unresolved reference.
    pub fn check_references(&self) -> Result<(), SchemaError> {
        for schema in self.schemas() {
            let closure = self.closure(schema.id())?;
            if let Some(reference) = schema.references().iter().find(|r| !closure.contains(*r)) {
                return Err(SchemaError::DanglingRef {
                    id: schema.id().to_owned(),
                    reference: reference.clone(),
                });
            }
        }
        Ok(())
    }
}
