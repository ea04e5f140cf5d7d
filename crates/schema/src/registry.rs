//! Ordered model registry.

use indexmap::IndexMap;

use crate::descriptor::ModelDescriptor;
use crate::SchemaError;

/// Ordered mapping of model name -> [`ModelDescriptor`].
///
/// Insertion order is preserved and defines the emission order of the
/// generated files. Models with a collection name are generation roots;
/// the rest are embeddable records resolvable through [`Registry::get`].
#[derive(Debug, Default)]
pub struct Registry {
    models: IndexMap<String, ModelDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a model, rejecting duplicate names across declaration files.
    pub fn insert(&mut self, model: ModelDescriptor) -> Result<(), SchemaError> {
        if self.models.contains_key(&model.name) {
            return Err(SchemaError::DuplicateModel {
                name: model.name.clone(),
            });
        }
        self.models.insert(model.name.clone(), model);
        Ok(())
    }

    /// Look a model up by registry name.
    pub fn get(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.get(name)
    }

    /// All models in insertion order.
    pub fn models(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.values()
    }

    /// Generation roots (models bound to a collection), in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.values().filter(|m| m.collection.is_some())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
