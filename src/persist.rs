use log::{debug, error, warn};
use serde_json::Value;

use crate::error::StorageError;
use crate::model::Recipe;
use crate::storage::KeyValueStorage;

/// Default slot holding the serialized recipe collection
pub const DEFAULT_KEY: &str = "recipes";

/// Reads and writes the whole recipe collection to a single storage slot.
///
/// `load` and `save` never fail: a corrupt or unreadable slot loads as an
/// empty collection, and a refused write leaves the slot as it was. Both
/// report the problem through the log. `try_load` and `try_save` expose the
/// underlying errors.
#[derive(Debug)]
pub struct RecipePersistence<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> RecipePersistence<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Read the collection; an absent slot is an empty collection.
    ///
    /// Entries are decoded one at a time. An entry that cannot be decoded is
    /// dropped with a warning; only a slot that is not a JSON array fails.
    pub fn try_load(&self) -> Result<Vec<Recipe>, StorageError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(Vec::new());
        };

        let entries: Vec<Value> = serde_json::from_str(&raw)?;
        let mut recipes = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Recipe>(entry) {
                Ok(recipe) => recipes.push(recipe),
                Err(e) => warn!(
                    "Skipping unreadable recipe at index {} in '{}': {}",
                    index, self.key, e
                ),
            }
        }
        Ok(recipes)
    }

    /// Serialize the full collection and overwrite the slot
    pub fn try_save(&mut self, recipes: &[Recipe]) -> Result<(), StorageError> {
        let json = serde_json::to_string(recipes)?;
        self.storage.set(&self.key, &json)
    }

    pub fn load(&self) -> Vec<Recipe> {
        match self.try_load() {
            Ok(recipes) => {
                debug!("Loaded {} recipes from '{}'", recipes.len(), self.key);
                recipes
            }
            Err(e) => {
                error!("Error loading recipes from '{}': {}", self.key, e);
                Vec::new()
            }
        }
    }

    /// Returns `false` when the write was refused
    pub fn save(&mut self, recipes: &[Recipe]) -> bool {
        match self.try_save(recipes) {
            Ok(()) => {
                debug!("Saved {} recipes to '{}'", recipes.len(), self.key);
                true
            }
            Err(e) => {
                error!("Error saving recipes to '{}': {}", self.key, e);
                false
            }
        }
    }
}
