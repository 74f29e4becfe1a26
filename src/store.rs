use log::{debug, info, warn};

use crate::model::{Recipe, RecipeId};
use crate::persist::RecipePersistence;
use crate::storage::KeyValueStorage;

/// What happened to the storage slot after a `replace_all`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The new collection was written
    Persisted,
    /// The store is not hydrated yet, so nothing was written
    Deferred,
    /// The medium refused the write; the in-memory state still changed
    Failed,
}

/// Handle returned by [`RecipeStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&[Recipe])>;

/// Single owner of the recipe collection.
///
/// Built once at the composition root and handed to consumers by reference.
/// Every `replace_all` notifies subscribers and, once hydrated, writes the
/// full collection through the persistence adapter. Saves are gated on the
/// `hydrated` flag so an early replacement can never overwrite stored data
/// with a collection that was never loaded.
pub struct RecipeStore<S> {
    persistence: RecipePersistence<S>,
    recipes: Vec<Recipe>,
    hydrated: bool,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: KeyValueStorage> RecipeStore<S> {
    /// Create an unhydrated store; call [`hydrate`](Self::hydrate) before relying on its contents
    pub fn new(persistence: RecipePersistence<S>) -> Self {
        Self {
            persistence,
            recipes: Vec::new(),
            hydrated: false,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create a store and hydrate it from storage
    pub fn open(persistence: RecipePersistence<S>) -> Self {
        let mut store = Self::new(persistence);
        store.hydrate();
        store
    }

    /// Load the persisted collection. Only the first call has any effect.
    pub fn hydrate(&mut self) {
        if self.hydrated {
            debug!("Recipe store already hydrated, ignoring");
            return;
        }

        self.recipes = self.persistence.load();
        self.hydrated = true;
        info!("Recipe store hydrated with {} recipes", self.recipes.len());
        self.notify();
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Current collection, empty until hydrated
    pub fn get_all(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn find(&self, id: RecipeId) -> Option<&Recipe> {
        crate::edits::find_recipe(&self.recipes, id)
    }

    /// Swap in a new collection. The store does not validate it.
    pub fn replace_all(&mut self, recipes: Vec<Recipe>) -> SaveOutcome {
        self.recipes = recipes;
        self.notify();

        if !self.hydrated {
            warn!("Recipe store not hydrated yet, skipping save");
            return SaveOutcome::Deferred;
        }

        if self.persistence.save(&self.recipes) {
            SaveOutcome::Persisted
        } else {
            SaveOutcome::Failed
        }
    }

    /// Run `edit` against the current collection and replace it with the
    /// result. A rejected edit leaves the store untouched.
    pub fn apply<E, F>(&mut self, edit: F) -> Result<SaveOutcome, E>
    where
        F: FnOnce(&[Recipe]) -> Result<Vec<Recipe>, E>,
    {
        let next = edit(&self.recipes)?;
        Ok(self.replace_all(next))
    }

    /// Register a callback invoked with the collection after every change
    pub fn subscribe(&mut self, subscriber: impl Fn(&[Recipe]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns `false` if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn persistence(&self) -> &RecipePersistence<S> {
        &self.persistence
    }

    pub fn into_persistence(self) -> RecipePersistence<S> {
        self.persistence
    }

    fn notify(&self) {
        for (_, subscriber) in &self.subscribers {
            subscriber(&self.recipes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edits::{create_recipe, toggle_ingredient, RecipeDraft};
    use crate::error::RecipeError;
    use crate::model::Ingredient;
    use crate::persist::DEFAULT_KEY;
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recipe(id: RecipeId, name: &str) -> Recipe {
        Recipe {
            id,
            name: name.to_string(),
            ingredients: vec![Ingredient::new("salt")],
            steps: vec!["Season".to_string()],
            image: None,
        }
    }

    fn seeded_storage(recipes: &[Recipe]) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        storage
            .set(DEFAULT_KEY, &serde_json::to_string(recipes).unwrap())
            .unwrap();
        storage
    }

    #[test]
    fn test_unhydrated_store_is_empty() {
        let store = RecipeStore::new(RecipePersistence::new(seeded_storage(&[recipe(1, "A")])));
        assert!(!store.is_hydrated());
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_replace_before_hydration_does_not_overwrite_storage() {
        let stored = vec![recipe(1, "A")];
        let mut store = RecipeStore::new(RecipePersistence::new(seeded_storage(&stored)));

        assert_eq!(store.replace_all(Vec::new()), SaveOutcome::Deferred);

        let raw = store.persistence().storage().raw(DEFAULT_KEY).unwrap();
        assert_eq!(raw, serde_json::to_string(&stored).unwrap());

        // Hydration still brings back the persisted data
        store.hydrate();
        assert_eq!(store.get_all(), stored.as_slice());
    }

    #[test]
    fn test_hydrate_only_once() {
        let mut store = RecipeStore::open(RecipePersistence::new(seeded_storage(&[recipe(1, "A")])));
        store.replace_all(vec![recipe(2, "B")]);

        store.hydrate();
        assert_eq!(store.get_all(), &[recipe(2, "B")]);
    }

    #[test]
    fn test_replace_all_persists_after_hydration() {
        let mut store = RecipeStore::open(RecipePersistence::new(MemoryStorage::new()));
        let next = vec![recipe(1, "A"), recipe(2, "B")];

        assert_eq!(store.replace_all(next.clone()), SaveOutcome::Persisted);
        assert_eq!(store.get_all(), next.as_slice());
        assert_eq!(store.persistence().load(), next);
    }

    #[test]
    fn test_get_all_is_stable_without_mutation() {
        let store = RecipeStore::open(RecipePersistence::new(seeded_storage(&[recipe(1, "A")])));
        let first = store.get_all().to_vec();
        let second = store.get_all().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let mut store = RecipeStore::open(RecipePersistence::new(MemoryStorage::with_quota(16)));

        let next = vec![recipe(1, "A")];
        assert_eq!(store.replace_all(next.clone()), SaveOutcome::Failed);
        assert_eq!(store.get_all(), next.as_slice());
        assert!(store.persistence().storage().raw(DEFAULT_KEY).is_none());
    }

    #[test]
    fn test_subscribers_notified_on_hydrate_and_replace() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = RecipeStore::new(RecipePersistence::new(seeded_storage(&[recipe(1, "A")])));

        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |recipes| sink.borrow_mut().push(recipes.len()));

        store.hydrate();
        store.replace_all(vec![recipe(1, "A"), recipe(2, "B")]);
        assert_eq!(*seen.borrow(), vec![1, 2]);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.replace_all(Vec::new());
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_apply_rejected_edit_leaves_store_untouched() {
        let mut store = RecipeStore::open(RecipePersistence::new(seeded_storage(&[recipe(1, "A")])));
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        let result = store.apply(|recipes| toggle_ingredient(recipes, 99, 0));
        assert!(matches!(result, Err(RecipeError::NotFound(99))));
        assert_eq!(*calls.borrow(), 0);

        let result = store.apply(|recipes| {
            create_recipe(recipes, &RecipeDraft::new("  ", "a", "b"), 5).map(|(next, _)| next)
        });
        assert!(result.is_err());
        assert_eq!(store.get_all(), &[recipe(1, "A")]);
    }

    #[test]
    fn test_apply_accepted_edit_persists() {
        let mut store = RecipeStore::open(RecipePersistence::new(seeded_storage(&[recipe(1, "A")])));

        let outcome = store
            .apply(|recipes| toggle_ingredient(recipes, 1, 0))
            .unwrap();

        assert_eq!(outcome, SaveOutcome::Persisted);
        assert!(store.find(1).unwrap().ingredients[0].available);
        assert!(store.persistence().load()[0].ingredients[0].available);
    }
}
