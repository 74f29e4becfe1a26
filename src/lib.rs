//! Local recipe box.
//!
//! Recipes live in a single [`RecipeStore`], hydrated once from a key-value
//! [`storage`] medium and written back in full after every change. Edits in
//! [`edits`] validate user input and produce the next collection; the store
//! itself never validates.

pub mod config;
pub mod edits;
pub mod error;
pub mod model;
pub mod persist;
pub mod render;
pub mod storage;
pub mod store;
pub mod uniffi_bindings;

pub use config::{load_config, AppConfig, StorageBackend, StorageConfig};
pub use edits::{
    create_recipe, find_recipe, now_millis, parse_ingredients, parse_steps, replace_steps,
    steps_as_text, toggle_ingredient, RecipeDraft,
};
pub use error::{RecipeError, StorageError, ValidationError};
pub use model::{Ingredient, Recipe, RecipeId};
pub use persist::{RecipePersistence, DEFAULT_KEY};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{RecipeStore, SaveOutcome, SubscriptionId};

/// Open and hydrate a file-backed store in `dir` using the default slot
pub fn open_file_store(dir: impl Into<std::path::PathBuf>) -> RecipeStore<FileStorage> {
    RecipeStore::open(RecipePersistence::new(FileStorage::new(dir)))
}
