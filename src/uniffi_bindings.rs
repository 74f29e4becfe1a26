//! UniFFI bindings for recipe-box
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! Every call opens the file-backed store in `data_dir`, hydrates it, applies one
//! action and writes the result back, so the host app never holds Rust state.
//!
//! Calls are not synchronized with each other. Each mutating call is a
//! read-modify-write of the whole collection, so two calls racing on the same
//! `data_dir` can both succeed while one change is lost. Hosts must serialize
//! calls per `data_dir` (for example on the UI thread).

use std::fmt;

use crate::edits::{self, RecipeDraft};
use crate::model::{Ingredient, Recipe};
use crate::{open_file_store, RecipeError, SaveOutcome};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible ingredient
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiIngredient {
    pub name: String,
    pub available: bool,
}

/// FFI-compatible recipe structure
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipe {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<FfiIngredient>,
    pub steps: Vec<String>,
    /// Image URL, if any
    pub image: Option<String>,
}

/// Raw form input for a new recipe
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipeDraft {
    pub name: String,
    /// Comma-separated ingredient names
    pub ingredients: String,
    /// One step per line
    pub steps: String,
    pub image: Option<String>,
}

impl From<Ingredient> for FfiIngredient {
    fn from(ingredient: Ingredient) -> Self {
        FfiIngredient {
            name: ingredient.name,
            available: ingredient.available,
        }
    }
}

impl From<Recipe> for FfiRecipe {
    fn from(recipe: Recipe) -> Self {
        FfiRecipe {
            id: recipe.id,
            name: recipe.name,
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
            steps: recipe.steps,
            image: recipe.image,
        }
    }
}

impl From<FfiRecipeDraft> for RecipeDraft {
    fn from(ffi: FfiRecipeDraft) -> Self {
        RecipeDraft {
            name: ffi.name,
            ingredients: ffi.ingredients,
            steps: ffi.steps,
            image: ffi.image,
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiRecipeError {
    /// Input was rejected before reaching the store
    InvalidInput { message: String },
    /// No recipe with the given id
    NotFound { id: i64 },
    /// Ingredient index out of range
    InvalidIndex { message: String },
    /// The change could not be written to storage
    StorageError { message: String },
}

impl fmt::Display for FfiRecipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiRecipeError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            FfiRecipeError::NotFound { id } => write!(f, "Recipe {} not found", id),
            FfiRecipeError::InvalidIndex { message } => write!(f, "Invalid index: {}", message),
            FfiRecipeError::StorageError { message } => write!(f, "Storage error: {}", message),
        }
    }
}

impl std::error::Error for FfiRecipeError {}

impl From<RecipeError> for FfiRecipeError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::Validation(e) => FfiRecipeError::InvalidInput {
                message: e.to_string(),
            },
            RecipeError::NotFound(id) => FfiRecipeError::NotFound { id },
            e @ RecipeError::IngredientOutOfRange { .. } => FfiRecipeError::InvalidIndex {
                message: e.to_string(),
            },
            RecipeError::Storage(e) => FfiRecipeError::StorageError {
                message: e.to_string(),
            },
            RecipeError::Config(e) => FfiRecipeError::StorageError {
                message: e.to_string(),
            },
        }
    }
}

fn check_saved(outcome: SaveOutcome) -> Result<(), FfiRecipeError> {
    match outcome {
        SaveOutcome::Persisted => Ok(()),
        SaveOutcome::Deferred | SaveOutcome::Failed => Err(FfiRecipeError::StorageError {
            message: "Recipes could not be saved".to_string(),
        }),
    }
}

/// List all recipes in insertion order
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn list_recipes(data_dir: String) -> Vec<FfiRecipe> {
    let store = open_file_store(data_dir);
    store.get_all().iter().cloned().map(Into::into).collect()
}

/// Look up one recipe; `None` when the id is unknown
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_recipe(data_dir: String, id: i64) -> Option<FfiRecipe> {
    let store = open_file_store(data_dir);
    store.find(id).cloned().map(Into::into)
}

/// Create a recipe and return its id
///
/// Not safe to call concurrently for the same `data_dir`; see the module docs.
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn add_recipe(data_dir: String, draft: FfiRecipeDraft) -> Result<i64, FfiRecipeError> {
    let mut store = open_file_store(data_dir);
    let draft: RecipeDraft = draft.into();
    let (next, id) = edits::create_recipe(store.get_all(), &draft, edits::now_millis())?;
    check_saved(store.replace_all(next))?;
    Ok(id)
}

/// Flip the availability of ingredient `index` of recipe `id`
///
/// Not safe to call concurrently for the same `data_dir`; see the module docs.
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn toggle_ingredient(
    data_dir: String,
    id: i64,
    index: u32,
) -> Result<FfiRecipe, FfiRecipeError> {
    let mut store = open_file_store(data_dir);
    let outcome = store.apply(|recipes| edits::toggle_ingredient(recipes, id, index as usize))?;
    check_saved(outcome)?;
    updated(store.find(id))
}

/// Replace the steps of recipe `id` with the lines of `steps`
///
/// Not safe to call concurrently for the same `data_dir`; see the module docs.
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn edit_steps(data_dir: String, id: i64, steps: String) -> Result<FfiRecipe, FfiRecipeError> {
    let mut store = open_file_store(data_dir);
    let outcome = store.apply(|recipes| edits::replace_steps(recipes, id, &steps))?;
    check_saved(outcome)?;
    updated(store.find(id))
}

fn updated(recipe: Option<&Recipe>) -> Result<FfiRecipe, FfiRecipeError> {
    recipe
        .cloned()
        .map(Into::into)
        .ok_or(FfiRecipeError::StorageError {
            message: "Recipe disappeared after update".to_string(),
        })
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_dir(dir: &tempfile::TempDir) -> String {
        dir.path().to_string_lossy().into_owned()
    }

    fn pancakes_draft() -> FfiRecipeDraft {
        FfiRecipeDraft {
            name: " Pancakes ".to_string(),
            ingredients: "flour, eggs, milk".to_string(),
            steps: "Mix\nCook".to_string(),
            image: None,
        }
    }

    #[test]
    fn test_add_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let id = add_recipe(data_dir(&dir), pancakes_draft()).unwrap();

        let recipes = list_recipes(data_dir(&dir));
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, id);
        assert_eq!(recipes[0].name, "Pancakes");
        assert_eq!(recipes[0].ingredients.len(), 3);
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let dir = tempfile::tempdir().unwrap();
        let draft = FfiRecipeDraft {
            name: "  ".to_string(),
            ..pancakes_draft()
        };

        let result = add_recipe(data_dir(&dir), draft);
        assert!(matches!(result, Err(FfiRecipeError::InvalidInput { .. })));
        assert!(list_recipes(data_dir(&dir)).is_empty());
    }

    #[test]
    fn test_toggle_and_edit_steps() {
        let dir = tempfile::tempdir().unwrap();
        let id = add_recipe(data_dir(&dir), pancakes_draft()).unwrap();

        let recipe = toggle_ingredient(data_dir(&dir), id, 0).unwrap();
        assert!(recipe.ingredients[0].available);

        let recipe = edit_steps(data_dir(&dir), id, "Whisk\nFry".to_string()).unwrap();
        assert_eq!(recipe.steps, vec!["Whisk", "Fry"]);

        let stored = get_recipe(data_dir(&dir), id).unwrap();
        assert_eq!(stored, recipe);
    }

    #[test]
    fn test_errors_map_to_ffi() {
        let dir = tempfile::tempdir().unwrap();
        let id = add_recipe(data_dir(&dir), pancakes_draft()).unwrap();

        assert!(matches!(
            toggle_ingredient(data_dir(&dir), id + 1, 0),
            Err(FfiRecipeError::NotFound { .. })
        ));
        assert!(matches!(
            toggle_ingredient(data_dir(&dir), id, 10),
            Err(FfiRecipeError::InvalidIndex { .. })
        ));
        assert!(matches!(
            edit_steps(data_dir(&dir), id, "   ".to_string()),
            Err(FfiRecipeError::InvalidInput { .. })
        ));
        assert!(get_recipe(data_dir(&dir), id + 1).is_none());
    }

    #[test]
    fn test_get_version() {
        assert!(!get_version().is_empty());
    }
}
