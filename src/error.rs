use thiserror::Error;

use crate::model::RecipeId;

/// Errors raised by a key-value storage medium
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded
    #[error("Invalid stored data: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The slot key cannot be used as a file name
    #[error("Invalid storage key '{0}': must be a plain file name")]
    InvalidKey(String),

    /// The medium refused a write because it would exceed its capacity
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} bytes available")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// Rejections produced while validating user input, before the store is touched
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a recipe name")]
    EmptyName,

    #[error("Please enter at least one ingredient")]
    NoIngredients,

    #[error("Please enter at least one step")]
    NoSteps,
}

/// Errors that can occur while working with the recipe collection
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No recipe carries the requested id
    #[error("Recipe {0} not found")]
    NotFound(RecipeId),

    /// Ingredient index does not exist in the recipe
    #[error("Recipe {id} has no ingredient at index {index} ({len} ingredients)")]
    IngredientOutOfRange {
        id: RecipeId,
        index: usize,
        len: usize,
    },

    /// Storage medium error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
