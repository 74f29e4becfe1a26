//! Pure edits over the recipe collection.
//!
//! Each edit takes the current collection and returns the next one, or an
//! error if the input is rejected. Nothing here touches the store, so a
//! rejected edit can never reach `RecipeStore::replace_all`.

use std::collections::HashSet;

use crate::error::{RecipeError, ValidationError};
use crate::model::{Ingredient, Recipe, RecipeId};

/// Raw form input for a new recipe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    /// Comma-separated ingredient names
    pub ingredients: String,
    /// One step per line
    pub steps: String,
    pub image: Option<String>,
}

impl RecipeDraft {
    pub fn new(
        name: impl Into<String>,
        ingredients: impl Into<String>,
        steps: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.into(),
            steps: steps.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Validate the draft and build the recipe it describes.
    ///
    /// Checks run in form order: name, then ingredients, then steps.
    pub fn into_recipe(&self, id: RecipeId) -> Result<Recipe, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let ingredients = parse_ingredients(&self.ingredients);
        if ingredients.is_empty() {
            return Err(ValidationError::NoIngredients);
        }

        let steps = parse_steps(&self.steps);
        if steps.is_empty() {
            return Err(ValidationError::NoSteps);
        }

        let image = self
            .image
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(Recipe {
            id,
            name: name.to_string(),
            ingredients,
            steps,
            image,
        })
    }
}

/// Split comma-separated text into ingredients, trimming and dropping blanks
pub fn parse_ingredients(text: &str) -> Vec<Ingredient> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Ingredient::new)
        .collect()
}

/// Split text into one step per line, trimming and dropping blank lines
pub fn parse_steps(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(str::to_string)
        .collect()
}

/// Steps joined back into the text shown when editing starts
pub fn steps_as_text(recipe: &Recipe) -> String {
    recipe.steps.join("\n")
}

pub fn find_recipe(recipes: &[Recipe], id: RecipeId) -> Option<&Recipe> {
    recipes.iter().find(|r| r.id == id)
}

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> RecipeId {
    chrono::Utc::now().timestamp_millis()
}

/// Pick an id for a recipe created at `now_ms` that no existing recipe uses.
///
/// The creation timestamp is used as-is unless an existing id is equal or
/// later, in which case the id becomes one past the largest id. When the
/// largest id is `i64::MAX`, the first free id at or below `now_ms` is used.
pub fn next_id(recipes: &[Recipe], now_ms: RecipeId) -> RecipeId {
    match recipes.iter().map(|r| r.id).max() {
        Some(max) if max >= now_ms => match max.checked_add(1) {
            Some(id) => id,
            None => free_id_below(recipes, now_ms),
        },
        _ => now_ms,
    }
}

fn free_id_below(recipes: &[Recipe], start: RecipeId) -> RecipeId {
    let taken: HashSet<RecipeId> = recipes.iter().map(|r| r.id).collect();
    let mut id = start;
    // A finite collection cannot fill every id below `start`
    while taken.contains(&id) {
        id = id.wrapping_sub(1);
    }
    id
}

/// Append a recipe built from `draft`, returning the next collection and the new id
pub fn create_recipe(
    recipes: &[Recipe],
    draft: &RecipeDraft,
    now_ms: RecipeId,
) -> Result<(Vec<Recipe>, RecipeId), RecipeError> {
    let id = next_id(recipes, now_ms);
    let recipe = draft.into_recipe(id)?;

    let mut next = recipes.to_vec();
    next.push(recipe);
    Ok((next, id))
}

/// Flip the availability of one ingredient of one recipe
pub fn toggle_ingredient(
    recipes: &[Recipe],
    id: RecipeId,
    index: usize,
) -> Result<Vec<Recipe>, RecipeError> {
    let recipe = find_recipe(recipes, id).ok_or(RecipeError::NotFound(id))?;
    if index >= recipe.ingredients.len() {
        return Err(RecipeError::IngredientOutOfRange {
            id,
            index,
            len: recipe.ingredients.len(),
        });
    }

    Ok(update_recipe(recipes, id, |r| {
        let ingredient = &mut r.ingredients[index];
        ingredient.available = !ingredient.available;
    }))
}

/// Replace all steps of one recipe with the lines of `text`
pub fn replace_steps(
    recipes: &[Recipe],
    id: RecipeId,
    text: &str,
) -> Result<Vec<Recipe>, RecipeError> {
    let steps = parse_steps(text);
    if steps.is_empty() {
        return Err(ValidationError::NoSteps.into());
    }
    if find_recipe(recipes, id).is_none() {
        return Err(RecipeError::NotFound(id));
    }

    Ok(update_recipe(recipes, id, move |r| r.steps = steps))
}

fn update_recipe<F>(recipes: &[Recipe], id: RecipeId, change: F) -> Vec<Recipe>
where
    F: FnOnce(&mut Recipe),
{
    let mut next = recipes.to_vec();
    if let Some(recipe) = next.iter_mut().find(|r| r.id == id) {
        change(recipe);
    }
    next
}
