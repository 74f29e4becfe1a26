//! Plain-text views of the collection.

use std::fmt::Write;

use crate::edits::steps_as_text;
use crate::model::Recipe;

pub const EMPTY_LIST: &str = "No recipes yet. Start by adding your first recipe!";
pub const NOT_FOUND: &str = "Recipe not found.";

/// One line per recipe: id, name, ingredient count and an image marker
pub fn render_list(recipes: &[Recipe]) -> String {
    if recipes.is_empty() {
        return EMPTY_LIST.to_string();
    }

    let mut out = String::new();
    for recipe in recipes {
        let count = recipe.ingredient_count();
        let noun = if count == 1 { "ingredient" } else { "ingredients" };
        let _ = write!(out, "{:>15}  {}  ({} {})", recipe.id, recipe.name, count, noun);
        if recipe.image.is_some() {
            out.push_str("  [image]");
        }
        out.push('\n');
    }
    out
}

/// Full recipe view. A missing recipe renders a placeholder instead of failing.
pub fn render_detail(recipe: Option<&Recipe>) -> String {
    let Some(recipe) = recipe else {
        return NOT_FOUND.to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", recipe.name);
    if let Some(image) = &recipe.image {
        let _ = writeln!(out, "Image: {}", image);
    }

    out.push_str("\nIngredients\n");
    for (index, ing) in recipe.ingredients.iter().enumerate() {
        let status = if ing.available {
            "✓ Available"
        } else {
            "✗ Missing"
        };
        let _ = writeln!(out, "  [{}] {:<30} {}", index, ing.name, status);
    }

    let missing = recipe.missing_ingredients();
    if missing.is_empty() {
        out.push_str("  All ingredients available\n");
    } else {
        let _ = writeln!(out, "  Missing: {}", missing.join(", "));
    }

    out.push_str("\nPreparation Steps\n");
    for (index, step) in recipe.steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", index + 1, step);
    }
    out
}

/// Current steps as editable text, one per line
pub fn render_step_text(recipe: Option<&Recipe>) -> String {
    match recipe {
        Some(recipe) => steps_as_text(recipe),
        None => NOT_FOUND.to_string(),
    }
}
