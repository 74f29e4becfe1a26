use serde::{Deserialize, Serialize};

/// Recipe identifier: the creation time in milliseconds since the Unix epoch
pub type RecipeId = i64;

/// A single ingredient and whether it is on hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub available: bool,
}

impl Ingredient {
    /// New ingredients start out as missing
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: false,
        }
    }
}

/// A named dish with ingredients and preparation steps.
///
/// Serialized field names are part of the persisted layout and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Recipe {
    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    /// Names of the ingredients not yet marked available, in recipe order
    pub fn missing_ingredients(&self) -> Vec<&str> {
        self.ingredients
            .iter()
            .filter(|ing| !ing.available)
            .map(|ing| ing.name.as_str())
            .collect()
    }
}
