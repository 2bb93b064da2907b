//! Meal-type inference from recipe keywords and descriptions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MenuConfig;
use crate::menu::RawRecipe;

/// Meal-plan slot understood by Mealie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infers the meal slot for a recipe.
///
/// Keywords are scanned first, then the description; within each, the first
/// table entry found as a case-insensitive substring wins. Falls back to the
/// configured default.
pub fn extract_meal_type(recipe: &RawRecipe, config: &MenuConfig) -> MealType {
    [recipe.keywords.as_deref(), recipe.description.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|text| match_keywords(text, config))
        .unwrap_or(config.default_meal_type)
}

fn match_keywords(text: &str, config: &MenuConfig) -> Option<MealType> {
    let haystack = text.to_lowercase();
    config
        .meal_keywords
        .iter()
        .find(|(key, _)| haystack.contains(&key.to_lowercase()))
        .map(|(_, meal)| *meal)
}
