//! Assembly of the Mealie recipe payload from already-prepared parts.
//!
//! These functions are pure; the remote steps (ingredient parsing, ensuring
//! foods exist, tag lookup) happen in [`crate::processor`] before assembly.

use crate::menu::{RawInstruction, RawNutrition, RawRecipe};
use crate::models::{MealieRecipe, Nutrition, ParsedIngredient, RecipeInstruction, RecipeSettings, Tag};

/// Yield used when a recipe does not state one.
pub const DEFAULT_YIELD: &str = "1";

/// Builds the create/update payload for a recipe.
pub fn assemble_recipe(raw: &RawRecipe, ingredients: Vec<ParsedIngredient>, tags: Vec<Tag>) -> MealieRecipe {
    MealieRecipe {
        name: raw.display_name().to_string(),
        description: raw.description.clone().unwrap_or_default(),
        recipe_yield: raw
            .recipe_yield
            .clone()
            .filter(|y| !y.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_YIELD.to_string()),
        recipe_ingredient: ingredients,
        recipe_instructions: convert_instructions(&raw.recipe_instructions),
        notes: Vec::new(),
        tags,
        settings: RecipeSettings::default(),
        nutrition: raw.nutrition.as_ref().filter(|n| !n.is_empty()).map(convert_nutrition),
    }
}

/// Numbers instruction steps from `"0"` upward.
pub fn convert_instructions(steps: &[RawInstruction]) -> Vec<RecipeInstruction> {
    steps
        .iter()
        .enumerate()
        .map(|(idx, step)| RecipeInstruction { id: idx.to_string(), title: String::new(), text: step.text().to_string() })
        .collect()
}

/// Renames schema.org nutrition keys to Mealie's.
pub fn convert_nutrition(raw: &RawNutrition) -> Nutrition {
    Nutrition {
        calories: raw.calories.clone().unwrap_or_default(),
        protein: raw.protein_content.clone().unwrap_or_default(),
        fat_content: raw.fat_content.clone().unwrap_or_default(),
        carbohydrate_content: raw.carbohydrate_content.clone().unwrap_or_default(),
    }
}
