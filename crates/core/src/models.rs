//! Records exchanged with the Mealie API.
//!
//! Response types are deliberately forgiving: ids may arrive as strings or
//! numbers, and listing endpoints may or may not wrap results in a
//! paginated `{items}` envelope.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::MealType;
use crate::menu::value_to_string;

/// A Mealie food (ingredient) record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Food {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "title")]
    pub name: String,
}

/// Body for `POST /foods`.
#[derive(Debug, Clone, Serialize)]
pub struct NewFood<'a> {
    pub name: &'a str,
    pub description: String,
}

impl<'a> NewFood<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name, description: format!("Auto-created ingredient: {name}") }
    }
}

/// A Mealie organizer tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// The parts of a recipe record we care about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl RecipeSummary {
    /// Identifier for meal-plan entries: `id` preferred, `slug` otherwise.
    pub fn identifier(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.slug.as_deref().filter(|s| !s.is_empty()))
    }

    /// Key for `PATCH /recipes/{key}`: Mealie addresses recipes by slug.
    pub fn update_key(&self) -> Option<&str> {
        self.slug
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.id.as_deref().filter(|s| !s.is_empty()))
    }
}

/// A created meal-plan entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanEntry {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub entry_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub recipe_id: Option<String>,
}

/// Body for `POST /groups/mealplans`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMealPlan<'a> {
    pub date: &'a str,
    pub entry_type: MealType,
    pub recipe_id: &'a str,
}

/// Food reference inside an ingredient line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FoodRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One normalized ingredient line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIngredient {
    pub title: String,
    pub note: String,
    pub unit: String,
    pub quantity: String,
    pub food: FoodRef,
    /// Set when quantity and unit carry no meaning.
    pub disable_amount: bool,
    pub display: String,
}

/// One instruction step in the Mealie recipe payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeInstruction {
    pub id: String,
    pub title: String,
    pub text: String,
}

/// Display preferences sent with every recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSettings {
    pub public: bool,
    pub show_nutrition: bool,
    pub show_assets: bool,
    pub landscape_view: bool,
    pub disable_comments: bool,
    pub disable_amount: bool,
}

impl Default for RecipeSettings {
    fn default() -> Self {
        Self {
            public: true,
            show_nutrition: true,
            show_assets: true,
            landscape_view: false,
            disable_comments: false,
            disable_amount: false,
        }
    }
}

/// Nutrition block in Mealie's naming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    pub calories: String,
    pub protein: String,
    pub fat_content: String,
    pub carbohydrate_content: String,
}

/// Recipe payload for create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealieRecipe {
    pub name: String,
    pub description: String,
    pub recipe_yield: String,
    pub recipe_ingredient: Vec<ParsedIngredient>,
    pub recipe_instructions: Vec<RecipeInstruction>,
    pub notes: Vec<Value>,
    pub tags: Vec<Tag>,
    pub settings: RecipeSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
}

/// A list response, bare or wrapped in a paginated envelope.
///
/// Mealie pages its listings and reports `total_pages` and a `next` link
/// alongside `items`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Plain(Vec<T>),
    Page {
        items: Vec<T>,
        #[serde(default)]
        total_pages: Option<u64>,
        #[serde(default)]
        next: Option<String>,
    },
}

impl<T> Listing<T> {
    /// Whether a page after `page` (1-based) exists.
    pub fn has_more(&self, page: u64) -> bool {
        match self {
            Listing::Plain(_) => false,
            Listing::Page { total_pages: Some(total), .. } => page < *total,
            Listing::Page { next, .. } => next.as_deref().is_some_and(|n| !n.is_empty()),
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Plain(items) | Listing::Page { items, .. } => items,
        }
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value).filter(|s| !s.is_empty()))
}
