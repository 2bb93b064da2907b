//! Weekly menu processing.
//!
//! [`MenuProcessor`] walks a [`MenuDocument`] day by day and recipe by recipe,
//! strictly in sequence. For each recipe it:
//!
//! 1. looks for an existing recipe with the same name,
//! 2. otherwise parses every ingredient line (parse, normalize, ensure the food
//!    exists), assembles the payload, creates the recipe and patches in the full
//!    payload,
//! 3. infers the meal type and adds a meal-plan entry on that day's date.
//!
//! A remote failure only affects the recipe it happened on; it is logged,
//! recorded in the [`WeekReport`], and processing moves on.

use tracing::{debug, info, warn};

use crate::client::MealieApi;
use crate::config::MenuConfig;
use crate::convert::assemble_recipe;
use crate::ingredient::{ParserResponse, build_fallback_ingredient, normalize_parsed_ingredient};
use crate::meal_type::extract_meal_type;
use crate::menu::{Day, MenuDocument, RawRecipe};
use crate::models::{MealieRecipe, ParsedIngredient, RecipeSummary, Tag};
use crate::report::{MealPlanStatus, RecipeOutcome, RecipeStatus, WeekReport};
use crate::week::{calculate_week_dates, current_year};
use crate::{MealType, Result};

/// A recipe payload plus the problems met while building it.
#[derive(Debug, Clone)]
pub struct ConvertedRecipe {
    pub recipe: MealieRecipe,
    pub warnings: Vec<String>,
}

/// Result of [`MenuProcessor::create_recipe_if_not_exists`].
#[derive(Debug, Clone)]
pub struct RecipeCreation {
    pub summary: RecipeSummary,
    pub existed: bool,
    pub warnings: Vec<String>,
}

/// Drives the sync of one menu against a [`MealieApi`].
pub struct MenuProcessor<C> {
    client: C,
    config: MenuConfig,
}

impl<C: MealieApi> MenuProcessor<C> {
    /// Creates a processor with the default keyword table and day order.
    pub fn new(client: C) -> Self {
        Self::with_config(client, MenuConfig::default())
    }

    pub fn with_config(client: C, config: MenuConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Turns one free-text line into a [`ParsedIngredient`].
    ///
    /// Blank lines, parser failures, and unrecognized parser responses all
    /// produce the fallback ingredient.
    pub async fn parse_ingredient_text(&self, text: &str) -> ParsedIngredient {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return build_fallback_ingredient(trimmed);
        }

        let response = match self.client.parse_ingredient(trimmed).await {
            Ok(Some(response)) => response,
            Ok(None) => return build_fallback_ingredient(trimmed),
            Err(err) => {
                warn!(ingredient = trimmed, error = %err, "Ingredient parser failed, using fallback");
                return build_fallback_ingredient(trimmed);
            }
        };

        match ParserResponse::decode(response).into_candidate() {
            Some(serde_json::Value::Object(candidate)) => normalize_parsed_ingredient(&candidate, trimmed),
            _ => {
                info!(ingredient = trimmed, "Unrecognized parser response, using fallback");
                build_fallback_ingredient(trimmed)
            }
        }
    }

    /// Parses a line and makes sure its food exists remotely.
    ///
    /// The remote food's id is attached when the parser did not supply one.
    ///
    /// Returns a warning instead of failing when the food cannot be ensured.
    pub async fn prepare_ingredient(&self, text: &str) -> (ParsedIngredient, Option<String>) {
        let mut parsed = self.parse_ingredient_text(text).await;
        let food = parsed.food.name.clone();

        match self.client.ensure_ingredient_exists(&food).await {
            Ok(ensured) => {
                if parsed.food.id.is_none() {
                    parsed.food.id = ensured.food().id.clone();
                }
                (parsed, None)
            }
            Err(err) => {
                warn!(ingredient = %food, error = %err, "Could not ensure ingredient exists");
                (parsed, Some(format!("ingredient '{food}' not ensured: {err}")))
            }
        }
    }

    /// Meal type for a recipe using this processor's keyword table.
    pub fn extract_meal_type(&self, recipe: &RawRecipe) -> MealType {
        extract_meal_type(recipe, &self.config)
    }

    /// Builds the Mealie payload for a recipe, creating foods along the way.
    pub async fn convert_recipe_to_mealie_format(&self, recipe: &RawRecipe) -> ConvertedRecipe {
        let mut warnings = Vec::new();

        info!(count = recipe.recipe_ingredient.len(), "Processing ingredients");
        let mut ingredients = Vec::with_capacity(recipe.recipe_ingredient.len());
        for line in &recipe.recipe_ingredient {
            let (parsed, warning) = self.prepare_ingredient(line).await;
            ingredients.push(parsed);
            warnings.extend(warning);
        }

        let tags = match self.lookup_tag(recipe).await {
            Ok(tag) => tag.into_iter().collect(),
            Err(warning) => {
                warnings.push(warning);
                Vec::new()
            }
        };

        ConvertedRecipe { recipe: assemble_recipe(recipe, ingredients, tags), warnings }
    }

    async fn lookup_tag(&self, recipe: &RawRecipe) -> std::result::Result<Option<Tag>, String> {
        let Some(keyword) = recipe.keyword_list().first().map(|k| k.to_string()) else {
            return Ok(None);
        };

        match self.client.get_tag_by_name(&keyword).await {
            Ok(tag) => {
                if tag.is_none() {
                    debug!(keyword = %keyword, "No matching tag");
                }
                Ok(tag)
            }
            Err(err) => {
                warn!(keyword = %keyword, error = %err, "Tag lookup failed");
                Err(format!("tag '{keyword}' lookup failed: {err}"))
            }
        }
    }

    /// Returns the existing recipe with this name, or creates it.
    ///
    /// # Errors
    ///
    /// Returns the remote error when the recipe could not be created; the
    /// caller should skip the meal-plan entry for it.
    pub async fn create_recipe_if_not_exists(&self, recipe: &RawRecipe) -> Result<RecipeCreation> {
        let name = recipe.display_name();
        let mut warnings = Vec::new();

        match self.client.get_recipe_by_name(name).await {
            Ok(Some(existing)) => {
                info!(recipe = name, id = ?existing.identifier(), "Recipe already exists");
                return Ok(RecipeCreation { summary: existing, existed: true, warnings });
            }
            Ok(None) => {}
            Err(err) => {
                warn!(recipe = name, error = %err, "Could not list existing recipes, creating anyway");
                warnings.push(format!("existing recipe lookup failed: {err}"));
            }
        }

        info!(recipe = name, "Creating recipe");
        let converted = self.convert_recipe_to_mealie_format(recipe).await;
        warnings.extend(converted.warnings);

        let created = self.client.create_recipe(&converted.recipe).await.inspect_err(|err| {
            warn!(recipe = name, error = %err, "Error creating recipe");
        })?;

        let update_key = created.update_key().map(str::to_string);
        let summary = match update_key {
            Some(key) => match self.client.update_recipe(&key, &converted.recipe).await {
                Ok(updated) => merge_summary(created, updated),
                Err(err) => {
                    warn!(recipe = name, error = %err, "Recipe created but update failed");
                    warnings.push(format!("recipe update failed: {err}"));
                    created
                }
            },
            None => {
                warnings.push("created recipe has no slug or id to update".to_string());
                created
            }
        };

        info!(recipe = name, id = ?summary.identifier(), "Recipe created");
        Ok(RecipeCreation { summary, existed: false, warnings })
    }

    /// Syncs a whole week.
    ///
    /// `year` defaults to the current UTC year.
    ///
    /// # Errors
    ///
    /// Only fails when the week dates cannot be computed for `year`. Per-recipe
    /// failures are recorded in the returned report.
    pub async fn process_weekly_menu(&self, menu: &MenuDocument, year: Option<i32>) -> Result<WeekReport> {
        let year = year.unwrap_or_else(current_year);
        let week = menu.week_number();
        let dates = calculate_week_dates(year, week)?;
        let mut report = WeekReport::new(week, year, dates);

        info!(week, year, "Processing week menu");

        for &day in &self.config.day_order {
            let recipes = menu.recipes_for(day);
            let date = dates.iso(day);

            if recipes.is_empty() {
                info!(day = %day, "No recipes");
                continue;
            }

            info!(day = %day, date = %date, count = recipes.len(), "Processing day");
            for recipe in recipes {
                let outcome = self.process_recipe(day, &date, recipe).await;
                report.outcomes.push(outcome);
            }
        }

        info!(
            week,
            created = report.recipes_created(),
            existing = report.recipes_existing(),
            failed = report.recipes_failed(),
            meal_plans = report.meal_plans_created(),
            "Week processing complete"
        );
        Ok(report)
    }

    async fn process_recipe(&self, day: Day, date: &str, recipe: &RawRecipe) -> RecipeOutcome {
        let mut outcome = RecipeOutcome {
            day,
            date: date.to_string(),
            name: recipe.display_name().to_string(),
            recipe: RecipeStatus::Created,
            meal_type: None,
            meal_plan: MealPlanStatus::Skipped { reason: "recipe not available".to_string() },
            warnings: Vec::new(),
        };

        let creation = match self.create_recipe_if_not_exists(recipe).await {
            Ok(creation) => creation,
            Err(err) => {
                outcome.recipe = RecipeStatus::Failed { reason: err.to_string() };
                return outcome;
            }
        };
        outcome.recipe = if creation.existed { RecipeStatus::Existing } else { RecipeStatus::Created };
        outcome.warnings = creation.warnings;

        let meal_type = self.extract_meal_type(recipe);
        outcome.meal_type = Some(meal_type);
        info!(recipe = %outcome.name, meal_type = %meal_type, "Meal type");

        let Some(recipe_id) = creation.summary.identifier() else {
            warn!(recipe = %outcome.name, "Recipe has no id or slug, skipping meal plan");
            outcome.meal_plan = MealPlanStatus::Skipped { reason: "recipe has no id or slug".to_string() };
            return outcome;
        };

        info!(recipe = %outcome.name, date, "Adding to meal plan");
        outcome.meal_plan = match self.client.create_mealplan(date, meal_type, recipe_id).await {
            Ok(_) => {
                info!(recipe = %outcome.name, date, "Meal plan entry created");
                MealPlanStatus::Created
            }
            Err(err) => {
                warn!(recipe = %outcome.name, date, error = %err, "Failed to create meal plan entry");
                MealPlanStatus::Failed { reason: err.to_string() }
            }
        };
        outcome
    }
}

/// Prefers the updated record but keeps identifiers it may lack.
fn merge_summary(created: RecipeSummary, updated: RecipeSummary) -> RecipeSummary {
    RecipeSummary {
        id: updated.id.or(created.id),
        slug: updated.slug.or(created.slug),
        name: if updated.name.is_empty() { created.name } else { updated.name },
    }
}
