pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod ingredient;
pub mod input;
pub mod meal_type;
pub mod menu;
pub mod models;
pub mod processor;
pub mod report;
pub mod week;

pub use client::{Ensured, MealieApi, MealieClient, PAGE_SIZE, PARSER_PAYLOAD_KEYS, normalize_name, recipe_from_creation};
pub use config::{API_TOKEN_VAR, BASE_URL_VAR, DEFAULT_BASE_URL, MealieConfig, MenuConfig, normalize_base_url};
pub use convert::{assemble_recipe, convert_instructions, convert_nutrition};
pub use error::{MealsyncError, Result};
pub use ingredient::{
    PLACEHOLDER_FOOD, ParserResponse, build_fallback_ingredient, extract_parser_candidate, fallback_food_name,
    normalize_parsed_ingredient,
};
pub use input::{STDIN_SOURCE, load_menu_file, load_menu_stdin, parse_menu};
pub use meal_type::{MealType, extract_meal_type};
pub use menu::{Day, MenuDocument, RawInstruction, RawNutrition, RawRecipe, UNTITLED_RECIPE};
pub use models::{
    Food, FoodRef, MealPlanEntry, MealieRecipe, Nutrition, ParsedIngredient, RecipeInstruction, RecipeSettings,
    RecipeSummary, Tag,
};
pub use processor::{ConvertedRecipe, MenuProcessor, RecipeCreation};
pub use report::{MealPlanStatus, RecipeOutcome, RecipeStatus, WeekReport};
pub use week::{WeekDates, calculate_week_dates, current_year};
