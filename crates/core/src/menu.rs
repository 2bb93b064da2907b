//! Weekly menu input model.
//!
//! A menu is a JSON object with a `week` number and one array of schema.org
//! `Recipe` objects per weekday. Every recipe field is optional, and the
//! loosely-typed JSON-LD fields (`recipeYield`, `keywords`, nutrition values)
//! are accepted as strings, numbers, or lists.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Name used when a recipe has none.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// Day of the week as used for menu keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// Monday through Sunday.
    pub const ALL: [Day; 7] =
        [Day::Monday, Day::Tuesday, Day::Wednesday, Day::Thursday, Day::Friday, Day::Saturday, Day::Sunday];

    /// Days since Monday (Monday = 0).
    pub fn offset(self) -> i64 {
        self as i64
    }

    /// Lowercase menu key.
    pub fn key(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.key();
        let mut chars = key.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}

/// A week's worth of recipes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuDocument {
    /// Raw week value; see [`MenuDocument::week_number`].
    #[serde(default)]
    pub week: Value,
    #[serde(default)]
    pub monday: Vec<RawRecipe>,
    #[serde(default)]
    pub tuesday: Vec<RawRecipe>,
    #[serde(default)]
    pub wednesday: Vec<RawRecipe>,
    #[serde(default)]
    pub thursday: Vec<RawRecipe>,
    #[serde(default)]
    pub friday: Vec<RawRecipe>,
    #[serde(default)]
    pub saturday: Vec<RawRecipe>,
    #[serde(default)]
    pub sunday: Vec<RawRecipe>,
}

impl MenuDocument {
    /// Recipes listed for a day.
    pub fn recipes_for(&self, day: Day) -> &[RawRecipe] {
        match day {
            Day::Monday => &self.monday,
            Day::Tuesday => &self.tuesday,
            Day::Wednesday => &self.wednesday,
            Day::Thursday => &self.thursday,
            Day::Friday => &self.friday,
            Day::Saturday => &self.saturday,
            Day::Sunday => &self.sunday,
        }
    }

    /// The week number, with anything non-numeric treated as week 1.
    pub fn week_number(&self) -> i64 {
        week_from_value(&self.week)
    }

    /// Total number of recipes across all days.
    pub fn recipe_count(&self) -> usize {
        Day::ALL.iter().map(|d| self.recipes_for(*d).len()).sum()
    }
}

/// Coerces a JSON week value to a number; invalid values become 1.
pub fn week_from_value(value: &Value) -> i64 {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.unwrap_or(1)
}

/// A schema.org Recipe, reduced to the fields we use.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecipe {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recipe_yield: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub recipe_ingredient: Vec<String>,
    #[serde(default, deserialize_with = "lenient_instructions")]
    pub recipe_instructions: Vec<RawInstruction>,
    #[serde(default)]
    pub nutrition: Option<RawNutrition>,
    #[serde(default, deserialize_with = "lenient_keywords")]
    pub keywords: Option<String>,
}

impl RawRecipe {
    /// Recipe name, or [`UNTITLED_RECIPE`].
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.trim().is_empty()).unwrap_or(UNTITLED_RECIPE)
    }

    /// Keywords split on commas, trimmed, empties dropped.
    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords
            .as_deref()
            .map(|k| k.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }
}

/// One entry of `recipeInstructions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInstruction {
    /// A bare string step.
    Text(String),
    /// A `HowToStep`-like object; only `text` is kept.
    Step { text: String },
}

impl RawInstruction {
    pub fn text(&self) -> &str {
        match self {
            RawInstruction::Text(t) | RawInstruction::Step { text: t } => t,
        }
    }
}

/// schema.org `NutritionInformation` subset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNutrition {
    #[serde(default, deserialize_with = "lenient_string")]
    pub calories: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub protein_content: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fat_content: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub carbohydrate_content: Option<String>,
}

impl RawNutrition {
    pub fn is_empty(&self) -> bool {
        self.calories.is_none()
            && self.protein_content.is_none()
            && self.fat_content.is_none()
            && self.carbohydrate_content.is_none()
    }
}

/// Renders a scalar JSON value as text. Arrays use their first scalar.
pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_to_string(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => items.iter().find_map(value_to_string),
        Value::Null | Value::Object(_) => None,
    }
}

/// Integral floats print without a fractional part, everything else as-is.
pub(crate) fn number_to_string(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(value_to_string).collect(),
        other => value_to_string(&other).into_iter().collect(),
    })
}

fn lenient_keywords<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_to_string).collect();
            if parts.is_empty() { None } else { Some(parts.join(", ")) }
        }
        other => value_to_string(&other),
    })
}

fn lenient_instructions<'de, D>(deserializer: D) -> Result<Vec<RawInstruction>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(RawInstruction::Text(s)),
            Value::Object(map) => map
                .get("text")
                .and_then(value_to_string)
                .map(|text| RawInstruction::Step { text }),
            _ => None,
        })
        .collect())
}
