//! Ingredient line normalization.
//!
//! Mealie's parser endpoint has answered in several shapes over its versions:
//! a bare list, an object wrapping the parse under one of a handful of keys,
//! or the parsed fields directly. [`ParserResponse`] decodes those into a
//! closed set of variants; anything else is [`ParserResponse::Unrecognized`]
//! and the line degrades to a [fallback ingredient](build_fallback_ingredient).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::menu::value_to_string;
use crate::models::{FoodRef, ParsedIngredient};

/// Food name used when an ingredient line is empty.
pub const PLACEHOLDER_FOOD: &str = "Ingredient";

/// Keys that may wrap the parsed ingredient, in lookup order.
pub const WRAPPER_KEYS: [&str; 6] = ["ingredient", "result", "data", "parsed", "items", "ingredients"];

static LEADING_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\d\-\.]+\s*[a-zA-Z]*)\s+(.+)$").expect("valid amount pattern"));

/// The recognized shapes of a parser response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParserResponse {
    /// A top-level list; holds its first element.
    Sequence(Value),
    /// An object whose `key` held the parse, as an object or a non-empty list.
    Wrapped { key: &'static str, candidate: Value },
    /// An object with no wrapper key; the object is the parse.
    Bare(Map<String, Value>),
    /// Null, a scalar, or an empty list.
    Unrecognized,
}

impl ParserResponse {
    pub fn decode(value: Value) -> Self {
        match value {
            Value::Array(items) => items.into_iter().next().map_or(Self::Unrecognized, Self::Sequence),
            Value::Object(mut map) => {
                for key in WRAPPER_KEYS {
                    let wrapped = match map.get(key) {
                        Some(Value::Array(items)) if !items.is_empty() => true,
                        Some(Value::Object(_)) => true,
                        _ => false,
                    };
                    if !wrapped {
                        continue;
                    }
                    let candidate = match map.remove(key) {
                        Some(Value::Array(items)) => items.into_iter().next().unwrap_or(Value::Null),
                        Some(other) => other,
                        None => Value::Null,
                    };
                    return Self::Wrapped { key, candidate };
                }
                Self::Bare(map)
            }
            _ => Self::Unrecognized,
        }
    }

    /// The value that should hold the ingredient fields, if any.
    pub fn into_candidate(self) -> Option<Value> {
        match self {
            Self::Sequence(candidate) | Self::Wrapped { candidate, .. } => Some(candidate),
            Self::Bare(map) => Some(Value::Object(map)),
            Self::Unrecognized => None,
        }
    }
}

/// Picks the ingredient object out of a parser response.
///
/// ```rust
/// use mealsync_core::extract_parser_candidate;
/// use serde_json::json;
///
/// let response = json!({"result": [{"quantity": 2}]});
/// assert_eq!(extract_parser_candidate(&response), Some(json!({"quantity": 2})));
/// assert_eq!(extract_parser_candidate(&json!([])), None);
/// ```
pub fn extract_parser_candidate(response: &Value) -> Option<Value> {
    ParserResponse::decode(response.clone()).into_candidate()
}

/// Maps a parser candidate onto [`ParsedIngredient`].
///
/// Field aliases are tried in order; numeric quantities and units become
/// strings, and unit/food objects contribute their `name`.
pub fn normalize_parsed_ingredient(candidate: &Map<String, Value>, original: &str) -> ParsedIngredient {
    let text_of = |keys: &[&str]| keys.iter().filter_map(|k| candidate.get(*k)).find_map(named_text);
    let non_empty = |s: String| if s.trim().is_empty() { None } else { Some(s) };

    let display = ["display", "originalText"]
        .iter()
        .filter_map(|k| candidate.get(*k))
        .find_map(|v| value_to_string(v).and_then(non_empty))
        .unwrap_or_else(|| original.to_string());

    let food = candidate.get("food");
    let food_name = food
        .and_then(named_text)
        .and_then(non_empty)
        .or_else(|| text_of(&["name", "ingredient"]).and_then(non_empty))
        .unwrap_or_else(|| display.clone());
    let food_id = food
        .and_then(Value::as_object)
        .and_then(|f| f.get("id"))
        .and_then(value_to_string)
        .and_then(non_empty);

    let disable_amount = ["disableAmount", "disable_amount"]
        .iter()
        .filter_map(|k| candidate.get(*k))
        .find_map(Value::as_bool)
        .unwrap_or(false);

    ParsedIngredient {
        title: text_of(&["title"]).unwrap_or_default(),
        note: text_of(&["note", "notes"]).unwrap_or_default(),
        unit: text_of(&["unit", "units", "measure"]).unwrap_or_default(),
        quantity: text_of(&["quantity", "amount", "value"]).unwrap_or_default(),
        food: FoodRef { name: food_name, id: food_id },
        disable_amount,
        display,
    }
}

/// Degraded ingredient for lines the parser could not handle.
///
/// Amount fields are disabled; the whole line is kept as note and display,
/// and a leading amount such as `100g` or `2 db` is dropped from the food name.
pub fn build_fallback_ingredient(text: &str) -> ParsedIngredient {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedIngredient {
            food: FoodRef { name: PLACEHOLDER_FOOD.to_string(), id: None },
            disable_amount: true,
            ..Default::default()
        };
    }

    ParsedIngredient {
        note: trimmed.to_string(),
        food: FoodRef { name: fallback_food_name(trimmed).to_string(), id: None },
        disable_amount: true,
        display: trimmed.to_string(),
        ..Default::default()
    }
}

/// The part of a line after a leading amount, or the whole line.
pub fn fallback_food_name(text: &str) -> &str {
    LEADING_AMOUNT
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(text)
}

/// Text of a scalar, or the `name` of an object.
fn named_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map.get("name").and_then(value_to_string),
        Value::Array(_) => None,
        other => value_to_string(other),
    }
}
