//! Connection settings and menu-processing tables.
//!
//! [`MealieConfig`] holds where the Mealie server lives and how to authenticate.
//! [`MenuConfig`] holds the keyword table and day order used while processing a
//! menu, so callers and tests can swap them without touching global state.

use std::time::Duration;

use url::Url;

use crate::menu::Day;
use crate::{MealType, MealsyncError, Result};

/// Environment variable holding the Mealie base URL.
pub const BASE_URL_VAR: &str = "MEALIE_BASE_URL";

/// Environment variable holding the Mealie API token.
pub const API_TOKEN_VAR: &str = "MEALIE_API_TOKEN";

/// Base URL used when [`BASE_URL_VAR`] is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:9000";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Mealie connection settings.
///
/// # Example
///
/// ```rust
/// use mealsync_core::MealieConfig;
///
/// let config = MealieConfig::new("https://mealie.example.com//", "secret").unwrap();
/// assert_eq!(config.base_url, "https://mealie.example.com");
/// ```
#[derive(Debug, Clone)]
pub struct MealieConfig {
    /// Server root without trailing slashes.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub api_token: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl MealieConfig {
    /// Creates a config from explicit values, normalizing and validating the URL.
    pub fn new(base_url: &str, api_token: &str) -> Result<Self> {
        let api_token = api_token.trim();
        if api_token.is_empty() {
            return Err(MealsyncError::MissingToken { var: API_TOKEN_VAR });
        }

        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            api_token: api_token.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Reads `MEALIE_BASE_URL` and `MEALIE_API_TOKEN` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`MealsyncError::MissingToken`] if the token is absent or empty, and
    /// [`MealsyncError::InvalidUrl`] if the base URL cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but against an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_token = lookup(API_TOKEN_VAR).unwrap_or_default();

        Self::new(&base_url, &api_token)
    }

    /// Replaces the base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Full URL for an API path such as `/recipes`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

/// Strips every trailing slash and checks the result is an absolute URL.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');

    let parsed = Url::parse(trimmed).map_err(|e| MealsyncError::InvalidUrl(format!("{raw}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(MealsyncError::InvalidUrl(format!(
            "{raw}: URL must use http:// or https://"
        )));
    }

    Ok(trimmed.to_string())
}

/// Keyword table and ordering used while processing a menu.
///
/// The keyword table is scanned in order and the first key found as a
/// case-insensitive substring wins.
#[derive(Debug, Clone)]
pub struct MenuConfig {
    pub meal_keywords: Vec<(String, MealType)>,
    pub day_order: Vec<Day>,
    pub default_meal_type: MealType,
}

impl Default for MenuConfig {
    fn default() -> Self {
        let meal_keywords = [
            ("reggeli", MealType::Breakfast),
            ("ebéd", MealType::Lunch),
            ("ebed", MealType::Lunch),
            ("vacsora", MealType::Dinner),
            ("snack", MealType::Snack),
            ("breakfast", MealType::Breakfast),
            ("lunch", MealType::Lunch),
            ("dinner", MealType::Dinner),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self { meal_keywords, day_order: Day::ALL.to_vec(), default_meal_type: MealType::Dinner }
    }
}

impl MenuConfig {
    /// Replaces the keyword table.
    pub fn with_meal_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = (S, MealType)>,
        S: Into<String>,
    {
        self.meal_keywords = keywords.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    /// Sets the meal type used when nothing matches.
    pub fn with_default_meal_type(mut self, meal_type: MealType) -> Self {
        self.default_meal_type = meal_type;
        self
    }
}
