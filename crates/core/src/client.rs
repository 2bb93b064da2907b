//! Mealie REST client.
//!
//! [`MealieApi`] is the seam the menu processor talks to. [`MealieClient`]
//! implements it over `reqwest` with bearer authentication; tests substitute
//! their own implementations.
//!
//! Every operation returns a [`Result`]. Nothing here swallows failures; the
//! caller decides whether to skip an item or abort.

use std::future::Future;

use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::MealieConfig;
use crate::models::{Food, Listing, MealPlanEntry, MealieRecipe, NewFood, NewMealPlan, RecipeSummary, Tag};
use crate::{MealType, MealsyncError, Result};

/// Payload keys tried, in order, against the ingredient parser.
pub const PARSER_PAYLOAD_KEYS: [&str; 3] = ["ingredient", "input", "text"];

/// `perPage` requested from listing endpoints.
pub const PAGE_SIZE: u64 = 50;

/// Upper bound on pages followed for one listing.
const MAX_PAGES: u64 = 1000;

/// Outcome of [`MealieApi::ensure_ingredient_exists`].
#[derive(Debug, Clone, PartialEq)]
pub enum Ensured {
    Existing(Food),
    Created(Food),
}

impl Ensured {
    pub fn food(&self) -> &Food {
        match self {
            Ensured::Existing(food) | Ensured::Created(food) => food,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Ensured::Created(_))
    }
}

/// Operations the menu processor needs from a Mealie server.
///
/// The lookup helpers (`get_ingredient_by_name`, `ensure_ingredient_exists`,
/// `get_recipe_by_name`) have default implementations built on the primitive
/// calls.
pub trait MealieApi: Send + Sync {
    /// `GET /foods?search=`, every page.
    fn search_ingredients(&self, query: &str) -> impl Future<Output = Result<Vec<Food>>> + Send;

    /// `POST /foods`.
    fn create_ingredient(&self, name: &str) -> impl Future<Output = Result<Food>> + Send;

    /// `POST /parser/ingredient`; `Ok(None)` for blank text.
    fn parse_ingredient(&self, text: &str) -> impl Future<Output = Result<Option<Value>>> + Send;

    /// `GET /recipes`, every page, unwrapped from the pagination envelope.
    fn get_recipes(&self) -> impl Future<Output = Result<Vec<RecipeSummary>>> + Send;

    /// `POST /recipes`.
    fn create_recipe(&self, recipe: &MealieRecipe) -> impl Future<Output = Result<RecipeSummary>> + Send;

    /// `PATCH /recipes/{key}`.
    fn update_recipe(&self, key: &str, recipe: &MealieRecipe) -> impl Future<Output = Result<RecipeSummary>> + Send;

    /// `POST /groups/mealplans`.
    fn create_mealplan(
        &self,
        date: &str,
        meal_type: MealType,
        recipe_id: &str,
    ) -> impl Future<Output = Result<MealPlanEntry>> + Send;

    /// `GET /organizers/tags?search=`; first result whose name matches, if any.
    fn get_tag_by_name(&self, name: &str) -> impl Future<Output = Result<Option<Tag>>> + Send;

    /// Case-insensitive, whitespace-trimmed food lookup.
    fn get_ingredient_by_name(&self, name: &str) -> impl Future<Output = Result<Option<Food>>> + Send {
        async move {
            let wanted = normalize_name(name);
            let foods = self.search_ingredients(name.trim()).await?;
            Ok(foods.into_iter().find(|f| normalize_name(&f.name) == wanted))
        }
    }

    /// Returns the named food, creating it when missing.
    fn ensure_ingredient_exists(&self, name: &str) -> impl Future<Output = Result<Ensured>> + Send {
        async move {
            if let Some(food) = self.get_ingredient_by_name(name).await? {
                info!(ingredient = name, "Ingredient already exists");
                return Ok(Ensured::Existing(food));
            }

            info!(ingredient = name, "Creating ingredient");
            self.create_ingredient(name).await.map(Ensured::Created)
        }
    }

    /// Case-insensitive, whitespace-trimmed recipe lookup over the full list.
    fn get_recipe_by_name(&self, name: &str) -> impl Future<Output = Result<Option<RecipeSummary>>> + Send {
        async move {
            let wanted = normalize_name(name);
            let recipes = self.get_recipes().await?;
            Ok(recipes.into_iter().find(|r| normalize_name(&r.name) == wanted))
        }
    }
}

/// Lowercased and trimmed, for name comparisons.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// HTTP implementation of [`MealieApi`].
#[derive(Debug, Clone)]
pub struct MealieClient {
    config: MealieConfig,
    http: Client,
}

impl MealieClient {
    /// Builds a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`MealsyncError::Http`] if the TLS backend cannot be initialized.
    pub fn new(config: MealieConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout_duration())
            .user_agent(concat!("mealsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(MealsyncError::Http)?;

        Ok(Self::with_http(config, http))
    }

    /// Uses a preconfigured `reqwest` client; its own timeout and proxy
    /// settings apply instead of the config's timeout.
    pub fn with_http(config: MealieConfig, http: Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &MealieConfig {
        &self.config
    }

    /// Sends an authenticated request under `/api`.
    ///
    /// # Errors
    ///
    /// Returns [`MealsyncError::Api`] with the status and raw body for any
    /// non-2xx response, [`MealsyncError::Timeout`] when the request exceeds the
    /// configured timeout, and [`MealsyncError::Http`] for other transport errors.
    pub async fn request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.api_url(path);
        debug!(%method, %url, "Sending request");

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.config.api_token)
            .header("Accept", "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "Received response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(MealsyncError::Api { status: status.as_u16(), body })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request::<Value>(Method::GET, path, None).await?;
        self.decode(path, response).await
    }

    /// Collects every page of a listing endpoint.
    ///
    /// Stops at the last page reported by `total_pages` (or `next`), on an
    /// empty page, or when the endpoint returns a bare array.
    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let paged = format!("{path}{separator}page={page}&perPage={PAGE_SIZE}");
            let listing: Listing<T> = self.get_json(&paged).await?;
            let more = listing.has_more(page);
            let batch = listing.into_items();
            let empty = batch.is_empty();
            items.extend(batch);

            if !more || empty {
                break;
            }
            if page >= MAX_PAGES {
                warn!(path, pages = page, "Listing has too many pages, stopping");
                break;
            }
            page += 1;
            debug!(path, page, "Fetching next page");
        }

        Ok(items)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(method, path, Some(body)).await?;
        self.decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(&self, path: &str, response: Response) -> Result<T> {
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text)
            .map_err(|e| MealsyncError::Decode { context: path.to_string(), message: e.to_string() })
    }

    fn transport_error(&self, err: reqwest::Error) -> MealsyncError {
        if err.is_timeout() {
            MealsyncError::Timeout { timeout: self.config.timeout }
        } else {
            MealsyncError::Http(err)
        }
    }
}

impl MealieApi for MealieClient {
    async fn search_ingredients(&self, query: &str) -> Result<Vec<Food>> {
        let path = format!("/foods?search={}", encode_query(query));
        self.get_all(&path).await
    }

    async fn create_ingredient(&self, name: &str) -> Result<Food> {
        self.send_json(Method::POST, "/foods", &NewFood::new(name)).await
    }

    async fn parse_ingredient(&self, text: &str) -> Result<Option<Value>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let mut last_error = None;
        for key in PARSER_PAYLOAD_KEYS {
            let mut payload = Map::new();
            payload.insert(key.to_string(), Value::String(text.to_string()));
            match self.send_json::<_, Value>(Method::POST, "/parser/ingredient", &payload).await {
                Ok(parsed) => return Ok(Some(parsed)),
                Err(err) if err.is_retryable_parser_status() => {
                    debug!(payload_key = key, error = %err, "Parser rejected payload shape, trying next");
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or(MealsyncError::Decode {
            context: "/parser/ingredient".to_string(),
            message: "no payload shape accepted".to_string(),
        }))
    }

    async fn get_recipes(&self) -> Result<Vec<RecipeSummary>> {
        self.get_all("/recipes").await
    }

    async fn create_recipe(&self, recipe: &MealieRecipe) -> Result<RecipeSummary> {
        let created: Value = self.send_json(Method::POST, "/recipes", recipe).await?;
        recipe_from_creation(created)
    }

    async fn update_recipe(&self, key: &str, recipe: &MealieRecipe) -> Result<RecipeSummary> {
        let path = format!("/recipes/{}", encode_path(key));
        self.send_json(Method::PATCH, &path, recipe).await
    }

    async fn create_mealplan(&self, date: &str, meal_type: MealType, recipe_id: &str) -> Result<MealPlanEntry> {
        let body = NewMealPlan { date, entry_type: meal_type, recipe_id };
        self.send_json(Method::POST, "/groups/mealplans", &body).await
    }

    async fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let path = format!("/organizers/tags?search={}", encode_query(name));
        let tags: Vec<Tag> = self.get_all(&path).await?;
        let wanted = normalize_name(name);
        Ok(tags.into_iter().find(|t| normalize_name(&t.name) == wanted))
    }
}

/// Interprets a recipe-creation response.
///
/// Mealie answers with the new slug as a bare JSON string; older or proxied
/// deployments return the record itself or a one-element list.
pub fn recipe_from_creation(created: Value) -> Result<RecipeSummary> {
    let unexpected = |kind: &str| MealsyncError::Decode {
        context: "/recipes".to_string(),
        message: format!("unexpected recipe creation response: {kind}"),
    };

    match created {
        Value::String(slug) if !slug.trim().is_empty() => {
            Ok(RecipeSummary { id: None, slug: Some(slug.trim().to_string()), name: String::new() })
        }
        Value::Object(_) => serde_json::from_value(created).map_err(|e| unexpected(&e.to_string())),
        Value::Array(items) => match items.into_iter().next() {
            Some(first @ Value::Object(_)) => serde_json::from_value(first).map_err(|e| unexpected(&e.to_string())),
            _ => Err(unexpected("empty list")),
        },
        other => Err(unexpected(&other.to_string())),
    }
}

fn encode_query(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.trim().as_bytes()).collect()
}

fn encode_path(segment: &str) -> String {
    encode_query(segment).replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_from_slug_string() {
        let summary = recipe_from_creation(json!("rakott-krumpli")).unwrap();
        assert_eq!(summary.slug.as_deref(), Some("rakott-krumpli"));
        assert_eq!(summary.identifier(), Some("rakott-krumpli"));
    }

    #[test]
    fn test_recipe_from_object_and_list() {
        let summary = recipe_from_creation(json!({"id": "abc", "slug": "leves", "name": "Leves"})).unwrap();
        assert_eq!(summary.id.as_deref(), Some("abc"));

        let summary = recipe_from_creation(json!([{"id": "def", "name": "Leves"}])).unwrap();
        assert_eq!(summary.id.as_deref(), Some("def"));
    }

    #[test]
    fn test_recipe_from_unexpected() {
        assert!(matches!(recipe_from_creation(json!([])), Err(MealsyncError::Decode { .. })));
        assert!(matches!(recipe_from_creation(json!(42)), Err(MealsyncError::Decode { .. })));
        assert!(matches!(recipe_from_creation(json!("  ")), Err(MealsyncError::Decode { .. })));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Túrós Csusza "), "túrós csusza");
    }

    #[test]
    fn test_query_encoding() {
        assert_eq!(encode_query("sült hagyma"), "s%C3%BClt+hagyma");
        assert_eq!(encode_path("a b"), "a%20b");
    }

    #[test]
    fn test_client_builds() {
        let config = MealieConfig::new("http://localhost:9000", "token").unwrap();
        let client = MealieClient::new(config).unwrap();
        assert_eq!(client.config().api_url("/foods"), "http://localhost:9000/api/foods");
    }
}
