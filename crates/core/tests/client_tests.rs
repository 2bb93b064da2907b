//! MealieClient tests against a scripted in-process HTTP server
use std::sync::{Arc, Mutex};

use mealsync_core::*;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    authorization: Option<String>,
    body: String,
}

impl Recorded {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

/// Serves `responses` in order, one per connection, and records each request.
async fn spawn_stub(responses: Vec<(u16, String)>) -> (String, Arc<Mutex<Vec<Recorded>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&recorded);

    tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut socket, _)) = listener.accept().await else { return };
            let request = read_request(&mut socket).await;
            log.lock().unwrap().push(request);

            let response = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (base, recorded)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Recorded {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "authorization" => authorization = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = (header_end + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();
    Recorded { method, path, authorization, body }
}

fn client(base: &str) -> MealieClient {
    let config = MealieConfig::new(base, "test-token").unwrap().with_timeout(5);
    let http = reqwest::Client::builder()
        .no_proxy()
        .timeout(config.timeout_duration())
        .build()
        .unwrap();
    MealieClient::with_http(config, http)
}

#[tokio::test]
async fn test_parser_advances_payload_shapes_on_422() {
    let (base, recorded) = spawn_stub(vec![
        (422, r#"{"detail":"field required"}"#.to_string()),
        (200, r#"{"ingredient": {"quantity": 2, "food": {"name": "tojás"}}}"#.to_string()),
    ])
    .await;

    let parsed = client(&base).parse_ingredient(" 2 tojás ").await.unwrap();

    assert_eq!(parsed.unwrap()["ingredient"]["food"]["name"], "tojás");
    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/api/parser/ingredient");
    assert_eq!(requests[0].json(), json!({"ingredient": "2 tojás"}));
    assert_eq!(requests[1].json(), json!({"input": "2 tojás"}));
}

#[tokio::test]
async fn test_parser_stops_on_unauthorized() {
    let (base, recorded) = spawn_stub(vec![
        (401, r#"{"detail":"not authenticated"}"#.to_string()),
        (200, "{}".to_string()),
    ])
    .await;

    let err = client(&base).parse_ingredient("1 alma").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(recorded.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_parser_exhausts_all_shapes() {
    let (base, recorded) = spawn_stub(vec![
        (400, "bad".to_string()),
        (404, "missing".to_string()),
        (422, "unprocessable".to_string()),
    ])
    .await;

    let err = client(&base).parse_ingredient("só").await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[2].json(), json!({"text": "só"}));
}

#[tokio::test]
async fn test_parser_skips_blank_text() {
    let (base, recorded) = spawn_stub(Vec::new()).await;

    assert!(client(&base).parse_ingredient("   ").await.unwrap().is_none());
    assert!(recorded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_error_carries_status_and_body() {
    let (base, _) = spawn_stub(vec![(500, r#"{"detail":"database locked"}"#.to_string())]).await;

    let err = client(&base).get_recipes().await.unwrap_err();

    match err {
        MealsyncError::Api { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("database locked"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_recipes_envelope_and_bearer_auth() {
    let (base, recorded) = spawn_stub(vec![(
        200,
        r#"{"items": [{"id": "a1", "slug": "lecso", "name": "Lecsó"}], "total": 1, "page": 1}"#.to_string(),
    )])
    .await;

    let found = client(&base).get_recipe_by_name("  LECSÓ").await.unwrap().unwrap();

    assert_eq!(found.id.as_deref(), Some("a1"));
    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/recipes?page=1&perPage=50");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer test-token"));
}

#[tokio::test]
async fn test_recipe_lookup_follows_pages() {
    let first_page: Vec<Value> =
        (0..50).map(|i| json!({"id": format!("r{i}"), "slug": format!("recept-{i}"), "name": format!("Recept {i}")})).collect();
    let (base, recorded) = spawn_stub(vec![
        (200, json!({"items": first_page, "page": 1, "per_page": 50, "total": 51, "total_pages": 2}).to_string()),
        (
            200,
            json!({"items": [{"id": "a51", "slug": "lecso", "name": "Lecsó"}], "page": 2, "per_page": 50, "total": 51, "total_pages": 2, "next": null})
                .to_string(),
        ),
    ])
    .await;

    let found = client(&base).get_recipe_by_name("Lecsó").await.unwrap();

    assert_eq!(found.and_then(|r| r.id).as_deref(), Some("a51"));
    let paths: Vec<String> = recorded.lock().unwrap().iter().map(|r| r.path.clone()).collect();
    assert_eq!(paths, vec!["/api/recipes?page=1&perPage=50", "/api/recipes?page=2&perPage=50"]);
}

#[tokio::test]
async fn test_food_search_follows_next_link() {
    let (base, recorded) = spawn_stub(vec![
        (200, r#"{"items": [{"id": "f1", "name": "tejföl"}], "next": "/foods?page=2&perPage=50"}"#.to_string()),
        (200, r#"{"items": [{"id": "f2", "name": "tej"}], "next": null}"#.to_string()),
    ])
    .await;

    let food = client(&base).get_ingredient_by_name("Tej").await.unwrap().unwrap();

    assert_eq!(food.id.as_deref(), Some("f2"));
    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].path, "/api/foods?search=Tej&page=2&perPage=50");
}

#[tokio::test]
async fn test_ensure_ingredient_creates_when_missing() {
    let (base, recorded) = spawn_stub(vec![
        (200, r#"{"items": [{"id": "f1", "name": "sült hagymás"}]}"#.to_string()),
        (201, r#"{"id": "f2", "name": "sült hagyma"}"#.to_string()),
    ])
    .await;

    let ensured = client(&base).ensure_ingredient_exists("Sült hagyma").await.unwrap();

    assert_eq!(ensured, Ensured::Created(Food { id: Some("f2".into()), name: "sült hagyma".into() }));
    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests[0].path, "/api/foods?search=S%C3%BClt+hagyma&page=1&perPage=50");
    assert_eq!(requests[1].method, "POST");
    assert_eq!(requests[1].json()["name"], "Sült hagyma");
    assert_eq!(requests[1].json()["description"], "Auto-created ingredient: Sült hagyma");
}

#[tokio::test]
async fn test_create_recipe_slug_then_patch() {
    let (base, recorded) = spawn_stub(vec![
        (201, r#""rakott-krumpli""#.to_string()),
        (200, r#"{"id": "uuid-1", "slug": "rakott-krumpli", "name": "Rakott krumpli"}"#.to_string()),
    ])
    .await;

    let raw: RawRecipe = serde_json::from_value(json!({"name": "Rakott krumpli"})).unwrap();
    let payload = assemble_recipe(&raw, Vec::new(), Vec::new());
    let client = client(&base);

    let created = client.create_recipe(&payload).await.unwrap();
    assert_eq!(created.slug.as_deref(), Some("rakott-krumpli"));
    let updated = client.update_recipe("rakott-krumpli", &payload).await.unwrap();
    assert_eq!(updated.identifier(), Some("uuid-1"));

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests[1].method, "PATCH");
    assert_eq!(requests[1].path, "/api/recipes/rakott-krumpli");
    assert_eq!(requests[1].json()["recipeYield"], "1");
}

#[tokio::test]
async fn test_create_mealplan_body() {
    let (base, recorded) = spawn_stub(vec![(201, r#"{"id": 7, "date": "2025-06-23", "entryType": "lunch"}"#.to_string())]).await;

    let entry = client(&base).create_mealplan("2025-06-23", MealType::Lunch, "uuid-1").await.unwrap();

    assert_eq!(entry.id.as_deref(), Some("7"));
    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests[0].path, "/api/groups/mealplans");
    assert_eq!(requests[0].json(), json!({"date": "2025-06-23", "entryType": "lunch", "recipeId": "uuid-1"}));
}

#[tokio::test]
async fn test_tag_lookup_matches_name() {
    let (base, _) = spawn_stub(vec![(
        200,
        r#"{"items": [{"id": "t0", "name": "Reggeliző"}, {"id": "t1", "name": "Reggeli", "slug": "reggeli"}]}"#.to_string(),
    )])
    .await;

    let tag = client(&base).get_tag_by_name("reggeli").await.unwrap().unwrap();

    assert_eq!(tag.id.as_deref(), Some("t1"));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&base).get_recipes().await.unwrap_err();

    assert!(matches!(err, MealsyncError::Http(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_slow_server_maps_to_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let Ok((socket, _)) = listener.accept().await else { return };
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        drop(socket);
    });

    let config = MealieConfig::new(&base, "test-token").unwrap().with_timeout(1);
    let http = reqwest::Client::builder()
        .no_proxy()
        .timeout(config.timeout_duration())
        .build()
        .unwrap();

    let err = MealieClient::with_http(config, http).get_recipes().await.unwrap_err();

    assert!(matches!(err, MealsyncError::Timeout { timeout: 1 }));
}
