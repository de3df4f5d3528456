#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use kitchenry_client::api::{ApiClient, Navigator};
use kitchenry_client::models::User;
use kitchenry_client::store::{MemoryStore, SessionStore};

pub const GOOD_TOKEN: &str = "good-token";
pub const PASSWORD: &str = "correct horse battery";

// ---------------------------------------------------------------------------
// Navigation recorder
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

// ---------------------------------------------------------------------------
// Stub backend
// ---------------------------------------------------------------------------

/// In-memory stand-in for the API server.
#[derive(Debug, Default)]
pub struct Backend {
    recipes: Mutex<Vec<Value>>,
    me_calls: AtomicUsize,
}

impl Backend {
    pub fn me_calls(&self) -> usize {
        self.me_calls.load(Ordering::SeqCst)
    }
}

pub struct Harness {
    pub client: ApiClient,
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub backend: Arc<Backend>,
}

/// Start the stub backend on an ephemeral port and point a client at it.
pub async fn start() -> Harness {
    let backend = Arc::new(Backend::default());
    let base_url = spawn(stub_router(backend.clone())).await;
    let store = Arc::new(MemoryStore::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        base_url,
        store.clone(),
        navigator.clone(),
    );
    Harness {
        client,
        store,
        navigator,
        backend,
    }
}

pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server failed");
    });
    format!("http://{addr}")
}

pub fn user(name: &str) -> User {
    User {
        id: 1,
        name: name.to_string(),
        email: "ada@example.com".to_string(),
        household_id: None,
        allergies: vec![],
    }
}

pub fn sign_in(store: &MemoryStore, token: &str, user: &User) {
    store.save_session(token, user).unwrap();
}

fn stub_router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route("/api/recipes/{id}", delete(delete_recipe))
        .route("/api/calendar/ical", get(ical))
        .route("/api/recipes/{id}/card", get(card))
        .with_state(backend)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Invalid or expired token", "code": "UNAUTHORIZED" })),
    )
        .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {GOOD_TOKEN}"))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid email or password", "code": "UNAUTHORIZED" })),
        )
            .into_response();
    }
    Json(json!({
        "data": {
            "token": GOOD_TOKEN,
            "user": {
                "id": 1,
                "name": "Ada",
                "email": body["email"],
                "household_id": null,
                "allergies": [],
                "created_at": "2026-03-01T12:00:00Z"
            }
        }
    }))
    .into_response()
}

async fn me(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.me_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "data": user("Ada") })).into_response()
}

async fn list_recipes(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let recipes: Vec<Value> = backend
        .recipes
        .lock()
        .unwrap()
        .iter()
        .filter(|r| query.get("category").is_none_or(|c| r["category"] == *c))
        .cloned()
        .collect();
    Json(json!({ "data": recipes })).into_response()
}

async fn create_recipe(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let title = body["title"].as_str().unwrap_or_default().trim().to_string();
    if title.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Title is required", "code": "VALIDATION_ERROR" })),
        )
            .into_response();
    }

    let mut recipes = backend.recipes.lock().unwrap();
    let recipe = json!({
        "id": recipes.len() as i64 + 1,
        "title": title,
        "description": body["description"],
        "category": body["category"],
        "prep_time": body["prep_time"],
        "cook_time": body["cook_time"],
        "servings": body["servings"],
        "tags": body["tags"],
        "ingredients": body["ingredients"],
        "instructions": body["instructions"],
        "image_url": "",
        "author_id": 1,
        "household_id": null,
        "is_favorite": false,
        "created_at": "2026-03-01T12:00:00Z",
        "updated_at": "2026-03-01T12:00:00Z"
    });
    recipes.push(recipe.clone());
    (StatusCode::CREATED, Json(json!({ "data": recipe }))).into_response()
}

async fn delete_recipe(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut recipes = backend.recipes.lock().unwrap();
    let before = recipes.len();
    recipes.retain(|r| r["id"] != id);
    if recipes.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Recipe with id {id} not found"), "code": "NOT_FOUND" })),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn ical(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let start = query.get("start_date").cloned().unwrap_or_default();
    (
        [("content-type", "text/calendar")],
        format!("BEGIN:VCALENDAR\r\nX-RANGE-START:{start}\r\nEND:VCALENDAR\r\n"),
    )
        .into_response()
}

/// The stub card is this signature followed by the recipe id.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

async fn card(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut body = PNG_SIGNATURE.to_vec();
    body.extend_from_slice(&id.to_be_bytes());
    ([("content-type", "image/png")], body).into_response()
}
