#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use kitchenry_api::auth::jwt::JwtConfig;
use kitchenry_api::config::ServerConfig;
use kitchenry_api::llm::{LlmBackend, LlmConfig, LlmError, LlmRequest};
use kitchenry_api::router::build_app_router;
use kitchenry_api::state::AppState;
use kitchenry_core::llm::LlmProvider;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uploads go to a fresh temporary directory that lives for the rest of the
/// test process.
pub fn test_config() -> ServerConfig {
    let upload_dir: PathBuf = tempfile::tempdir()
        .expect("temp dir should be created")
        .keep();

    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir,
        static_dir: None,
        max_upload_bytes: 1024 * 1024,
        share_expiry_days: 30,
        join_code_expiry_days: 7,
        llm_cache_ttl_days: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            expiry_days: 30,
        },
        llm: LlmConfig {
            default_provider: LlmProvider::Ollama,
            ollama_url: "http://127.0.0.1:9".to_string(),
            ollama_model: "llama3".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o".to_string(),
            anthropic_api_key: None,
            anthropic_model: "claude-3-5-sonnet-latest".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// LLM stub
// ---------------------------------------------------------------------------

/// Canned completion backend. Replies are returned in order; the last one
/// repeats. An empty queue answers with an API error.
#[derive(Default)]
pub struct StubLlm {
    replies: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl StubLlm {
    pub fn with_replies(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmBackend for StubLlm {
    async fn complete(&self, _request: &LlmRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut replies = self.replies.lock().expect("stub lock");
        match replies.len() {
            0 => Err(LlmError::ApiError {
                status: 503,
                body: "stub offline".into(),
            }),
            1 => Ok(replies[0].clone()),
            _ => Ok(replies.pop().expect("non-empty")),
        }
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router with all middleware layers, using the
/// given database pool and an LLM backend that always fails.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_llm(pool, StubLlm::failing())
}

/// Like [`build_test_app`] with a specific LLM backend.
pub fn build_test_app_with_llm(pool: PgPool, llm: Arc<dyn LlmBackend>) -> Router {
    build_test_app_from(pool, llm, test_config())
}

/// Like [`build_test_app`], storing uploads in `upload_dir`.
pub fn build_test_app_with_uploads(pool: PgPool, upload_dir: PathBuf) -> Router {
    let config = ServerConfig {
        upload_dir,
        ..test_config()
    };
    build_test_app_from(pool, StubLlm::failing(), config)
}

fn build_test_app_from(pool: PgPool, llm: Arc<dyn LlmBackend>, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        llm,
        http: reqwest::Client::new(),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(token)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

/// Register an account through the API and return its token and id.
pub async fn register_user(app: Router, name: &str) -> (String, i64) {
    let body = serde_json::json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "password": "correct horse battery",
    });
    let response = post_json(app, "/api/auth/register", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    let token = json["data"]["token"].as_str().expect("token").to_string();
    let id = json["data"]["user"]["id"].as_i64().expect("user id");
    (token, id)
}

/// Create a recipe through the API and return its JSON.
pub async fn create_recipe(app: Router, token: &str, body: Value) -> Value {
    let response = post_json_auth(app, "/api/recipes", body, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
