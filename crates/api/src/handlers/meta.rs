//! Server metadata: categories, client configuration and health.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use kitchenry_core::llm::LlmProvider;
use kitchenry_core::types::CATEGORIES;
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// Settings the client needs before login.
#[derive(Debug, Serialize)]
pub struct ClientConfig {
    pub version: &'static str,
    pub default_llm_provider: LlmProvider,
    pub available_llm_providers: Vec<&'static str>,
    pub share_expiry_days: i64,
    pub max_upload_bytes: usize,
}

/// GET /api/categories
pub async fn categories() -> impl IntoResponse {
    Json(DataResponse { data: CATEGORIES })
}

/// GET /api/config
pub async fn client_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(DataResponse {
        data: ClientConfig {
            version: env!("CARGO_PKG_VERSION"),
            default_llm_provider: state.config.llm.default_provider,
            available_llm_providers: LlmProvider::available(),
            share_expiry_days: state.config.share_expiry_days,
            max_upload_bytes: state.config.max_upload_bytes,
        },
    })
}

/// GET /health and GET /api/health -- service and database health.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = kitchenry_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}
