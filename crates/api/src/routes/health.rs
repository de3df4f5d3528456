use axum::routing::get;
use axum::Router;

use crate::handlers::meta;
use crate::state::AppState;

/// Health check, mounted both at the root and under `/api`.
///
/// ```text
/// GET    /health                  -> health_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(meta::health_check))
}
