use axum::routing::post;
use axum::Router;

use crate::handlers::import;
use crate::state::AppState;

/// Routes mounted at `/import`.
///
/// ```text
/// POST   /platform                -> import_platform
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/platform", post(import::import_platform))
}
