use axum::routing::get;
use axum::Router;

use crate::handlers::meta;
use crate::state::AppState;

/// Public metadata routes, merged at the `/api` root.
///
/// ```text
/// GET    /categories              -> categories
/// GET    /config                  -> client_config
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(meta::categories))
        .route("/config", get(meta::client_config))
}
