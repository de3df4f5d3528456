use axum::routing::get;
use axum::Router;

use crate::handlers::shared;
use crate::state::AppState;

/// Routes mounted at `/shared`. Public; no token required.
///
/// ```text
/// GET    /{share_id}              -> get_shared_recipe
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{share_id}", get(shared::get_shared_recipe))
}
