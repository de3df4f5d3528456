use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// POST   /subscribe               -> subscribe
/// GET    /settings                -> get_settings
/// PUT    /settings                -> update_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscribe", post(notifications::subscribe))
        .route(
            "/settings",
            get(notifications::get_settings).put(notifications::update_settings),
        )
}
