//! Route definitions for the `/cooking` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cooking;
use crate::state::AppState;

/// Routes mounted at `/cooking`.
///
/// ```text
/// GET    /tonight                 -> tonight
/// POST   /session                 -> start_session
/// POST   /session/{id}/complete   -> complete_session
/// POST   /feedback                -> record_feedback
/// GET    /stats                   -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tonight", get(cooking::tonight))
        .route("/session", post(cooking::start_session))
        .route("/session/{id}/complete", post(cooking::complete_session))
        .route("/feedback", post(cooking::record_feedback))
        .route("/stats", get(cooking::stats))
}
