//! Route definitions for the `/ai` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/ai`.
///
/// ```text
/// POST   /import-url              -> import_from_url
/// POST   /import-text             -> import_from_text
/// POST   /auto-meal-plan          -> auto_meal_plan
/// POST   /fridge-search           -> fridge_search
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/import-url", post(ai::import_from_url))
        .route("/import-text", post(ai::import_from_text))
        .route("/auto-meal-plan", post(ai::auto_meal_plan))
        .route("/fridge-search", post(ai::fridge_search))
}
