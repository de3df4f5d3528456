use axum::routing::{get, post};
use axum::Router;

use crate::handlers::favorites;
use crate::state::AppState;

/// Routes mounted at `/favorites`.
///
/// ```text
/// GET    /                        -> list_favorites
/// POST   /{recipe_id}             -> add_favorite
/// DELETE /{recipe_id}             -> remove_favorite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::list_favorites))
        .route(
            "/{recipe_id}",
            post(favorites::add_favorite).delete(favorites::remove_favorite),
        )
}
