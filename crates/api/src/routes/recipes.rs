//! Route definitions for the `/recipes` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::recipes;
use crate::state::AppState;

/// Routes mounted at `/recipes`.
///
/// ```text
/// GET    /                        -> list_recipes
/// POST   /                        -> create_recipe
/// GET    /export                  -> export_recipes
/// GET    /{id}                    -> get_recipe
/// PUT    /{id}                    -> update_recipe
/// DELETE /{id}                    -> delete_recipe
/// POST   /{id}/image              -> upload_image
/// POST   /{id}/favorite           -> toggle_favorite
/// GET    /{id}/scaled             -> scaled_recipe
/// GET    /{id}/print              -> print_recipe
/// POST   /{id}/share              -> share_recipe
/// GET    /{id}/card               -> recipe_card
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list_recipes).post(recipes::create_recipe))
        .route("/export", get(recipes::export_recipes))
        .route(
            "/{id}",
            get(recipes::get_recipe)
                .put(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route(
            "/{id}/image",
            post(recipes::upload_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/{id}/favorite", post(recipes::toggle_favorite))
        .route("/{id}/scaled", get(recipes::scaled_recipe))
        .route("/{id}/print", get(recipes::print_recipe))
        .route("/{id}/share", post(recipes::share_recipe))
        .route("/{id}/card", get(recipes::recipe_card))
}
