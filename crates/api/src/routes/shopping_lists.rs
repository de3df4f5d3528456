//! Route definitions for the `/shopping-lists` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::shopping_lists;
use crate::state::AppState;

/// Routes mounted at `/shopping-lists`.
///
/// ```text
/// GET    /                        -> list_shopping_lists
/// POST   /                        -> create_shopping_list
/// POST   /from-recipes            -> create_from_recipes
/// GET    /{id}                    -> get_shopping_list
/// PUT    /{id}                    -> update_shopping_list
/// DELETE /{id}                    -> delete_shopping_list
/// POST   /{id}/items              -> add_item
/// PUT    /{id}/items/{item_id}    -> update_item
/// DELETE /{id}/items/{item_id}    -> delete_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(shopping_lists::list_shopping_lists).post(shopping_lists::create_shopping_list),
        )
        .route("/from-recipes", post(shopping_lists::create_from_recipes))
        .route(
            "/{id}",
            get(shopping_lists::get_shopping_list)
                .put(shopping_lists::update_shopping_list)
                .delete(shopping_lists::delete_shopping_list),
        )
        .route("/{id}/items", post(shopping_lists::add_item))
        .route(
            "/{id}/items/{item_id}",
            put(shopping_lists::update_item).delete(shopping_lists::delete_item),
        )
}
