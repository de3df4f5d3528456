//! Handlers for the `/favorites` resource. Favorites are per user, not per
//! household.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kitchenry_core::types::DbId;
use kitchenry_db::repositories::FavoriteRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::recipes::{visible_recipe, FavoriteState};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/favorites
///
/// Ids of the caller's favorite recipes.
pub async fn list_favorites(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let ids = FavoriteRepo::list_recipe_ids(&state.pool, user.id()).await?;
    Ok(Json(DataResponse { data: ids }))
}

/// POST /api/favorites/{recipe_id}
pub async fn add_favorite(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    visible_recipe(&state, &user, recipe_id).await?;
    FavoriteRepo::add(&state.pool, user.id(), recipe_id).await?;

    tracing::info!(recipe_id, user_id = user.id(), "Favorite added");

    Ok(Json(DataResponse {
        data: FavoriteState {
            recipe_id,
            is_favorite: true,
        },
    }))
}

/// DELETE /api/favorites/{recipe_id}
pub async fn remove_favorite(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !FavoriteRepo::remove(&state.pool, user.id(), recipe_id).await? {
        return Err(AppError::not_found("Favorite", recipe_id));
    }

    tracing::info!(recipe_id, user_id = user.id(), "Favorite removed");

    Ok(StatusCode::NO_CONTENT)
}
