//! Public read access to shared recipes. No authentication.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use kitchenry_core::error::CoreError;
use kitchenry_core::sharing::is_expired;
use kitchenry_core::types::Timestamp;
use kitchenry_db::models::recipe::Recipe;
use kitchenry_db::repositories::{RecipeRepo, ShareRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Anonymous viewer id; matches no author and no favorites.
const ANONYMOUS: i64 = 0;

#[derive(Debug, Serialize)]
pub struct SharedRecipe {
    pub recipe: Recipe,
    pub expires_at: Timestamp,
}

/// GET /api/shared/{share_id}
///
/// Unknown links answer 404, expired ones 410.
pub async fn get_shared_recipe(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let share = ShareRepo::find_by_token(&state.pool, &share_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shared recipe not found".into()))?;

    if is_expired(share.expires_at, Utc::now()) {
        return Err(AppError::Core(CoreError::Gone(
            "This share link has expired".into(),
        )));
    }

    let recipe = RecipeRepo::find_by_id(&state.pool, share.recipe_id, ANONYMOUS)
        .await?
        .ok_or_else(|| AppError::NotFound("Shared recipe not found".into()))?;

    Ok(Json(DataResponse {
        data: SharedRecipe {
            recipe,
            expires_at: share.expires_at,
        },
    }))
}
