//! Handlers for cook mode: tonight's suggestions, cook sessions and
//! "would cook again" feedback.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kitchenry_core::suggestions::{rank_tonight, Candidate, Effort, DEFAULT_SUGGESTION_COUNT};
use kitchenry_core::types::{DbId, Feedback};
use kitchenry_db::models::cooking::SessionCompletion;
use kitchenry_db::models::recipe::Recipe;
use kitchenry_db::repositories::{CookingRepo, RecipeRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::recipes::visible_recipe;
use crate::middleware::auth::CurrentUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub recipe_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct CompleteSessionRequest {
    pub feedback: Feedback,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub recipe_id: DbId,
    pub feedback: Feedback,
}

/// One of tonight's suggestions.
#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub recipe: Recipe,
    pub effort: Effort,
    pub total_time: i32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/cooking/tonight
///
/// Top suggestions among visible recipes, biased by the caller's feedback
/// and by total time.
pub async fn tonight(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let recipes = RecipeRepo::list_visible(&state.pool, user.viewer()).await?;
    let feedback = CookingRepo::feedback_map(&state.pool, user.id()).await?;

    let candidates: Vec<Candidate> = recipes
        .iter()
        .map(|r| Candidate {
            recipe_id: r.id,
            prep_time: r.prep_time,
            cook_time: r.cook_time,
            ingredient_count: r.ingredients.0.len(),
        })
        .collect();
    let ranked = rank_tonight(&candidates, &feedback, DEFAULT_SUGGESTION_COUNT);

    let mut by_id: HashMap<DbId, Recipe> = recipes.into_iter().map(|r| (r.id, r)).collect();
    let suggestions: Vec<Suggestion> = ranked
        .into_iter()
        .filter_map(|rank| {
            by_id.remove(&rank.recipe_id).map(|recipe| Suggestion {
                recipe,
                effort: rank.effort,
                total_time: rank.total_time,
            })
        })
        .collect();

    Ok(Json(DataResponse { data: suggestions }))
}

/// POST /api/cooking/session
pub async fn start_session(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<StartSessionRequest>,
) -> AppResult<impl IntoResponse> {
    visible_recipe(&state, &user, input.recipe_id).await?;
    let session = CookingRepo::start_session(&state.pool, user.id(), input.recipe_id).await?;

    tracing::info!(
        session_id = session.id,
        recipe_id = input.recipe_id,
        user_id = user.id(),
        "Cook session started",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// POST /api/cooking/session/{id}/complete
///
/// Close a session with a rating; the rating becomes the recipe feedback.
pub async fn complete_session(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CompleteSessionRequest>,
) -> AppResult<impl IntoResponse> {
    let session =
        match CookingRepo::complete_session(&state.pool, id, user.id(), input.feedback).await? {
            SessionCompletion::Completed(session) => session,
            SessionCompletion::AlreadyCompleted => {
                return Err(AppError::conflict("Cook session is already completed"));
            }
            SessionCompletion::NotFound => return Err(AppError::not_found("CookSession", id)),
        };

    tracing::info!(
        session_id = id,
        user_id = user.id(),
        feedback = input.feedback.as_str(),
        "Cook session completed",
    );

    Ok(Json(DataResponse { data: session }))
}

/// POST /api/cooking/feedback
///
/// Record feedback without a session; replaces earlier feedback.
pub async fn record_feedback(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<impl IntoResponse> {
    visible_recipe(&state, &user, input.recipe_id).await?;
    CookingRepo::upsert_feedback(&state.pool, user.id(), input.recipe_id, input.feedback).await?;

    tracing::info!(
        recipe_id = input.recipe_id,
        user_id = user.id(),
        feedback = input.feedback.as_str(),
        "Feedback recorded",
    );

    Ok(Json(MessageResponse::new("Feedback recorded")))
}

/// GET /api/cooking/stats
pub async fn stats(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = CookingRepo::stats(&state.pool, user.id()).await?;
    Ok(Json(DataResponse { data: stats }))
}
