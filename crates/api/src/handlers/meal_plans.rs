//! Handlers for the `/meal-plans` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kitchenry_core::types::DbId;
use kitchenry_db::models::meal_plan::CreateMealPlan;
use kitchenry_db::repositories::MealPlanRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::recipes::visible_recipe;
use crate::middleware::auth::CurrentUser;
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/meal-plans?start_date=&end_date=
///
/// Entries in the inclusive range, in date order.
pub async fn list_meal_plans(
    user: CurrentUser,
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    if range.end_date < range.start_date {
        return Err(AppError::validation("end_date must not be before start_date"));
    }
    let plans =
        MealPlanRepo::list_in_range(&state.pool, user.scope(), range.start_date, range.end_date)
            .await?;
    Ok(Json(DataResponse { data: plans }))
}

/// POST /api/meal-plans
pub async fn create_meal_plan(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMealPlan>,
) -> AppResult<impl IntoResponse> {
    visible_recipe(&state, &user, input.recipe_id).await?;

    let plan = MealPlanRepo::create(&state.pool, user.scope(), user.id(), &input).await?;

    tracing::info!(
        meal_plan_id = plan.id,
        recipe_id = input.recipe_id,
        user_id = user.id(),
        "Meal planned",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: plan })))
}

/// DELETE /api/meal-plans/{id}
pub async fn delete_meal_plan(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let plan = MealPlanRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| user.scope().contains(p.household_id, p.user_id))
        .ok_or(AppError::not_found("MealPlan", id))?;

    MealPlanRepo::delete(&state.pool, plan.id).await?;

    tracing::info!(meal_plan_id = id, user_id = user.id(), "Meal plan entry deleted");

    Ok(StatusCode::NO_CONTENT)
}
