//! Route definitions for the `/meal-plans` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::meal_plans;
use crate::state::AppState;

/// Routes mounted at `/meal-plans`.
///
/// ```text
/// GET    /?start_date&end_date    -> list_meal_plans
/// POST   /                        -> create_meal_plan
/// DELETE /{id}                    -> delete_meal_plan
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(meal_plans::list_meal_plans).post(meal_plans::create_meal_plan),
        )
        .route("/{id}", delete(meal_plans::delete_meal_plan))
}
