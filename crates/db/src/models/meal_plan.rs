//! Meal plan entry model and DTOs.

use chrono::NaiveDate;
use kitchenry_core::types::{DbId, MealType, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A `meal_plans` row joined with its recipe's title.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MealPlan {
    pub id: DbId,
    #[serde(rename = "date")]
    pub plan_date: NaiveDate,
    pub meal_type: String,
    pub recipe_id: DbId,
    pub recipe_title: String,
    pub notes: String,
    /// Creator; `None` once that account is deleted.
    pub user_id: Option<DbId>,
    pub household_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /meal-plans`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMealPlan {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: DbId,
    #[serde(default)]
    pub notes: String,
}
