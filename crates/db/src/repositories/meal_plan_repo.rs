//! Repository for the `meal_plans` table.

use chrono::NaiveDate;
use kitchenry_core::types::{DbId, Scope};
use sqlx::PgPool;

use crate::models::meal_plan::{CreateMealPlan, MealPlan};
use crate::scope::scope_filter;

/// Column list for `meal_plans` aliased as `m`, joined with `recipes r`.
const COLUMNS: &str = "m.id, m.plan_date, m.meal_type, m.recipe_id, r.title AS recipe_title, \
    m.notes, m.user_id, m.household_id, m.created_at, m.updated_at";

/// Provides CRUD operations for meal plan entries.
pub struct MealPlanRepo;

impl MealPlanRepo {
    /// Insert an entry in `scope` created by `user_id`.
    pub async fn create(
        pool: &PgPool,
        scope: Scope,
        user_id: DbId,
        input: &CreateMealPlan,
    ) -> Result<MealPlan, sqlx::Error> {
        let query = format!(
            "WITH m AS (
                INSERT INTO meal_plans (plan_date, meal_type, recipe_id, notes, user_id, household_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
             )
             SELECT {COLUMNS} FROM m JOIN recipes r ON r.id = m.recipe_id"
        );
        sqlx::query_as::<_, MealPlan>(&query)
            .bind(input.date)
            .bind(input.meal_type.as_str())
            .bind(input.recipe_id)
            .bind(&input.notes)
            .bind(user_id)
            .bind(scope.household_id())
            .fetch_one(pool)
            .await
    }

    /// Entries of `scope` dated within `[start, end]`, earliest first.
    pub async fn list_in_range(
        pool: &PgPool,
        scope: Scope,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MealPlan>, sqlx::Error> {
        let (filter, owner) = scope_filter(scope, "m", 1);
        let query = format!(
            "SELECT {COLUMNS} FROM meal_plans m \
             JOIN recipes r ON r.id = m.recipe_id \
             WHERE {filter} AND m.plan_date BETWEEN $2 AND $3 \
             ORDER BY m.plan_date, m.id"
        );
        sqlx::query_as::<_, MealPlan>(&query)
            .bind(owner)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MealPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM meal_plans m \
             JOIN recipes r ON r.id = m.recipe_id \
             WHERE m.id = $1"
        );
        sqlx::query_as::<_, MealPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
