//! Repository for the `cook_sessions` and `recipe_feedback` tables.

use std::collections::HashMap;

use kitchenry_core::types::{DbId, Feedback};
use sqlx::PgPool;

use crate::models::cooking::{CookSession, CookingStats, SessionCompletion};

const SESSION_COLUMNS: &str =
    "id, user_id, recipe_id, started_at, completed_at, feedback, created_at, updated_at";

/// Cooking sessions and the per-recipe "would cook again" rating.
pub struct CookingRepo;

impl CookingRepo {
    pub async fn start_session(
        pool: &PgPool,
        user_id: DbId,
        recipe_id: DbId,
    ) -> Result<CookSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO cook_sessions (user_id, recipe_id) VALUES ($1, $2) \
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, CookSession>(&query)
            .bind(user_id)
            .bind(recipe_id)
            .fetch_one(pool)
            .await
    }

    /// Close an open session of `user_id` with a rating and record the
    /// rating as the user's feedback for the recipe. A session closes once.
    pub async fn complete_session(
        pool: &PgPool,
        session_id: DbId,
        user_id: DbId,
        feedback: Feedback,
    ) -> Result<SessionCompletion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE cook_sessions SET completed_at = NOW(), feedback = $3 \
             WHERE id = $1 AND user_id = $2 AND completed_at IS NULL \
             RETURNING {SESSION_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, CookSession>(&query)
            .bind(session_id)
            .bind(user_id)
            .bind(feedback.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(session) = updated else {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM cook_sessions WHERE id = $1 AND user_id = $2)",
            )
            .bind(session_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
            tx.rollback().await?;
            return Ok(if exists {
                SessionCompletion::AlreadyCompleted
            } else {
                SessionCompletion::NotFound
            });
        };

        sqlx::query(UPSERT_FEEDBACK)
            .bind(user_id)
            .bind(session.recipe_id)
            .bind(feedback.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(SessionCompletion::Completed(session))
    }

    /// Record or replace the user's rating of a recipe.
    pub async fn upsert_feedback(
        pool: &PgPool,
        user_id: DbId,
        recipe_id: DbId,
        feedback: Feedback,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(UPSERT_FEEDBACK)
            .bind(user_id)
            .bind(recipe_id)
            .bind(feedback.as_str())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// The user's rating per recipe id.
    pub async fn feedback_map(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<HashMap<DbId, Feedback>, sqlx::Error> {
        let rows: Vec<(DbId, String)> =
            sqlx::query_as("SELECT recipe_id, feedback FROM recipe_feedback WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(recipe_id, feedback)| Some((recipe_id, feedback.parse().ok()?)))
            .collect())
    }

    /// Completed sessions and rating counts of one user.
    pub async fn stats(pool: &PgPool, user_id: DbId) -> Result<CookingStats, sqlx::Error> {
        sqlx::query_as::<_, CookingStats>(
            "SELECT \
                (SELECT COUNT(*) FROM cook_sessions \
                 WHERE user_id = $1 AND completed_at IS NOT NULL) AS total_cooked, \
                COUNT(*) FILTER (WHERE feedback = 'yes') AS would_cook_again, \
                COUNT(*) FILTER (WHERE feedback = 'no') AS would_not_cook_again, \
                COUNT(*) FILTER (WHERE feedback = 'meh') AS meh \
             FROM recipe_feedback WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}

const UPSERT_FEEDBACK: &str = "INSERT INTO recipe_feedback (user_id, recipe_id, feedback) \
     VALUES ($1, $2, $3) \
     ON CONFLICT ON CONSTRAINT uq_recipe_feedback_user_recipe \
     DO UPDATE SET feedback = EXCLUDED.feedback";
