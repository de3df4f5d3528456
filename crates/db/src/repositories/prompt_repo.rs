//! Repository for the `custom_prompts` table.

use kitchenry_core::types::DbId;
use sqlx::PgPool;

use crate::models::prompt::CustomPrompts;

/// Per-user overrides of the AI system prompts.
pub struct PromptRepo;

impl PromptRepo {
    /// Stored overrides, all `None` if the user has none.
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<CustomPrompts, sqlx::Error> {
        let prompts = sqlx::query_as::<_, CustomPrompts>(
            "SELECT recipe_extraction, meal_planning, fridge_search \
             FROM custom_prompts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(prompts.unwrap_or_default())
    }

    /// Save overrides. `None` fields keep their stored value.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &CustomPrompts,
    ) -> Result<CustomPrompts, sqlx::Error> {
        sqlx::query_as::<_, CustomPrompts>(
            "INSERT INTO custom_prompts (user_id, recipe_extraction, meal_planning, fridge_search) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_custom_prompts_user_id DO UPDATE SET \
                recipe_extraction = COALESCE(EXCLUDED.recipe_extraction, custom_prompts.recipe_extraction), \
                meal_planning = COALESCE(EXCLUDED.meal_planning, custom_prompts.meal_planning), \
                fridge_search = COALESCE(EXCLUDED.fridge_search, custom_prompts.fridge_search) \
             RETURNING recipe_extraction, meal_planning, fridge_search",
        )
        .bind(user_id)
        .bind(&input.recipe_extraction)
        .bind(&input.meal_planning)
        .bind(&input.fridge_search)
        .fetch_one(pool)
        .await
    }

    /// Drop all overrides so the defaults apply again.
    pub async fn reset(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM custom_prompts WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
