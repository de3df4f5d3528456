//! Repository for the `recipe_favorites` table.

use kitchenry_core::types::DbId;
use sqlx::PgPool;

/// Per-user favorite recipes.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Recipe ids the user has favorited, most recent first.
    pub async fn list_recipe_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT recipe_id FROM recipe_favorites \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Mark a recipe as favorite. Adding an existing favorite is a no-op.
    pub async fn add(pool: &PgPool, user_id: DbId, recipe_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO recipe_favorites (user_id, recipe_id) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_recipe_favorites_user_recipe DO NOTHING",
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a favorite. Returns `true` if one existed.
    pub async fn remove(pool: &PgPool, user_id: DbId, recipe_id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM recipe_favorites WHERE user_id = $1 AND recipe_id = $2")
                .bind(user_id)
                .bind(recipe_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn is_favorite(
        pool: &PgPool,
        user_id: DbId,
        recipe_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM recipe_favorites WHERE user_id = $1 AND recipe_id = $2)",
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(pool)
        .await
    }

    /// Flip the favorite flag and return the new state.
    pub async fn toggle(pool: &PgPool, user_id: DbId, recipe_id: DbId) -> Result<bool, sqlx::Error> {
        if Self::remove(pool, user_id, recipe_id).await? {
            return Ok(false);
        }
        Self::add(pool, user_id, recipe_id).await?;
        Ok(true)
    }
}
