//! Repository for the `recipe_shares` table.

use kitchenry_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::share::RecipeShare;

const COLUMNS: &str = "id, share_token, recipe_id, created_by, expires_at, created_at, updated_at";

/// Public share links for recipes.
pub struct ShareRepo;

impl ShareRepo {
    /// Store a new share link.
    ///
    /// Fails with a unique violation on `uq_recipe_shares_share_token` in the
    /// unlikely event of a token collision.
    pub async fn create(
        pool: &PgPool,
        recipe_id: DbId,
        created_by: DbId,
        share_token: &str,
        expires_at: Timestamp,
    ) -> Result<RecipeShare, sqlx::Error> {
        let query = format!(
            "INSERT INTO recipe_shares (share_token, recipe_id, created_by, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RecipeShare>(&query)
            .bind(share_token)
            .bind(recipe_id)
            .bind(created_by)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Look up a link by token, expired or not.
    pub async fn find_by_token(
        pool: &PgPool,
        share_token: &str,
    ) -> Result<Option<RecipeShare>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipe_shares WHERE share_token = $1");
        sqlx::query_as::<_, RecipeShare>(&query)
            .bind(share_token)
            .fetch_optional(pool)
            .await
    }

    /// Delete links that expired before `cutoff`. Returns the number removed.
    pub async fn purge_expired(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipe_shares WHERE expires_at <= $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
