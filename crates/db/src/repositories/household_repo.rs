//! Repository for the `households` table.
//!
//! Membership is stored on `users.household_id`; the methods here that
//! change membership touch both tables in one transaction.

use kitchenry_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::household::Household;

const COLUMNS: &str = "id, name, owner_id, join_code, join_code_expires_at, created_at, updated_at";

/// Provides CRUD operations for households.
pub struct HouseholdRepo;

impl HouseholdRepo {
    /// Create a household owned by `owner_id` and make the owner its first
    /// member.
    ///
    /// Returns `None` (and creates nothing) if the owner already belongs to a
    /// household.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        owner_id: DbId,
    ) -> Result<Option<Household>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO households (name, owner_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let household = sqlx::query_as::<_, Household>(&query)
            .bind(name)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        let joined = sqlx::query(
            "UPDATE users SET household_id = $2 WHERE id = $1 AND household_id IS NULL",
        )
        .bind(owner_id)
        .bind(household.id)
        .execute(&mut *tx)
        .await?;

        if joined.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(household))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Household>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM households WHERE id = $1");
        sqlx::query_as::<_, Household>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a household by its (normalized) join code. Expiry is checked
    /// by the caller so it can answer differently for expired codes.
    pub async fn find_by_join_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Household>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM households WHERE join_code = $1");
        sqlx::query_as::<_, Household>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Member user ids, oldest account first.
    pub async fn member_ids(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM users WHERE household_id = $1 ORDER BY created_at, id",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }

    pub async fn member_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE household_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }

    /// Store a new join code, replacing any previous one.
    pub async fn set_join_code(
        pool: &PgPool,
        id: DbId,
        code: &str,
        expires_at: Timestamp,
    ) -> Result<Option<Household>, sqlx::Error> {
        let query = format!(
            "UPDATE households SET join_code = $2, join_code_expires_at = $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Household>(&query)
            .bind(id)
            .bind(code)
            .bind(expires_at)
            .fetch_optional(pool)
            .await
    }

    /// Revoke the join code. Returns `true` if a code was cleared.
    pub async fn clear_join_code(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE households SET join_code = NULL, join_code_expires_at = NULL \
             WHERE id = $1 AND join_code IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hand ownership to another member. Returns `false` if `new_owner_id` is
    /// not a member of the household.
    pub async fn transfer_owner(
        pool: &PgPool,
        id: DbId,
        new_owner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE households SET owner_id = $2 \
             WHERE id = $1 \
               AND EXISTS (SELECT 1 FROM users WHERE id = $2 AND household_id = $1)",
        )
        .bind(id)
        .bind(new_owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Dissolve a household.
    ///
    /// Members become household-less, meal plans and shopping lists of the
    /// household are removed, and household recipes fall back to their
    /// authors. Recipes whose author no longer exists are removed with it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM recipes WHERE household_id = $1 AND author_id IS NULL")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM households WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
