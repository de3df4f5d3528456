//! Repository for the `users` table.

use kitchenry_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, household_id, allergies, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Fails with a unique violation on `uq_users_email` if the email is taken.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash)
             VALUES ($1, LOWER($2), $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    /// Members of a household, oldest account first.
    pub async fn list_by_household(
        pool: &PgPool,
        household_id: DbId,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE household_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(household_id)
            .fetch_all(pool)
            .await
    }

    /// Update a profile. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE(LOWER($3), email),
                allergies = COALESCE($4, allergies)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.allergies)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear a user's household.
    pub async fn set_household(
        pool: &PgPool,
        id: DbId,
        household_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET household_id = $2 WHERE id = $1")
            .bind(id)
            .bind(household_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a household-less user to a household. Returns `false` if the user
    /// already belongs to one (or does not exist).
    pub async fn join_household(
        pool: &PgPool,
        id: DbId,
        household_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET household_id = $2 WHERE id = $1 AND household_id IS NULL",
        )
        .bind(id)
        .bind(household_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an account and the data that is private to it.
    ///
    /// Personal recipes, meal plans and shopping lists (no household) are
    /// removed; household rows stay with the household and lose their
    /// author. Favorites, feedback, cook sessions, prompts, LLM settings and
    /// notification settings cascade.
    /// A household the user owns must already have been dissolved or handed
    /// over by the caller.
    pub async fn delete_account(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for table in ["meal_plans", "shopping_lists"] {
            sqlx::query(&format!(
                "DELETE FROM {table} WHERE user_id = $1 AND household_id IS NULL"
            ))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM recipes WHERE author_id = $1 AND household_id IS NULL")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
