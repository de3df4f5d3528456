//! Repository for the `recipes` table.
//!
//! Every read is made on behalf of a [`Viewer`]: queries only return recipes
//! the viewer can see and fill `is_favorite` for that viewer. The viewer's
//! user id is always bound at `$1`.

use kitchenry_core::recipe::RecipeDraft;
use kitchenry_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::recipe::{Recipe, RecipeFilter, Viewer};

/// Column list for `recipes` aliased as `r`, plus the favorite flag.
const COLUMNS: &str = "r.id, r.title, r.description, r.category, r.prep_time, r.cook_time, \
    r.servings, r.tags, r.ingredients, r.instructions, r.image_url, r.author_id, \
    r.household_id, r.created_at, r.updated_at, \
    EXISTS (SELECT 1 FROM recipe_favorites f WHERE f.recipe_id = r.id AND f.user_id = $1) \
    AS is_favorite";

/// Visibility predicate; expects the viewer at `$1` and their household at `$2`.
const VISIBLE: &str = "(r.author_id = $1 OR r.household_id = $2)";

/// Provides CRUD operations for recipes.
pub struct RecipeRepo;

impl RecipeRepo {
    /// Insert a recipe authored by `author_id`, shared with `household_id`
    /// when the author has one.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        household_id: Option<DbId>,
        draft: &RecipeDraft,
    ) -> Result<Recipe, sqlx::Error> {
        let query = format!(
            "WITH r AS (
                INSERT INTO recipes
                    (title, description, category, prep_time, cook_time, servings,
                     tags, ingredients, instructions, image_url, author_id, household_id)
                VALUES ($2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $1, $12)
                RETURNING *
             )
             SELECT {COLUMNS} FROM r"
        );
        sqlx::query_as::<_, Recipe>(&query)
            .bind(author_id)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(&draft.category)
            .bind(draft.prep_time)
            .bind(draft.cook_time)
            .bind(draft.servings)
            .bind(&draft.tags)
            .bind(Json(&draft.ingredients))
            .bind(&draft.instructions)
            .bind(&draft.image_url)
            .bind(household_id)
            .fetch_one(pool)
            .await
    }

    /// Insert many recipes in one transaction. Returns how many were stored.
    pub async fn create_many(
        pool: &PgPool,
        author_id: DbId,
        household_id: Option<DbId>,
        drafts: &[RecipeDraft],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut inserted = 0;

        for draft in drafts {
            let result = sqlx::query(
                "INSERT INTO recipes
                    (title, description, category, prep_time, cook_time, servings,
                     tags, ingredients, instructions, image_url, author_id, household_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            )
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(&draft.category)
            .bind(draft.prep_time)
            .bind(draft.cook_time)
            .bind(draft.servings)
            .bind(&draft.tags)
            .bind(Json(&draft.ingredients))
            .bind(&draft.instructions)
            .bind(&draft.image_url)
            .bind(author_id)
            .bind(household_id)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Find a recipe by ID regardless of visibility. `is_favorite` is filled
    /// for `viewer_id`; pass `0` for anonymous reads such as shared links.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        viewer_id: DbId,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipes r WHERE r.id = $2");
        sqlx::query_as::<_, Recipe>(&query)
            .bind(viewer_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a recipe the viewer can see.
    pub async fn find_visible(
        pool: &PgPool,
        id: DbId,
        viewer: Viewer,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipes r WHERE {VISIBLE} AND r.id = $3");
        sqlx::query_as::<_, Recipe>(&query)
            .bind(viewer.user_id)
            .bind(viewer.household_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The visible recipes among `ids`, newest first. Unknown or foreign ids
    /// are silently skipped.
    pub async fn find_many_visible(
        pool: &PgPool,
        ids: &[DbId],
        viewer: Viewer,
    ) -> Result<Vec<Recipe>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recipes r \
             WHERE {VISIBLE} AND r.id = ANY($3) \
             ORDER BY r.created_at DESC, r.id DESC"
        );
        sqlx::query_as::<_, Recipe>(&query)
            .bind(viewer.user_id)
            .bind(viewer.household_id)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List visible recipes, newest first.
    pub async fn list(
        pool: &PgPool,
        viewer: Viewer,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recipes r \
             WHERE {VISIBLE} \
               AND ($3::TEXT IS NULL OR r.category = $3) \
               AND ($4::TEXT IS NULL \
                    OR r.title ILIKE $4 \
                    OR r.description ILIKE $4 \
                    OR array_to_string(r.tags, ' ') ILIKE $4) \
               AND (NOT $5 OR EXISTS ( \
                    SELECT 1 FROM recipe_favorites f \
                    WHERE f.recipe_id = r.id AND f.user_id = $1)) \
             ORDER BY r.created_at DESC, r.id DESC \
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, Recipe>(&query)
            .bind(viewer.user_id)
            .bind(viewer.household_id)
            .bind(&filter.category)
            .bind(&filter.search_pattern)
            .bind(filter.favorites_only)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Every visible recipe, newest first. Used by export, suggestions,
    /// fridge search and AI meal planning.
    pub async fn list_visible(pool: &PgPool, viewer: Viewer) -> Result<Vec<Recipe>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recipes r \
             WHERE {VISIBLE} \
             ORDER BY r.created_at DESC, r.id DESC"
        );
        sqlx::query_as::<_, Recipe>(&query)
            .bind(viewer.user_id)
            .bind(viewer.household_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the content of a recipe. Ownership columns are unchanged.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        viewer_id: DbId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let query = format!(
            "WITH r AS (
                UPDATE recipes SET
                    title = $3, description = $4, category = $5, prep_time = $6,
                    cook_time = $7, servings = $8, tags = $9, ingredients = $10,
                    instructions = $11, image_url = $12
                WHERE id = $2
                RETURNING *
             )
             SELECT {COLUMNS} FROM r"
        );
        sqlx::query_as::<_, Recipe>(&query)
            .bind(viewer_id)
            .bind(id)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(&draft.category)
            .bind(draft.prep_time)
            .bind(draft.cook_time)
            .bind(draft.servings)
            .bind(&draft.tags)
            .bind(Json(&draft.ingredients))
            .bind(&draft.instructions)
            .bind(&draft.image_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_image_url(pool: &PgPool, id: DbId, image_url: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE recipes SET image_url = $2 WHERE id = $1")
            .bind(id)
            .bind(image_url)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a recipe. Favorites, shares, meal plan entries and cooking
    /// history cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
