//! Repository for the `shopping_lists` and `shopping_list_items` tables.
//!
//! Items keep their insertion order in `position`. Replacing a list rewrites
//! its items; item-level methods touch exactly one row.

use std::collections::HashMap;

use kitchenry_core::types::{DbId, Scope};
use sqlx::{PgConnection, PgPool};

use crate::models::shopping_list::{
    NewShoppingItem, SaveShoppingList, ShoppingList, ShoppingListItem, ShoppingListWithItems,
    UpdateShoppingItem,
};
use crate::scope::scope_filter;

const LIST_COLUMNS: &str = "id, name, user_id, household_id, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, list_id, position, name, amount, unit, checked, recipe_id, created_at, updated_at";

/// Provides CRUD operations for shopping lists and their items.
pub struct ShoppingListRepo;

impl ShoppingListRepo {
    /// Create a list with its items in `scope`.
    pub async fn create(
        pool: &PgPool,
        scope: Scope,
        user_id: DbId,
        input: &SaveShoppingList,
    ) -> Result<ShoppingListWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO shopping_lists (name, user_id, household_id) \
             VALUES ($1, $2, $3) \
             RETURNING {LIST_COLUMNS}"
        );
        let list = sqlx::query_as::<_, ShoppingList>(&query)
            .bind(&input.name)
            .bind(user_id)
            .bind(scope.household_id())
            .fetch_one(&mut *tx)
            .await?;

        let items = insert_items(&mut *tx, list.id, &input.items).await?;

        tx.commit().await?;
        Ok(ShoppingListWithItems { list, items })
    }

    /// All lists of `scope` with their items, newest first.
    pub async fn list(
        pool: &PgPool,
        scope: Scope,
    ) -> Result<Vec<ShoppingListWithItems>, sqlx::Error> {
        let (filter, owner) = scope_filter(scope, "s", 1);
        let query = format!(
            "SELECT {LIST_COLUMNS} FROM shopping_lists s \
             WHERE {filter} \
             ORDER BY s.created_at DESC, s.id DESC"
        );
        let lists = sqlx::query_as::<_, ShoppingList>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = lists.iter().map(|l| l.id).collect();
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM shopping_list_items \
             WHERE list_id = ANY($1) \
             ORDER BY list_id, position, id"
        );
        let items = sqlx::query_as::<_, ShoppingListItem>(&query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut by_list: HashMap<DbId, Vec<ShoppingListItem>> = HashMap::new();
        for item in items {
            by_list.entry(item.list_id).or_default().push(item);
        }

        Ok(lists
            .into_iter()
            .map(|list| {
                let items = by_list.remove(&list.id).unwrap_or_default();
                ShoppingListWithItems { list, items }
            })
            .collect())
    }

    /// The most recently created list of `scope`.
    pub async fn latest(
        pool: &PgPool,
        scope: Scope,
    ) -> Result<Option<ShoppingListWithItems>, sqlx::Error> {
        let (filter, owner) = scope_filter(scope, "s", 1);
        let query = format!(
            "SELECT {LIST_COLUMNS} FROM shopping_lists s \
             WHERE {filter} \
             ORDER BY s.created_at DESC, s.id DESC \
             LIMIT 1"
        );
        let list = sqlx::query_as::<_, ShoppingList>(&query)
            .bind(owner)
            .fetch_optional(pool)
            .await?;

        match list {
            Some(list) => {
                let items = Self::items(pool, list.id).await?;
                Ok(Some(ShoppingListWithItems { list, items }))
            }
            None => Ok(None),
        }
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ShoppingListWithItems>, sqlx::Error> {
        let query = format!("SELECT {LIST_COLUMNS} FROM shopping_lists WHERE id = $1");
        let list = sqlx::query_as::<_, ShoppingList>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match list {
            Some(list) => {
                let items = Self::items(pool, list.id).await?;
                Ok(Some(ShoppingListWithItems { list, items }))
            }
            None => Ok(None),
        }
    }

    /// Items of a list in position order.
    pub async fn items(pool: &PgPool, list_id: DbId) -> Result<Vec<ShoppingListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM shopping_list_items \
             WHERE list_id = $1 \
             ORDER BY position, id"
        );
        sqlx::query_as::<_, ShoppingListItem>(&query)
            .bind(list_id)
            .fetch_all(pool)
            .await
    }

    /// Rename a list and replace all of its items.
    ///
    /// Returns `None` if no list with the given `id` exists.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        input: &SaveShoppingList,
    ) -> Result<Option<ShoppingListWithItems>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE shopping_lists SET name = $2 WHERE id = $1 RETURNING {LIST_COLUMNS}"
        );
        let Some(list) = sqlx::query_as::<_, ShoppingList>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM shopping_list_items WHERE list_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let items = insert_items(&mut *tx, id, &input.items).await?;

        tx.commit().await?;
        Ok(Some(ShoppingListWithItems { list, items }))
    }

    /// Delete a list; its items cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shopping_lists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append one item at the end of a list.
    pub async fn add_item(
        pool: &PgPool,
        list_id: DbId,
        item: &NewShoppingItem,
    ) -> Result<ShoppingListItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO shopping_list_items (list_id, position, name, amount, unit, checked, recipe_id) \
             VALUES ($1, \
                     (SELECT COALESCE(MAX(position), -1) + 1 FROM shopping_list_items WHERE list_id = $1), \
                     $2, $3, $4, $5, $6) \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, ShoppingListItem>(&query)
            .bind(list_id)
            .bind(&item.name)
            .bind(&item.amount)
            .bind(&item.unit)
            .bind(item.checked)
            .bind(item.recipe_id)
            .fetch_one(pool)
            .await
    }

    /// Update one item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the item does not exist on `list_id`.
    pub async fn update_item(
        pool: &PgPool,
        list_id: DbId,
        item_id: DbId,
        input: &UpdateShoppingItem,
    ) -> Result<Option<ShoppingListItem>, sqlx::Error> {
        let query = format!(
            "UPDATE shopping_list_items SET \
                name = COALESCE($3, name), \
                amount = COALESCE($4, amount), \
                unit = COALESCE($5, unit), \
                checked = COALESCE($6, checked) \
             WHERE id = $2 AND list_id = $1 \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, ShoppingListItem>(&query)
            .bind(list_id)
            .bind(item_id)
            .bind(&input.name)
            .bind(&input.amount)
            .bind(&input.unit)
            .bind(input.checked)
            .fetch_optional(pool)
            .await
    }

    /// Delete exactly one item. Other items are untouched.
    pub async fn delete_item(
        pool: &PgPool,
        list_id: DbId,
        item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shopping_list_items WHERE id = $2 AND list_id = $1")
            .bind(list_id)
            .bind(item_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_items(
    conn: &mut PgConnection,
    list_id: DbId,
    items: &[NewShoppingItem],
) -> Result<Vec<ShoppingListItem>, sqlx::Error> {
    let query = format!(
        "INSERT INTO shopping_list_items (list_id, position, name, amount, unit, checked, recipe_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {ITEM_COLUMNS}"
    );
    let mut stored = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let row = sqlx::query_as::<_, ShoppingListItem>(&query)
            .bind(list_id)
            .bind(position as i32)
            .bind(&item.name)
            .bind(&item.amount)
            .bind(&item.unit)
            .bind(item.checked)
            .bind(item.recipe_id)
            .fetch_one(&mut *conn)
            .await?;
        stored.push(row);
    }
    Ok(stored)
}
