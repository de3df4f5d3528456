//! Shopping list and item models and DTOs.

use kitchenry_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `shopping_lists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShoppingList {
    pub id: DbId,
    pub name: String,
    /// Creator; `None` once that account is deleted.
    pub user_id: Option<DbId>,
    pub household_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `shopping_list_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShoppingListItem {
    pub id: DbId,
    pub list_id: DbId,
    pub position: i32,
    pub name: String,
    pub amount: String,
    pub unit: String,
    pub checked: bool,
    pub recipe_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A list with its items in position order.
#[derive(Debug, Clone, Serialize)]
pub struct ShoppingListWithItems {
    #[serde(flatten)]
    pub list: ShoppingList,
    pub items: Vec<ShoppingListItem>,
}

/// Item content for inserts.
#[derive(Debug, Clone, Deserialize)]
pub struct NewShoppingItem {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub recipe_id: Option<DbId>,
}

/// DTO for creating or replacing a list.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveShoppingList {
    pub name: String,
    #[serde(default)]
    pub items: Vec<NewShoppingItem>,
}

/// Partial item update. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShoppingItem {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub unit: Option<String>,
    pub checked: Option<bool>,
}
