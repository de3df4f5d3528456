use kitchenry_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `recipe_shares` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecipeShare {
    pub id: DbId,
    pub share_token: String,
    pub recipe_id: DbId,
    pub created_by: DbId,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
