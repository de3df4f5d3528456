//! Household entity model.

use kitchenry_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `households` table. Membership lives on `users.household_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Household {
    pub id: DbId,
    pub name: String,
    pub owner_id: DbId,
    pub join_code: Option<String>,
    pub join_code_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Household with its member ids, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct HouseholdResponse {
    #[serde(flatten)]
    pub household: Household,
    pub member_ids: Vec<DbId>,
}
