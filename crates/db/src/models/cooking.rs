//! Cook sessions and "would cook again" feedback.

use kitchenry_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `cook_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CookSession {
    pub id: DbId,
    pub user_id: DbId,
    pub recipe_id: DbId,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub feedback: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of closing a cook session.
#[derive(Debug, Clone)]
pub enum SessionCompletion {
    Completed(CookSession),
    /// The session was closed earlier; nothing changed.
    AlreadyCompleted,
    /// No such session for this user.
    NotFound,
}

/// Per-user cooking statistics.
#[derive(Debug, Clone, Default, FromRow, Serialize, PartialEq)]
pub struct CookingStats {
    pub total_cooked: i64,
    pub would_cook_again: i64,
    pub would_not_cook_again: i64,
    pub meh: i64,
}
