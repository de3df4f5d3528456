use kitchenry_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `llm_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LlmSettings {
    pub id: DbId,
    pub user_id: DbId,
    pub provider: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
