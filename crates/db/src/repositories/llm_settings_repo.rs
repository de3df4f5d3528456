//! Repository for the `llm_settings` table.

use kitchenry_core::llm::LlmProvider;
use kitchenry_core::types::DbId;
use sqlx::PgPool;

use crate::models::llm_settings::LlmSettings;

const COLUMNS: &str = "id, user_id, provider, ollama_url, ollama_model, created_at, updated_at";

/// Per-user LLM provider selection.
pub struct LlmSettingsRepo;

impl LlmSettingsRepo {
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<LlmSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM llm_settings WHERE user_id = $1");
        sqlx::query_as::<_, LlmSettings>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the settings of a user.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        provider: LlmProvider,
        ollama_url: &str,
        ollama_model: &str,
    ) -> Result<LlmSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO llm_settings (user_id, provider, ollama_url, ollama_model) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_llm_settings_user_id DO UPDATE SET \
                provider = EXCLUDED.provider, \
                ollama_url = EXCLUDED.ollama_url, \
                ollama_model = EXCLUDED.ollama_model \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LlmSettings>(&query)
            .bind(user_id)
            .bind(provider.as_str())
            .bind(ollama_url)
            .bind(ollama_model)
            .fetch_one(pool)
            .await
    }
}
