//! Repository for the `llm_cache` table.

use kitchenry_core::types::Timestamp;
use sqlx::PgPool;

/// Completed LLM responses keyed by a hash of prompt and model.
pub struct LlmCacheRepo;

impl LlmCacheRepo {
    /// Cached response for `cache_key`, if any.
    pub async fn get(pool: &PgPool, cache_key: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT response FROM llm_cache WHERE cache_key = $1")
            .bind(cache_key)
            .fetch_optional(pool)
            .await
    }

    /// Store a response. An existing entry is overwritten and its age reset.
    pub async fn put(
        pool: &PgPool,
        cache_key: &str,
        response: &str,
        provider: &str,
        model: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO llm_cache (cache_key, response, provider, model) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_llm_cache_cache_key DO UPDATE SET \
                response = EXCLUDED.response, \
                provider = EXCLUDED.provider, \
                model = EXCLUDED.model",
        )
        .bind(cache_key)
        .bind(response)
        .bind(provider)
        .bind(model)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete entries last written before `cutoff`. Returns the number removed.
    pub async fn purge_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM llm_cache WHERE updated_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
