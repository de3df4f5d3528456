//! Periodic purge of expired share links and stale LLM cache rows.

use std::time::Duration;

use chrono::Utc;
use kitchenry_core::types::Timestamp;
use kitchenry_db::repositories::{LlmCacheRepo, ShareRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Rows removed by one cleanup pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PurgeCounts {
    pub shares: u64,
    pub cache_entries: u64,
}

/// Delete share links expired at `now` and cache rows older than
/// `cache_ttl_days`.
pub async fn purge_once(
    pool: &PgPool,
    now: Timestamp,
    cache_ttl_days: i64,
) -> Result<PurgeCounts, sqlx::Error> {
    let shares = ShareRepo::purge_expired(pool, now).await?;
    let cache_entries =
        LlmCacheRepo::purge_older_than(pool, now - chrono::Duration::days(cache_ttl_days)).await?;
    Ok(PurgeCounts {
        shares,
        cache_entries,
    })
}

/// Run the cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cache_ttl_days: i64, cancel: CancellationToken) {
    tracing::info!(
        cache_ttl_days,
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Cleanup job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match purge_once(&pool, Utc::now(), cache_ttl_days).await {
                    Ok(counts) if counts == PurgeCounts::default() => {
                        tracing::debug!("Cleanup: nothing to purge");
                    }
                    Ok(counts) => {
                        tracing::info!(
                            shares = counts.shares,
                            cache_entries = counts.cache_entries,
                            "Cleanup: purged expired rows"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Cleanup: purge failed");
                    }
                }
            }
        }
    }
}
