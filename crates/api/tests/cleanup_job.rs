//! Integration tests for the periodic cleanup pass.

mod common;

use chrono::Utc;
use common::{body_json, create_recipe, post_auth, register_user};
use kitchenry_api::background::cleanup::{purge_once, PurgeCounts};
use kitchenry_db::repositories::LlmCacheRepo;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn purge_removes_expired_shares_and_stale_cache_rows(pool: PgPool) {
    let (token, _) = register_user(common::build_test_app(pool.clone()), "Ada").await;
    let recipe =
        create_recipe(common::build_test_app(pool.clone()), &token, json!({ "title": "Soup" }))
            .await;

    let uri = format!("/api/recipes/{}/share", recipe["id"]);
    for _ in 0..2 {
        post_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    }
    let response = post_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    let live_token = body_json(response).await["data"]["share_id"]
        .as_str()
        .unwrap()
        .to_string();
    sqlx::query(
        "UPDATE recipe_shares SET expires_at = NOW() - INTERVAL '1 minute' \
         WHERE share_token <> $1",
    )
    .bind(&live_token)
    .execute(&pool)
    .await
    .unwrap();

    LlmCacheRepo::put(&pool, "old", "{}", "ollama", "llama3").await.unwrap();
    LlmCacheRepo::put(&pool, "fresh", "{}", "ollama", "llama3").await.unwrap();
    // The updated_at trigger would overwrite the backdated value.
    for statement in [
        "ALTER TABLE llm_cache DISABLE TRIGGER trg_llm_cache_updated_at",
        "UPDATE llm_cache SET updated_at = NOW() - INTERVAL '40 days' WHERE cache_key = 'old'",
        "ALTER TABLE llm_cache ENABLE TRIGGER trg_llm_cache_updated_at",
    ] {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }

    let counts = purge_once(&pool, Utc::now(), 30).await.unwrap();
    assert_eq!(
        counts,
        PurgeCounts {
            shares: 2,
            cache_entries: 1,
        }
    );

    assert!(LlmCacheRepo::get(&pool, "fresh").await.unwrap().is_some());
    assert!(LlmCacheRepo::get(&pool, "old").await.unwrap().is_none());

    let again = purge_once(&pool, Utc::now(), 30).await.unwrap();
    assert_eq!(again, PurgeCounts::default());
}
