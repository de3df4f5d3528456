//! HTTP-level integration tests for households: membership, join codes and
//! ownership.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, create_recipe, get_auth, post_auth, post_json_auth, register_user};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_household(app: Router, token: &str, name: &str) -> Value {
    let response = post_json_auth(app, "/api/households", json!({ "name": name }), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn creator_owns_the_household(pool: PgPool) {
    let (token, user_id) = register_user(common::build_test_app(pool.clone()), "Ada").await;

    let household = create_household(common::build_test_app(pool.clone()), &token, "Home").await;
    assert_eq!(household["name"], "Home");
    assert_eq!(household["owner_id"], user_id);
    assert_eq!(household["member_ids"], json!([user_id]));

    let json =
        body_json(get_auth(common::build_test_app(pool.clone()), "/api/households/me", &token).await)
            .await;
    assert_eq!(json["data"]["id"], household["id"]);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/households",
        json!({ "name": "Second" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn household_less_user_has_null_household(pool: PgPool) {
    let (token, _) = register_user(common::build_test_app(pool.clone()), "Ada").await;

    let json =
        body_json(get_auth(common::build_test_app(pool.clone()), "/api/households/me", &token).await)
            .await;
    assert!(json["data"].is_null());

    let response = get_auth(common::build_test_app(pool), "/api/households/members", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invited_member_sees_household_recipes(pool: PgPool) {
    let (owner, _) = register_user(common::build_test_app(pool.clone()), "Owner").await;
    let (member, member_id) = register_user(common::build_test_app(pool.clone()), "Member").await;
    create_household(common::build_test_app(pool.clone()), &owner, "Home").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/households/invite",
        json!({ "email": "member@example.com" }),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["member_ids"]
        .as_array()
        .unwrap()
        .contains(&json!(member_id)));

    let recipe =
        create_recipe(common::build_test_app(pool.clone()), &owner, json!({ "title": "Stew" }))
            .await;
    let uri = format!("/api/recipes/{}", recipe["id"]);
    let response = get_auth(common::build_test_app(pool.clone()), &uri, &member).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/households/invite",
        json!({ "email": "nobody@example.com" }),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn join_code_admits_a_user_case_insensitively(pool: PgPool) {
    let (owner, _) = register_user(common::build_test_app(pool.clone()), "Owner").await;
    let (joiner, joiner_id) = register_user(common::build_test_app(pool.clone()), "Joiner").await;
    create_household(common::build_test_app(pool.clone()), &owner, "Home").await;

    let response =
        post_auth(common::build_test_app(pool.clone()), "/api/households/join-code", &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let code = body_json(response).await["data"]["join_code"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(code.len(), 8);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/households/join",
        json!({ "join_code": code.to_lowercase() }),
        &joiner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["member_ids"]
        .as_array()
        .unwrap()
        .contains(&json!(joiner_id)));

    // Members cannot manage join codes.
    let response =
        post_auth(common::build_test_app(pool), "/api/households/join-code", &joiner).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_or_unknown_join_codes_are_rejected(pool: PgPool) {
    let (owner, _) = register_user(common::build_test_app(pool.clone()), "Owner").await;
    let (joiner, _) = register_user(common::build_test_app(pool.clone()), "Joiner").await;
    let household = create_household(common::build_test_app(pool.clone()), &owner, "Home").await;

    let response =
        post_auth(common::build_test_app(pool.clone()), "/api/households/join-code", &owner).await;
    let code = body_json(response).await["data"]["join_code"]
        .as_str()
        .unwrap()
        .to_string();

    sqlx::query(
        "UPDATE households SET join_code_expires_at = NOW() - INTERVAL '1 hour' WHERE id = $1",
    )
    .bind(household["id"].as_i64().unwrap())
    .execute(&pool)
    .await
    .unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/households/join",
        json!({ "join_code": code }),
        &joiner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/households/join",
        json!({ "join_code": "ZZZZZZZZ" }),
        &joiner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_must_transfer_before_leaving(pool: PgPool) {
    let (owner, owner_id) = register_user(common::build_test_app(pool.clone()), "Owner").await;
    let (member, member_id) = register_user(common::build_test_app(pool.clone()), "Member").await;
    create_household(common::build_test_app(pool.clone()), &owner, "Home").await;
    post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/households/invite",
        json!({ "email": "member@example.com" }),
        &owner,
    )
    .await;

    let response =
        post_auth(common::build_test_app(pool.clone()), "/api/households/leave", &owner).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/households/transfer",
        json!({ "user_id": member_id }),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["owner_id"], member_id);

    let response =
        post_auth(common::build_test_app(pool.clone()), "/api/households/leave", &owner).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(
        get_auth(common::build_test_app(pool), "/api/households/members", &member).await,
    )
    .await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![member_id]);
    assert_ne!(owner_id, member_id);
}
