//! HTTP-level integration tests for meal plans, the calendar export,
//! shopping lists, cooking sessions and the Home Assistant summaries.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Local};
use common::{
    body_json, body_text, create_recipe, delete_auth, get_auth, post_json_auth, put_json_auth,
    register_user,
};
use serde_json::{json, Value};
use sqlx::PgPool;

fn stew() -> Value {
    json!({
        "title": "Beef Stew",
        "prep_time": 20,
        "cook_time": 90,
        "servings": 4,
        "ingredients": [
            { "name": "beef", "amount": "500", "unit": "g" },
            { "name": "carrots", "amount": "3", "unit": "" }
        ]
    })
}

fn omelette() -> Value {
    json!({
        "title": "Omelette",
        "prep_time": 5,
        "cook_time": 5,
        "ingredients": [{ "name": "eggs", "amount": "3", "unit": "" }]
    })
}

// ---------------------------------------------------------------------------
// Meal plans and calendar
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn meal_plans_are_listed_by_date_range(pool: PgPool) {
    let (token, _) = register_user(common::build_test_app(pool.clone()), "Ada").await;
    let recipe = create_recipe(common::build_test_app(pool.clone()), &token, stew()).await;

    for (date, meal_type) in [("2026-03-15", "Dinner"), ("2026-03-14", "lunch"), ("2026-04-01", "Dinner")] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/meal-plans",
            json!({ "date": date, "meal_type": meal_type, "recipe_id": recipe["id"] }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool.clone());
    let uri = "/api/meal-plans?start_date=2026-03-01&end_date=2026-03-31";
    let json = body_json(get_auth(app, uri, &token).await).await;
    let plans = json["data"].as_array().unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0]["plan_date"], "2026-03-14");
    assert_eq!(plans[0]["meal_type"], "Lunch");
    assert_eq!(plans[0]["recipe_title"], "Beef Stew");

    let uri = format!("/api/meal-plans/{}", plans[0]["id"]);
    let response = delete_auth(common::build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_meal_type_and_invisible_recipe_are_rejected(pool: PgPool) {
    let (ada, _) = register_user(common::build_test_app(pool.clone()), "Ada").await;
    let (bob, _) = register_user(common::build_test_app(pool.clone()), "Bob").await;
    let recipe = create_recipe(common::build_test_app(pool.clone()), &ada, stew()).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/meal-plans",
        json!({ "date": "2026-03-15", "meal_type": "Brunch", "recipe_id": recipe["id"] }),
        &ada,
    )
    .await;
    assert!(response.status().is_client_error());

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/meal-plans",
        json!({ "date": "2026-03-15", "meal_type": "Dinner", "recipe_id": recipe["id"] }),
        &bob,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn calendar_export_is_an_ics_attachment(pool: PgPool) {
    let (token, _) = register_user(common::build_test_app(pool.clone()), "Ada").await;
    let recipe = create_recipe(common::build_test_app(pool.clone()), &token, stew()).await;
    post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/meal-plans",
        json!({ "date": "2026-03-14", "meal_type": "Dinner", "recipe_id": recipe["id"] }),
        &token,
    )
    .await;

    let uri = "/api/calendar/ical?start_date=2026-03-01&end_date=2026-03-31";
    let response = get_auth(common::build_test_app(pool.clone()), uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/calendar"));
    assert!(response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains("kitchenry-meals.ics"));

    let ics = body_text(response).await;
    assert!(ics.starts_with("BEGIN:VCALENDAR"));
    assert!(ics.contains("DTSTART:20260314T180000"));
    assert!(ics.contains("SUMMARY:Dinner: Beef Stew"));

    let uri = "/api/calendar/ical?start_date=2026-03-31&end_date=2026-03-01";
    let response = get_auth(common::build_test_app(pool), uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Shopping lists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_generated_from_recipes_holds_their_ingredients(pool: PgPool) {
    let (token, _) = register_user(common::build_test_app(pool.clone()), "Ada").await;
    let stew = create_recipe(common::build_test_app(pool.clone()), &token, stew()).await;
    let omelette = create_recipe(common::build_test_app(pool.clone()), &token, omelette()).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/shopping-lists/from-recipes",
        json!([omelette["id"], stew["id"]]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["data"]["name"]
        .as_str()
        .unwrap()
        .starts_with("Shopping List - "));
    let names: Vec<&str> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["eggs", "beef", "carrots"]);
    assert_eq!(json["data"]["items"][1]["recipe_id"], stew["id"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn item_edits_keep_the_rest_of_the_list(pool: PgPool) {
    let (token, _) = register_user(common::build_test_app(pool.clone()), "Ada").await;

    let body = json!({
        "name": "Weekly",
        "items": [
            { "name": "milk", "amount": "1", "unit": "l" },
            { "name": "bread", "checked": true },
            { "name": "apples", "amount": "6" }
        ]
    });
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/shopping-lists", body, &token)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let list = body_json(response).await["data"].clone();
    let list_id = list["id"].as_i64().unwrap();
    let milk_id = list["items"][0]["id"].as_i64().unwrap();
    let apples_id = list["items"][2]["id"].as_i64().unwrap();

    let uri = format!("/api/shopping-lists/{list_id}/items/{apples_id}");
    let response =
        put_json_auth(common::build_test_app(pool.clone()), &uri, json!({ "checked": true }), &token)
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["checked"], true);

    let uri = format!("/api/shopping-lists/{list_id}/items/{milk_id}");
    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let uri = format!("/api/shopping-lists/{list_id}/items");
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "name": "butter" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let uri = format!("/api/shopping-lists/{list_id}");
    let json = body_json(get_auth(common::build_test_app(pool), &uri, &token).await).await;
    let items: Vec<(&str, bool)> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| (i["name"].as_str().unwrap(), i["checked"].as_bool().unwrap()))
        .collect();
    assert_eq!(items, vec![("bread", true), ("apples", true), ("butter", false)]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn lists_of_other_scopes_are_hidden(pool: PgPool) {
    let (ada, _) = register_user(common::build_test_app(pool.clone()), "Ada").await;
    let (bob, _) = register_user(common::build_test_app(pool.clone()), "Bob").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/shopping-lists",
        json!({ "name": "Private", "items": [] }),
        &ada,
    )
    .await;
    let list_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/shopping-lists/{list_id}");
    let response = get_auth(common::build_test_app(pool.clone()), &uri, &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json =
        body_json(get_auth(common::build_test_app(pool), "/api/shopping-lists", &bob).await).await;
    assert_eq!(json["data"], json!([]));
}

// ---------------------------------------------------------------------------
// Cooking
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn tonight_prefers_quick_liked_recipes(pool: PgPool) {
    let (token, _) = register_user(common::build_test_app(pool.clone()), "Ada").await;
    let stew = create_recipe(common::build_test_app(pool.clone()), &token, stew()).await;
    let omelette = create_recipe(common::build_test_app(pool.clone()), &token, omelette()).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/cooking/feedback",
        json!({ "recipe_id": omelette["id"], "feedback": "yes" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json =
        body_json(get_auth(common::build_test_app(pool), "/api/cooking/tonight", &token).await)
            .await;
    let suggestions = json["data"].as_array().unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0]["recipe"]["id"], omelette["id"]);
    assert_eq!(suggestions[0]["total_time"], 10);
    assert_eq!(suggestions[1]["recipe"]["id"], stew["id"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completed_session_counts_in_stats(pool: PgPool) {
    let (token, _) = register_user(common::build_test_app(pool.clone()), "Ada").await;
    let recipe = create_recipe(common::build_test_app(pool.clone()), &token, omelette()).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/cooking/session",
        json!({ "recipe_id": recipe["id"] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let session_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/cooking/session/{session_id}/complete");
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "feedback": "yes" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "feedback": "no" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json =
        body_json(get_auth(common::build_test_app(pool), "/api/cooking/stats", &token).await).await;
    assert_eq!(json["data"]["total_cooked"], 1);
    assert_eq!(json["data"]["would_cook_again"], 1);
    assert_eq!(json["data"]["meh"], 0);
}

// ---------------------------------------------------------------------------
// Home Assistant
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn home_assistant_summaries(pool: PgPool) {
    let (token, _) = register_user(common::build_test_app(pool.clone()), "Ada").await;
    let recipe = create_recipe(common::build_test_app(pool.clone()), &token, stew()).await;
    let today = Local::now().date_naive();

    post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/meal-plans",
        json!({ "date": today, "meal_type": "Dinner", "recipe_id": recipe["id"] }),
        &token,
    )
    .await;
    post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/meal-plans",
        json!({ "date": today + Duration::days(1), "meal_type": "Lunch", "recipe_id": recipe["id"] }),
        &token,
    )
    .await;

    let json = body_json(
        get_auth(common::build_test_app(pool.clone()), "/api/homeassistant/today", &token).await,
    )
    .await;
    assert_eq!(json["data"]["meal_count"], 1);
    assert_eq!(json["data"]["meals"][0]["recipe_title"], "Beef Stew");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/homeassistant/shopping", &token).await).await;
    assert_eq!(json["data"]["unchecked_count"], 0);
    assert!(json["data"]["list_name"].is_null());

    post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/shopping-lists",
        json!({ "name": "Weekly", "items": [{ "name": "milk" }, { "name": "jam", "checked": true }] }),
        &token,
    )
    .await;

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/homeassistant/shopping", &token).await).await;
    assert_eq!(json["data"]["list_name"], "Weekly");
    assert_eq!(json["data"]["unchecked_count"], 1);
    assert_eq!(json["data"]["total_count"], 2);
    assert_eq!(json["data"]["items"][0]["name"], "milk");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn homeassistant_config_is_public_and_points_at_the_summaries(pool: PgPool) {
    let response = common::get(common::build_test_app(pool), "/api/homeassistant/config").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let resources: Vec<&str> = json["data"]["sensors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["resource"].as_str().unwrap())
        .collect();
    assert_eq!(resources, ["/api/homeassistant/today", "/api/homeassistant/shopping"]);

    let yaml = json["data"]["example_config"].as_str().unwrap();
    assert!(yaml.contains("Authorization: Bearer YOUR_TOKEN"));
    assert!(yaml.contains("value_json.data.unchecked_count"));
}
