//! Integration tests for the repository layer against a real database:
//! - Recipe visibility, search and favorites
//! - Household membership and join codes
//! - Household-scoped meal plans and shopping lists
//! - Cooking feedback, settings upserts and account deletion

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, Utc};
use kitchenry_core::recipe::RecipeDraft;
use kitchenry_core::types::{Feedback, Ingredient, MealType, Scope};
use kitchenry_db::models::cooking::SessionCompletion;
use kitchenry_db::models::meal_plan::CreateMealPlan;
use kitchenry_db::models::prompt::CustomPrompts;
use kitchenry_db::models::recipe::{RecipeFilter, Viewer};
use kitchenry_db::models::shopping_list::{NewShoppingItem, SaveShoppingList, UpdateShoppingItem};
use kitchenry_db::models::user::{CreateUser, User};
use kitchenry_db::repositories::{
    CookingRepo, FavoriteRepo, HouseholdRepo, LlmCacheRepo, MealPlanRepo, NotificationRepo,
    PromptRepo, RecipeRepo, ShareRepo, ShoppingListRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{name}@Example.com"),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap()
}

fn draft(title: &str) -> RecipeDraft {
    RecipeDraft {
        title: title.to_string(),
        ingredients: vec![Ingredient::new("pasta", "200", "g")],
        ..RecipeDraft::default()
    }
}

fn filter() -> RecipeFilter {
    RecipeFilter {
        limit: 100,
        ..RecipeFilter::default()
    }
}

fn item(name: &str, checked: bool) -> NewShoppingItem {
    NewShoppingItem {
        name: name.to_string(),
        amount: String::new(),
        unit: String::new(),
        checked,
        recipe_id: None,
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_email_is_unique_case_insensitively(pool: PgPool) {
    let user = new_user(&pool, "ann").await;
    assert_eq!(user.email, "ann@example.com");

    let found = UserRepo::find_by_email(&pool, " ANN@example.com ").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    let duplicate = UserRepo::create(
        &pool,
        &CreateUser {
            name: "Other".into(),
            email: "Ann@EXAMPLE.com".into(),
            password_hash: "hash".into(),
        },
    )
    .await;
    let err = duplicate.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_recipe_create_then_list(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let viewer = Viewer::new(ann.id, None);

    let created = RecipeRepo::create(&pool, ann.id, None, &draft("Pasta")).await.unwrap();
    assert_eq!(created.author_id, Some(ann.id));
    assert!(!created.is_favorite);
    assert_eq!(created.ingredients.0.len(), 1);

    let listed = RecipeRepo::list(&pool, viewer, &filter()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Pasta");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recipe_visibility_follows_household(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let bob = new_user(&pool, "bob").await;
    let eve = new_user(&pool, "eve").await;

    let household = HouseholdRepo::create(&pool, "Home", ann.id).await.unwrap().unwrap();
    assert!(UserRepo::join_household(&pool, bob.id, household.id).await.unwrap());

    let shared = RecipeRepo::create(&pool, ann.id, Some(household.id), &draft("Stew"))
        .await
        .unwrap();

    let bob_view = Viewer::new(bob.id, Some(household.id));
    let eve_view = Viewer::new(eve.id, None);

    assert!(RecipeRepo::find_visible(&pool, shared.id, bob_view).await.unwrap().is_some());
    assert!(RecipeRepo::find_visible(&pool, shared.id, eve_view).await.unwrap().is_none());
    assert!(RecipeRepo::list(&pool, eve_view, &filter()).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recipe_filters(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let viewer = Viewer::new(ann.id, None);

    let mut soup = draft("Tomato Soup");
    soup.category = "Lunch".into();
    soup.tags = vec!["vegan".into()];
    RecipeRepo::create(&pool, ann.id, None, &soup).await.unwrap();

    let mut cake = draft("Cake 100%");
    cake.category = "Dessert".into();
    let cake = RecipeRepo::create(&pool, ann.id, None, &cake).await.unwrap();

    let by_category = RecipeFilter {
        category: Some("Lunch".into()),
        ..filter()
    };
    let rows = RecipeRepo::list(&pool, viewer, &by_category).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Tomato Soup");

    let by_tag = RecipeFilter {
        search_pattern: kitchenry_core::search::contains_pattern(Some("VEGAN")),
        ..filter()
    };
    assert_eq!(RecipeRepo::list(&pool, viewer, &by_tag).await.unwrap().len(), 1);

    // "%" is matched literally, not as a wildcard.
    let literal = RecipeFilter {
        search_pattern: kitchenry_core::search::contains_pattern(Some("100%")),
        ..filter()
    };
    let rows = RecipeRepo::list(&pool, viewer, &literal).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, cake.id);

    FavoriteRepo::add(&pool, ann.id, cake.id).await.unwrap();
    let favorites = RecipeFilter {
        favorites_only: true,
        ..filter()
    };
    let rows = RecipeRepo::list(&pool, viewer, &favorites).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_favorite);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_favorite_toggle_twice_restores_state(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let recipe = RecipeRepo::create(&pool, ann.id, None, &draft("Pasta")).await.unwrap();

    assert!(FavoriteRepo::toggle(&pool, ann.id, recipe.id).await.unwrap());
    assert!(!FavoriteRepo::toggle(&pool, ann.id, recipe.id).await.unwrap());
    assert!(!FavoriteRepo::is_favorite(&pool, ann.id, recipe.id).await.unwrap());

    FavoriteRepo::add(&pool, ann.id, recipe.id).await.unwrap();
    FavoriteRepo::add(&pool, ann.id, recipe.id).await.unwrap();
    assert_eq!(FavoriteRepo::list_recipe_ids(&pool, ann.id).await.unwrap(), vec![recipe.id]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_share_lookup_and_purge(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let recipe = RecipeRepo::create(&pool, ann.id, None, &draft("Pasta")).await.unwrap();
    let now = Utc::now();

    ShareRepo::create(&pool, recipe.id, ann.id, "live0001", now + Duration::days(30))
        .await
        .unwrap();
    ShareRepo::create(&pool, recipe.id, ann.id, "old00001", now - Duration::days(1))
        .await
        .unwrap();

    assert_eq!(ShareRepo::purge_expired(&pool, now).await.unwrap(), 1);
    assert!(ShareRepo::find_by_token(&pool, "live0001").await.unwrap().is_some());
    assert!(ShareRepo::find_by_token(&pool, "old00001").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Households
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_household_create_once_and_join_code(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let household = HouseholdRepo::create(&pool, "Home", ann.id).await.unwrap().unwrap();
    assert_eq!(household.owner_id, ann.id);

    // Already a member: nothing is created.
    assert!(HouseholdRepo::create(&pool, "Second", ann.id).await.unwrap().is_none());
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM households")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);

    let expires = Utc::now() + Duration::days(7);
    HouseholdRepo::set_join_code(&pool, household.id, "ABCD2345", expires)
        .await
        .unwrap();
    let found = HouseholdRepo::find_by_join_code(&pool, "ABCD2345").await.unwrap().unwrap();
    assert_eq!(found.id, household.id);

    assert!(HouseholdRepo::clear_join_code(&pool, household.id).await.unwrap());
    assert!(HouseholdRepo::find_by_join_code(&pool, "ABCD2345").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_transfer_owner_requires_membership(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let bob = new_user(&pool, "bob").await;
    let household = HouseholdRepo::create(&pool, "Home", ann.id).await.unwrap().unwrap();

    assert!(!HouseholdRepo::transfer_owner(&pool, household.id, bob.id).await.unwrap());

    UserRepo::join_household(&pool, bob.id, household.id).await.unwrap();
    assert!(HouseholdRepo::transfer_owner(&pool, household.id, bob.id).await.unwrap());
    assert_eq!(
        HouseholdRepo::member_ids(&pool, household.id).await.unwrap(),
        vec![ann.id, bob.id]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dissolving_household_frees_members(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let household = HouseholdRepo::create(&pool, "Home", ann.id).await.unwrap().unwrap();
    let recipe = RecipeRepo::create(&pool, ann.id, Some(household.id), &draft("Stew"))
        .await
        .unwrap();

    assert!(HouseholdRepo::delete(&pool, household.id).await.unwrap());

    let ann = UserRepo::find_by_id(&pool, ann.id).await.unwrap().unwrap();
    assert_eq!(ann.household_id, None);
    let recipe = RecipeRepo::find_visible(&pool, recipe.id, Viewer::new(ann.id, None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recipe.household_id, None);
}

// ---------------------------------------------------------------------------
// Meal plans and shopping lists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_meal_plans_are_scoped_and_ordered(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let eve = new_user(&pool, "eve").await;
    let recipe = RecipeRepo::create(&pool, ann.id, None, &draft("Pasta")).await.unwrap();
    let scope = Scope::for_user(ann.id, None);

    for (date, meal_type) in [(day(5), MealType::Dinner), (day(3), MealType::Lunch)] {
        MealPlanRepo::create(
            &pool,
            scope,
            ann.id,
            &CreateMealPlan {
                date,
                meal_type,
                recipe_id: recipe.id,
                notes: String::new(),
            },
        )
        .await
        .unwrap();
    }

    let plans = MealPlanRepo::list_in_range(&pool, scope, day(1), day(7)).await.unwrap();
    let dates: Vec<NaiveDate> = plans.iter().map(|p| p.plan_date).collect();
    assert_eq!(dates, vec![day(3), day(5)]);
    assert_eq!(plans[0].recipe_title, "Pasta");
    assert_eq!(plans[0].meal_type, "Lunch");

    let outside = MealPlanRepo::list_in_range(&pool, scope, day(4), day(4)).await.unwrap();
    assert!(outside.is_empty());

    let other = Scope::for_user(eve.id, None);
    assert!(MealPlanRepo::list_in_range(&pool, other, day(1), day(7))
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_item_leaves_others_untouched(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let scope = Scope::for_user(ann.id, None);
    let list = ShoppingListRepo::create(
        &pool,
        scope,
        ann.id,
        &SaveShoppingList {
            name: "Weekly".into(),
            items: vec![item("milk", true), item("eggs", false), item("flour", true)],
        },
    )
    .await
    .unwrap();
    let eggs = list.items[1].id;

    assert!(ShoppingListRepo::delete_item(&pool, list.list.id, eggs).await.unwrap());
    assert!(!ShoppingListRepo::delete_item(&pool, list.list.id, eggs).await.unwrap());

    let remaining = ShoppingListRepo::items(&pool, list.list.id).await.unwrap();
    let state: Vec<(&str, bool)> = remaining.iter().map(|i| (i.name.as_str(), i.checked)).collect();
    assert_eq!(state, vec![("milk", true), ("flour", true)]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_shopping_items_append_update_and_replace(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let scope = Scope::for_user(ann.id, None);
    let list = ShoppingListRepo::create(
        &pool,
        scope,
        ann.id,
        &SaveShoppingList {
            name: "Weekly".into(),
            items: vec![item("milk", false)],
        },
    )
    .await
    .unwrap();
    let list_id = list.list.id;

    let added = ShoppingListRepo::add_item(&pool, list_id, &item("bread", false)).await.unwrap();
    assert_eq!(added.position, 1);

    let update = UpdateShoppingItem {
        checked: Some(true),
        ..UpdateShoppingItem::default()
    };
    let updated = ShoppingListRepo::update_item(&pool, list_id, added.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert!(updated.checked);
    assert_eq!(updated.name, "bread");

    let replaced = ShoppingListRepo::replace(
        &pool,
        list_id,
        &SaveShoppingList {
            name: "Party".into(),
            items: vec![item("chips", false)],
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(replaced.list.name, "Party");
    assert_eq!(replaced.items.len(), 1);

    let latest = ShoppingListRepo::latest(&pool, scope).await.unwrap().unwrap();
    assert_eq!(latest.list.id, list_id);
    assert_eq!(ShoppingListRepo::list(&pool, scope).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Cooking, settings and cache
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_cook_session_feedback_and_stats(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let bob = new_user(&pool, "bob").await;
    let pasta = RecipeRepo::create(&pool, ann.id, None, &draft("Pasta")).await.unwrap();
    let stew = RecipeRepo::create(&pool, ann.id, None, &draft("Stew")).await.unwrap();

    let session = CookingRepo::start_session(&pool, ann.id, pasta.id).await.unwrap();
    assert_matches!(
        CookingRepo::complete_session(&pool, session.id, bob.id, Feedback::Yes).await,
        Ok(SessionCompletion::NotFound)
    );
    let done = CookingRepo::complete_session(&pool, session.id, ann.id, Feedback::Yes).await;
    assert_matches!(done, Ok(SessionCompletion::Completed(ref s)) if s.completed_at.is_some());

    // A second completion must not overwrite the first rating.
    assert_matches!(
        CookingRepo::complete_session(&pool, session.id, ann.id, Feedback::No).await,
        Ok(SessionCompletion::AlreadyCompleted)
    );

    CookingRepo::upsert_feedback(&pool, ann.id, stew.id, Feedback::Meh).await.unwrap();
    CookingRepo::upsert_feedback(&pool, ann.id, stew.id, Feedback::No).await.unwrap();

    let map = CookingRepo::feedback_map(&pool, ann.id).await.unwrap();
    assert_eq!(map.get(&pasta.id), Some(&Feedback::Yes));
    assert_eq!(map.get(&stew.id), Some(&Feedback::No));

    let stats = CookingRepo::stats(&pool, ann.id).await.unwrap();
    assert_eq!(
        (stats.total_cooked, stats.would_cook_again, stats.would_not_cook_again, stats.meh),
        (1, 1, 1, 0)
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_settings_defaults_and_upserts(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;

    let settings = NotificationRepo::get_settings(&pool, ann.id).await.unwrap();
    assert!(!settings.enabled);
    assert_eq!(settings.reminder_time, 30);

    let mut changed = settings.clone();
    changed.enabled = true;
    changed.reminder_time = 60;
    NotificationRepo::upsert_settings(&pool, ann.id, &changed).await.unwrap();
    assert_eq!(NotificationRepo::get_settings(&pool, ann.id).await.unwrap(), changed);

    PromptRepo::upsert(
        &pool,
        ann.id,
        &CustomPrompts {
            meal_planning: Some("Vegetarian only".into()),
            ..CustomPrompts::default()
        },
    )
    .await
    .unwrap();
    let prompts = PromptRepo::upsert(
        &pool,
        ann.id,
        &CustomPrompts {
            fridge_search: Some("Be brief".into()),
            ..CustomPrompts::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(prompts.meal_planning.as_deref(), Some("Vegetarian only"));
    assert_eq!(prompts.fridge_search.as_deref(), Some("Be brief"));

    assert!(PromptRepo::reset(&pool, ann.id).await.unwrap());
    assert_eq!(PromptRepo::get(&pool, ann.id).await.unwrap(), CustomPrompts::default());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_llm_cache_round_trip_and_purge(pool: PgPool) {
    LlmCacheRepo::put(&pool, "k1", "first", "ollama", "llama3").await.unwrap();
    LlmCacheRepo::put(&pool, "k1", "second", "ollama", "llama3").await.unwrap();
    assert_eq!(LlmCacheRepo::get(&pool, "k1").await.unwrap().as_deref(), Some("second"));

    let purged = LlmCacheRepo::purge_older_than(&pool, Utc::now() + Duration::seconds(1))
        .await
        .unwrap();
    assert_eq!(purged, 1);
    assert!(LlmCacheRepo::get(&pool, "k1").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Account deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_account_keeps_household_data(pool: PgPool) {
    let ann = new_user(&pool, "ann").await;
    let bob = new_user(&pool, "bob").await;
    let household = HouseholdRepo::create(&pool, "Home", ann.id).await.unwrap().unwrap();
    UserRepo::join_household(&pool, bob.id, household.id).await.unwrap();

    let shared = RecipeRepo::create(&pool, bob.id, Some(household.id), &draft("Stew"))
        .await
        .unwrap();
    UserRepo::set_household(&pool, bob.id, None).await.unwrap();
    let personal = RecipeRepo::create(&pool, bob.id, None, &draft("Toast")).await.unwrap();

    assert!(UserRepo::delete_account(&pool, bob.id).await.unwrap());

    let ann_view = Viewer::new(ann.id, Some(household.id));
    let kept = RecipeRepo::find_visible(&pool, shared.id, ann_view).await.unwrap().unwrap();
    assert_eq!(kept.author_id, None);
    assert!(RecipeRepo::find_by_id(&pool, personal.id, 0).await.unwrap().is_none());
}
