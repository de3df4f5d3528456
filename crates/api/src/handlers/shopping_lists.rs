//! Handlers for the `/shopping-lists` resource and its items.
//!
//! Lists belong to the caller's scope (household, or personal when the caller
//! has none). A list outside the caller's scope answers 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use kitchenry_core::types::DbId;
use kitchenry_db::models::shopping_list::{
    NewShoppingItem, SaveShoppingList, ShoppingListWithItems, UpdateShoppingItem,
};
use kitchenry_db::repositories::{RecipeRepo, ShoppingListRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn scoped_list(
    state: &AppState,
    user: &CurrentUser,
    id: DbId,
) -> AppResult<ShoppingListWithItems> {
    ShoppingListRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|l| user.scope().contains(l.list.household_id, l.list.user_id))
        .ok_or(AppError::not_found("ShoppingList", id))
}

fn checked_list(mut input: SaveShoppingList) -> AppResult<SaveShoppingList> {
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(AppError::validation("Shopping list name must not be empty"));
    }
    if input.items.iter().any(|i| i.name.trim().is_empty()) {
        return Err(AppError::validation("Every item needs a name"));
    }
    Ok(input)
}

/// Name of a list generated from recipes, e.g. `Shopping List - Mar 04`.
pub fn generated_list_name(now: chrono::DateTime<Utc>) -> String {
    format!("Shopping List - {}", now.format("%b %d"))
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// GET /api/shopping-lists
pub async fn list_shopping_lists(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let lists = ShoppingListRepo::list(&state.pool, user.scope()).await?;
    Ok(Json(DataResponse { data: lists }))
}

/// POST /api/shopping-lists
pub async fn create_shopping_list(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<SaveShoppingList>,
) -> AppResult<impl IntoResponse> {
    let input = checked_list(input)?;
    let list = ShoppingListRepo::create(&state.pool, user.scope(), user.id(), &input).await?;

    tracing::info!(list_id = list.list.id, user_id = user.id(), "Shopping list created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: list })))
}

/// GET /api/shopping-lists/{id}
pub async fn get_shopping_list(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let list = scoped_list(&state, &user, id).await?;
    Ok(Json(DataResponse { data: list }))
}

/// PUT /api/shopping-lists/{id}
///
/// Replace the name and the full item list.
pub async fn update_shopping_list(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SaveShoppingList>,
) -> AppResult<impl IntoResponse> {
    scoped_list(&state, &user, id).await?;
    let input = checked_list(input)?;

    let list = ShoppingListRepo::replace(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("ShoppingList", id))?;

    tracing::info!(list_id = id, user_id = user.id(), "Shopping list updated");

    Ok(Json(DataResponse { data: list }))
}

/// DELETE /api/shopping-lists/{id}
pub async fn delete_shopping_list(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    scoped_list(&state, &user, id).await?;
    ShoppingListRepo::delete(&state.pool, id).await?;

    tracing::info!(list_id = id, user_id = user.id(), "Shopping list deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/shopping-lists/from-recipes
///
/// Body is an array of recipe ids. Builds a new list holding every
/// ingredient of the visible recipes among them, in the given order.
pub async fn create_from_recipes(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(recipe_ids): Json<Vec<DbId>>,
) -> AppResult<impl IntoResponse> {
    if recipe_ids.is_empty() {
        return Err(AppError::validation("Select at least one recipe"));
    }

    let mut recipes =
        RecipeRepo::find_many_visible(&state.pool, &recipe_ids, user.viewer()).await?;
    if recipes.is_empty() {
        return Err(AppError::validation("None of the selected recipes were found"));
    }
    recipes.sort_by_key(|r| recipe_ids.iter().position(|id| *id == r.id));

    let items = recipes
        .iter()
        .flat_map(|r| {
            r.ingredients.0.iter().map(move |ing| NewShoppingItem {
                name: ing.name.clone(),
                amount: ing.amount.clone(),
                unit: ing.unit.clone(),
                checked: false,
                recipe_id: Some(r.id),
            })
        })
        .collect();
    let input = SaveShoppingList {
        name: generated_list_name(Utc::now()),
        items,
    };

    let list = ShoppingListRepo::create(&state.pool, user.scope(), user.id(), &input).await?;

    tracing::info!(
        list_id = list.list.id,
        user_id = user.id(),
        recipes = recipes.len(),
        items = list.items.len(),
        "Shopping list generated from recipes",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: list })))
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// POST /api/shopping-lists/{id}/items
///
/// Append one item at the end of the list.
pub async fn add_item(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<NewShoppingItem>,
) -> AppResult<impl IntoResponse> {
    scoped_list(&state, &user, id).await?;
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(AppError::validation("Item name must not be empty"));
    }

    let item = ShoppingListRepo::add_item(&state.pool, id, &input).await?;

    tracing::info!(list_id = id, item_id = item.id, user_id = user.id(), "Shopping item added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/shopping-lists/{id}/items/{item_id}
///
/// Partial update; typically toggles `checked`.
pub async fn update_item(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateShoppingItem>,
) -> AppResult<impl IntoResponse> {
    scoped_list(&state, &user, id).await?;
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::validation("Item name must not be empty"));
    }

    let item = ShoppingListRepo::update_item(&state.pool, id, item_id, &input)
        .await?
        .ok_or(AppError::not_found("ShoppingListItem", item_id))?;

    tracing::info!(list_id = id, item_id, user_id = user.id(), "Shopping item updated");

    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/shopping-lists/{id}/items/{item_id}
pub async fn delete_item(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    scoped_list(&state, &user, id).await?;

    if !ShoppingListRepo::delete_item(&state.pool, id, item_id).await? {
        return Err(AppError::not_found("ShoppingListItem", item_id));
    }

    tracing::info!(list_id = id, item_id, user_id = user.id(), "Shopping item deleted");

    Ok(StatusCode::NO_CONTENT)
}
