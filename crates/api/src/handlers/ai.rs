//! AI-assisted features: recipe import from a web page or pasted text,
//! meal plan generation and the fridge search.
//!
//! Extraction endpoints return a recipe draft for the user to review; they do
//! not store anything.

use std::collections::HashSet;
use std::time::Duration;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use kitchenry_core::error::CoreError;
use kitchenry_core::fridge::{self, FridgeResult, DEFAULT_MIN_MATCH_PERCENTAGE};
use kitchenry_core::llm::{
    fridge_idea_prompt, html_to_text, meal_plan_prompt, page_extraction_prompt, parse_fridge_idea,
    parse_llm_object, parse_recipe_response, text_extraction_prompt, PromptKind, RecipeSummary,
    DEFAULT_PLAN_DAYS, MAX_PLAN_DAYS, MAX_PLAN_RECIPES, MIN_RECIPES_FOR_PLAN,
};
use kitchenry_core::recipe::RecipeDraft;
use kitchenry_core::types::DbId;
use kitchenry_db::models::recipe::Recipe;
use kitchenry_db::repositories::RecipeRepo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::llm;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

const PAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "Mozilla/5.0 (compatible; Kitchenry recipe importer)";
/// Recipe pages beyond this size are cut off before text extraction.
const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ImportUrlRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AutoMealPlanRequest {
    pub days: Option<u32>,
    #[serde(default)]
    pub preferences: String,
    #[serde(default)]
    pub exclude_recipes: Vec<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct FridgeSearchRequest {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub search_online: bool,
    pub min_match_percentage: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct FridgeResponse {
    #[serde(flatten)]
    pub result: FridgeResult,
    /// The recipes referenced by `suggestions`, in the same order.
    pub recipes: Vec<Recipe>,
    pub ai_suggestion: Option<RecipeDraft>,
    /// Why the AI idea is missing when `search_online` was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fetch_page_text(client: &reqwest::Client, url: &str) -> AppResult<String> {
    let upstream =
        |e: reqwest::Error| AppError::Core(CoreError::Upstream(format!("Failed to fetch URL: {e}")));
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .timeout(PAGE_FETCH_TIMEOUT)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(upstream)?;
    let body = read_capped(response, MAX_PAGE_BYTES).await.map_err(upstream)?;
    Ok(html_to_text(&String::from_utf8_lossy(&body)))
}

/// Reads at most `limit` bytes of a response body; the rest is never downloaded.
async fn read_capped(mut response: reqwest::Response, limit: usize) -> reqwest::Result<Vec<u8>> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Drop planned meals that reference recipes outside `known`; models
/// occasionally invent ids.
pub fn retain_known_recipes(plan: &mut Value, known: &HashSet<DbId>) {
    let Some(days) = plan.get_mut("plan").and_then(Value::as_array_mut) else {
        return;
    };
    for day in days {
        if let Some(meals) = day.get_mut("meals").and_then(Value::as_array_mut) {
            meals.retain(|meal| {
                meal.get("recipe_id")
                    .and_then(Value::as_i64)
                    .is_some_and(|id| known.contains(&id))
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/ai/import-url
///
/// Fetch a recipe page, strip it to text and let the model extract the
/// recipe.
pub async fn import_from_url(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<ImportUrlRequest>,
) -> AppResult<impl IntoResponse> {
    let url = input.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AppError::validation("URL must start with http:// or https://"));
    }

    let text = fetch_page_text(&state.http, url).await?;
    if text.is_empty() {
        return Err(AppError::validation("The page has no readable text"));
    }

    let raw = llm::complete(
        &state,
        user.id(),
        PromptKind::RecipeExtraction,
        page_extraction_prompt(&text),
    )
    .await?;
    let draft = parse_recipe_response(&raw)?;

    tracing::info!(user_id = user.id(), url, title = %draft.title, "Recipe extracted from URL");

    Ok(Json(DataResponse { data: draft }))
}

/// POST /api/ai/import-text
pub async fn import_from_text(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<ImportTextRequest>,
) -> AppResult<impl IntoResponse> {
    if input.text.trim().is_empty() {
        return Err(AppError::validation("Text must not be empty"));
    }

    let raw = llm::complete(
        &state,
        user.id(),
        PromptKind::RecipeExtraction,
        text_extraction_prompt(input.text.trim()),
    )
    .await?;
    let draft = parse_recipe_response(&raw)?;

    tracing::info!(user_id = user.id(), title = %draft.title, "Recipe extracted from text");

    Ok(Json(DataResponse { data: draft }))
}

/// POST /api/ai/auto-meal-plan
///
/// Propose a plan over the caller's recipes. Nothing is stored; the client
/// creates meal plan entries for the proposals the user keeps.
pub async fn auto_meal_plan(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<AutoMealPlanRequest>,
) -> AppResult<impl IntoResponse> {
    let days = input.days.unwrap_or(DEFAULT_PLAN_DAYS);
    if !(1..=MAX_PLAN_DAYS).contains(&days) {
        return Err(AppError::validation(format!(
            "days must be between 1 and {MAX_PLAN_DAYS}"
        )));
    }

    let recipes = RecipeRepo::list_visible(&state.pool, user.viewer()).await?;
    if recipes.len() < MIN_RECIPES_FOR_PLAN {
        return Err(AppError::validation(format!(
            "Add at least {MIN_RECIPES_FOR_PLAN} recipes before generating a meal plan"
        )));
    }

    let summaries: Vec<RecipeSummary> = recipes
        .iter()
        .filter(|r| !input.exclude_recipes.contains(&r.id))
        .take(MAX_PLAN_RECIPES)
        .map(|r| RecipeSummary {
            id: r.id,
            title: r.title.clone(),
            category: r.category.clone(),
        })
        .collect();
    if summaries.is_empty() {
        return Err(AppError::validation("Every recipe is excluded"));
    }

    let raw = llm::complete(
        &state,
        user.id(),
        PromptKind::MealPlanning,
        meal_plan_prompt(days, &input.preferences, &input.exclude_recipes, &summaries),
    )
    .await?;
    let mut plan = parse_llm_object(&raw)?;
    let known: HashSet<DbId> = summaries.iter().map(|s| s.id).collect();
    retain_known_recipes(&mut plan, &known);

    tracing::info!(user_id = user.id(), days, "Meal plan generated");

    Ok(Json(DataResponse { data: plan }))
}

/// POST /api/ai/fridge-search
///
/// Match visible recipes against the given ingredients. With
/// `search_online` the model also proposes one new recipe; if that fails the
/// local matches are still returned with an `error` note.
pub async fn fridge_search(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<FridgeSearchRequest>,
) -> AppResult<impl IntoResponse> {
    let available: Vec<String> = input
        .ingredients
        .iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if available.is_empty() {
        return Err(AppError::validation("List at least one ingredient"));
    }
    let min_percentage = input
        .min_match_percentage
        .unwrap_or(DEFAULT_MIN_MATCH_PERCENTAGE)
        .min(100);

    let recipes = RecipeRepo::list_visible(&state.pool, user.viewer()).await?;
    let result = fridge::search(
        recipes.iter().map(|r| (r.id, r.ingredients.0.as_slice())),
        &available,
        min_percentage,
    );

    let matched: Vec<Recipe> = result
        .suggestions
        .iter()
        .filter_map(|m| recipes.iter().find(|r| r.id == m.recipe_id).cloned())
        .collect();

    let (ai_suggestion, error) = if input.search_online {
        let outcome = llm::complete(
            &state,
            user.id(),
            PromptKind::FridgeSearch,
            fridge_idea_prompt(&available),
        )
        .await
        .and_then(|raw| parse_fridge_idea(&raw).map_err(AppError::from));
        match outcome {
            Ok(idea) => (idea, None),
            Err(e) => {
                tracing::warn!(user_id = user.id(), error = %e, "AI fridge idea failed");
                (None, Some(e.to_string()))
            }
        }
    } else {
        (None, None)
    };

    tracing::info!(
        user_id = user.id(),
        matches = result.suggestions.len(),
        search_online = input.search_online,
        "Fridge search",
    );

    Ok(Json(DataResponse {
        data: FridgeResponse {
            result,
            recipes: matched,
            ai_suggestion,
            error,
        },
    }))
}
