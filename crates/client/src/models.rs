//! Wire types exchanged with the Kitchenry API.
//!
//! Response types ignore fields the client does not use, so the server may
//! grow its payloads without breaking older clients.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use kitchenry_core::fridge::FridgeResult;
use kitchenry_core::llm::LlmProvider;
use kitchenry_core::recipe::RecipeDraft;
use kitchenry_core::scaling::ScaledIngredients;
use kitchenry_core::suggestions::Effort;
use kitchenry_core::types::{DbId, Feedback, Ingredient, MealType, Timestamp};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub household_id: Option<DbId>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

/// Returned by register and login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
}

/// `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Households
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Household {
    pub id: DbId,
    pub name: String,
    pub owner_id: DbId,
    pub join_code: Option<String>,
    pub join_code_expires_at: Option<Timestamp>,
    #[serde(default)]
    pub member_ids: Vec<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinCode {
    pub join_code: String,
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub image_url: String,
    pub author_id: Option<DbId>,
    pub household_id: Option<DbId>,
    pub is_favorite: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Filters for the recipe list. `None` fields are left off the query string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecipeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub favorites_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScaledRecipe {
    pub recipe: Recipe,
    #[serde(flatten)]
    pub scaled: ScaledIngredients,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrintView {
    pub recipe: Recipe,
    pub total_time: i32,
    pub printed_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FavoriteState {
    pub recipe_id: DbId,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareLink {
    pub share_id: String,
    pub share_url: String,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharedRecipe {
    pub recipe: Recipe,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpload {
    pub image_url: String,
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MealPlan {
    pub id: DbId,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: DbId,
    pub recipe_title: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMealPlan {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: DbId,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShoppingList {
    pub id: DbId,
    pub name: String,
    pub household_id: Option<DbId>,
    #[serde(default)]
    pub items: Vec<ShoppingItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShoppingItem {
    pub id: DbId,
    pub position: i32,
    pub name: String,
    pub amount: String,
    pub unit: String,
    pub checked: bool,
    pub recipe_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewShoppingItem {
    pub name: String,
    pub amount: String,
    pub unit: String,
    pub checked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<DbId>,
}

impl NewShoppingItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveShoppingList {
    pub name: String,
    pub items: Vec<NewShoppingItem>,
}

/// Partial item edit; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShoppingItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

// ---------------------------------------------------------------------------
// Cooking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Suggestion {
    pub recipe: Recipe,
    pub effort: Effort,
    pub total_time: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookSession {
    pub id: DbId,
    pub recipe_id: DbId,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub feedback: Option<Feedback>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CookingStats {
    pub total_cooked: i64,
    pub would_cook_again: i64,
    pub would_not_cook_again: i64,
    pub meh: i64,
}

// ---------------------------------------------------------------------------
// Notifications and settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub meal_reminders: bool,
    pub reminder_time: i32,
    pub shopping_reminders: bool,
    pub weekly_plan_reminder: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub ollama_url: String,
    pub ollama_model: String,
    pub available_providers: Vec<String>,
    pub openai_configured: bool,
    pub anthropic_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateLlmSettings {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionTest {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub available_models: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomPrompts {
    pub recipe_extraction: Option<String>,
    pub meal_planning: Option<String>,
    pub fridge_search: Option<String>,
}

/// The caller's overrides next to the built-in prompts, keyed by kind.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptsView {
    pub custom: CustomPrompts,
    pub defaults: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// AI and import
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct AutoMealPlanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    pub preferences: String,
    pub exclude_recipes: Vec<DbId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FridgeSearchRequest {
    pub ingredients: Vec<String>,
    pub search_online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_match_percentage: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FridgeSearchResponse {
    #[serde(flatten)]
    pub result: FridgeResult,
    pub recipes: Vec<Recipe>,
    pub ai_suggestion: Option<RecipeDraft>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportSummary {
    pub imported: u64,
    pub errors: Vec<String>,
}
