//! Recipe entity model and DTOs.

use kitchenry_core::recipe::RecipeDraft;
use kitchenry_core::types::{DbId, Ingredient, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `recipes` table plus the viewer's favorite flag.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recipe {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub tags: Vec<String>,
    pub ingredients: Json<Vec<Ingredient>>,
    pub instructions: Vec<String>,
    pub image_url: String,
    pub author_id: Option<DbId>,
    pub household_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Whether the requesting user has favorited this recipe.
    pub is_favorite: bool,
}

impl Recipe {
    pub fn total_time(&self) -> i32 {
        self.prep_time.saturating_add(self.cook_time)
    }

    /// The content fields, as used by export and the recipe card.
    pub fn to_draft(&self) -> RecipeDraft {
        RecipeDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            ingredients: self.ingredients.0.clone(),
            instructions: self.instructions.clone(),
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            servings: self.servings,
            category: self.category.clone(),
            tags: self.tags.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// List filters for `GET /recipes`.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Exact category; `None` means all.
    pub category: Option<String>,
    /// `ILIKE` pattern, already escaped.
    pub search_pattern: Option<String>,
    pub favorites_only: bool,
    pub limit: i64,
    pub offset: i64,
}

/// Who is reading recipes: the user and their household, if any.
///
/// A recipe is visible to its author and to every member of its household.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: DbId,
    pub household_id: Option<DbId>,
}

impl Viewer {
    pub fn new(user_id: DbId, household_id: Option<DbId>) -> Self {
        Self {
            user_id,
            household_id,
        }
    }

    /// Whether this viewer may read (and edit) `recipe`.
    pub fn can_access(&self, recipe: &Recipe) -> bool {
        recipe.author_id == Some(self.user_id)
            || (recipe.household_id.is_some() && recipe.household_id == self.household_id)
    }
}
