//! Per-user overrides of the AI system prompts.

use kitchenry_core::llm::PromptKind;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored overrides; `None` means "use the default".
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize, PartialEq)]
pub struct CustomPrompts {
    pub recipe_extraction: Option<String>,
    pub meal_planning: Option<String>,
    pub fridge_search: Option<String>,
}

impl CustomPrompts {
    pub fn get(&self, kind: PromptKind) -> Option<&str> {
        match kind {
            PromptKind::RecipeExtraction => self.recipe_extraction.as_deref(),
            PromptKind::MealPlanning => self.meal_planning.as_deref(),
            PromptKind::FridgeSearch => self.fridge_search.as_deref(),
        }
        .filter(|p| !p.trim().is_empty())
    }
}
