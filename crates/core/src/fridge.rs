//! Fridge search: match the ingredients a user has on hand against stored
//! recipes.
//!
//! Matching is token based. An available item fully covers a recipe
//! ingredient when it names at least the same words (`"smoked paprika"`
//! covers `"paprika"`). A more generic item (`"pepper"` for
//! `"red bell pepper"`) is only a partial match and earns half the credit.
//! Pantry staples (salt, pepper, water, cooking oil, sugar) never count as
//! missing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Ingredient};

/// Minimum coverage for a recipe to appear among the suggestions.
pub const DEFAULT_MIN_MATCH_PERCENTAGE: u8 = 50;

/// Ingredients assumed to be in every kitchen.
const STAPLES: &[&str] = &[
    "salt",
    "pepper",
    "black pepper",
    "water",
    "oil",
    "olive oil",
    "vegetable oil",
    "sugar",
];

/// Coverage of one recipe by the available ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMatch {
    pub recipe_id: DbId,
    pub missing_ingredients: Vec<String>,
    /// Ingredients only matched by a more generic item on hand.
    #[serde(default)]
    pub partial_ingredients: Vec<String>,
    pub match_percentage: u8,
}

impl RecipeMatch {
    /// Nothing missing and nothing matched only loosely.
    pub fn is_complete(&self) -> bool {
        self.missing_ingredients.is_empty() && self.partial_ingredients.is_empty()
    }
}

/// Outcome of a fridge search across a recipe collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FridgeResult {
    /// Recipes whose every ingredient is fully covered.
    pub matching_recipe_ids: Vec<DbId>,
    /// All recipes at or above the threshold, best coverage first.
    pub suggestions: Vec<RecipeMatch>,
}

/// Lowercase, strip punctuation, collapse whitespace.
pub fn normalize_ingredient(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn singular(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ies") {
        format!("{}y", &word[..word.len() - 3])
    } else if word.len() > 4 && word.ends_with("oes") {
        word[..word.len() - 2].to_string()
    } else if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

fn tokens(name: &str) -> BTreeSet<String> {
    normalize_ingredient(name)
        .split_whitespace()
        .map(singular)
        .collect()
}

/// Whether an ingredient is a pantry staple.
pub fn is_staple(name: &str) -> bool {
    let normalized = normalize_ingredient(name);
    STAPLES.contains(&normalized.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Coverage {
    None,
    Partial,
    Full,
}

fn coverage(available: &BTreeSet<String>, wanted: &BTreeSet<String>) -> Coverage {
    if available.is_empty() || wanted.is_empty() {
        Coverage::None
    } else if wanted.is_subset(available) {
        Coverage::Full
    } else if available.is_subset(wanted) {
        Coverage::Partial
    } else {
        Coverage::None
    }
}

/// Compute how much of a recipe is covered by the available ingredients.
///
/// Returns `None` for recipes without ingredients.
pub fn match_recipe(
    recipe_id: DbId,
    ingredients: &[Ingredient],
    available: &[String],
) -> Option<RecipeMatch> {
    if ingredients.is_empty() {
        return None;
    }

    let available: Vec<BTreeSet<String>> = available.iter().map(|a| tokens(a)).collect();

    let mut needed = 0usize;
    let mut missing = Vec::new();
    let mut partial = Vec::new();
    for ing in ingredients.iter().filter(|i| !is_staple(&i.name)) {
        needed += 1;
        let wanted = tokens(&ing.name);
        let best = available
            .iter()
            .map(|a| coverage(a, &wanted))
            .max()
            .unwrap_or(Coverage::None);
        match best {
            Coverage::Full => {}
            Coverage::Partial => partial.push(ing.name.clone()),
            Coverage::None => missing.push(ing.name.clone()),
        }
    }

    // Full matches count two half-points, partial matches one.
    let percentage = if needed == 0 {
        100
    } else {
        let points = 2 * (needed - missing.len() - partial.len()) + partial.len();
        ((points * 100) as f64 / (2 * needed) as f64).round() as u8
    };

    Some(RecipeMatch {
        recipe_id,
        missing_ingredients: missing,
        partial_ingredients: partial,
        match_percentage: percentage,
    })
}

/// Match every recipe and collect the ones at or above `min_percentage`.
pub fn search<'a, I>(recipes: I, available: &[String], min_percentage: u8) -> FridgeResult
where
    I: IntoIterator<Item = (DbId, &'a [Ingredient])>,
{
    let mut suggestions: Vec<RecipeMatch> = recipes
        .into_iter()
        .filter_map(|(id, ingredients)| match_recipe(id, ingredients, available))
        .filter(|m| m.match_percentage >= min_percentage)
        .collect();

    suggestions.sort_by(|a, b| {
        b.match_percentage
            .cmp(&a.match_percentage)
            .then(a.missing_ingredients.len().cmp(&b.missing_ingredients.len()))
    });

    let matching_recipe_ids = suggestions
        .iter()
        .filter(|m| m.is_complete())
        .map(|m| m.recipe_id)
        .collect();

    FridgeResult {
        matching_recipe_ids,
        suggestions,
    }
}
