//! Recipe import from other recipe apps.
//!
//! Each platform's export is a JSON document holding one recipe object or an
//! array of them. Recipes that cannot be interpreted are reported in
//! [`ImportOutcome::errors`] and skipped; the rest are imported.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::recipe::{leading_int, value_to_ingredient, value_to_lines, value_to_text, RecipeDraft};
use crate::types::{Ingredient, DEFAULT_CATEGORY, DEFAULT_SERVINGS};

/// Source format of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Paprika,
    Cookmate,
    /// Kitchenry's own export format.
    Json,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Paprika => "paprika",
            Platform::Cookmate => "cookmate",
            Platform::Json => "json",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paprika" => Ok(Platform::Paprika),
            "cookmate" => Ok(Platform::Cookmate),
            "json" => Ok(Platform::Json),
            other => Err(CoreError::Validation(format!(
                "Unsupported import platform '{other}'. Must be one of: paprika, cookmate, json"
            ))),
        }
    }
}

/// Parsed recipes plus the per-recipe failures.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub recipes: Vec<RecipeDraft>,
    pub errors: Vec<String>,
}

/// Parse an export document from `platform`.
///
/// Malformed JSON fails the whole import; a recipe entry that is not an
/// object only adds an error.
pub fn parse_platform(platform: Platform, data: &str) -> Result<ImportOutcome, CoreError> {
    let document: Value = serde_json::from_str(data)
        .map_err(|_| CoreError::Validation("Invalid JSON data".into()))?;

    let entries = match document {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut outcome = ImportOutcome::default();
    for (index, entry) in entries.into_iter().enumerate() {
        let parsed = match (&entry, platform) {
            (Value::Object(map), Platform::Paprika) => Ok(from_paprika(map)),
            (Value::Object(map), Platform::Cookmate) => Ok(from_cookmate(map)),
            (Value::Object(_), Platform::Json) => serde_json::from_value::<RecipeDraft>(entry)
                .map_err(|e| e.to_string()),
            _ => Err("expected a recipe object".to_string()),
        };

        match parsed {
            Ok(draft) => outcome.recipes.push(draft.normalized()),
            Err(reason) => outcome
                .errors
                .push(format!("Failed to parse recipe {}: {reason}", index + 1)),
        }
    }

    Ok(outcome)
}

fn field<'a>(map: &'a Map<String, Value>, key: &str) -> &'a Value {
    map.get(key).unwrap_or(&Value::Null)
}

fn text(map: &Map<String, Value>, key: &str) -> String {
    value_to_text(field(map, key))
}

/// Paprika keeps ingredients and directions as newline-separated text and
/// times as strings such as `"15 mins"`.
fn from_paprika(map: &Map<String, Value>) -> RecipeDraft {
    let categories = value_to_lines(field(map, "categories"));

    RecipeDraft {
        title: text(map, "name"),
        description: text(map, "description"),
        ingredients: value_to_lines(field(map, "ingredients"))
            .into_iter()
            .map(|line| Ingredient::new(line, "", ""))
            .collect(),
        instructions: value_to_lines(field(map, "directions")),
        prep_time: leading_int(field(map, "prep_time")).unwrap_or(0),
        cook_time: leading_int(field(map, "cook_time")).unwrap_or(0),
        servings: leading_int(field(map, "servings")).unwrap_or(DEFAULT_SERVINGS),
        category: categories
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        tags: categories,
        image_url: text(map, "photo_url"),
    }
}

/// Cookmate uses structured ingredient objects and either `instructions` or
/// `directions` for the steps.
fn from_cookmate(map: &Map<String, Value>) -> RecipeDraft {
    let title = match map.get("title") {
        Some(Value::String(t)) => t.clone(),
        _ => text(map, "name"),
    };
    let steps = map
        .get("instructions")
        .or_else(|| map.get("directions"))
        .unwrap_or(&Value::Null);
    let ingredients = match field(map, "ingredients") {
        Value::Array(items) => items.iter().filter_map(value_to_ingredient).collect(),
        other => value_to_lines(other)
            .into_iter()
            .map(|line| Ingredient::new(line, "", ""))
            .collect(),
    };

    RecipeDraft {
        title,
        description: text(map, "description"),
        ingredients,
        instructions: value_to_lines(steps),
        prep_time: leading_int(field(map, "prep_time")).unwrap_or(0),
        cook_time: leading_int(field(map, "cook_time")).unwrap_or(0),
        servings: leading_int(field(map, "servings")).unwrap_or(DEFAULT_SERVINGS),
        category: text(map, "category"),
        tags: value_to_lines(field(map, "tags")),
        image_url: text(map, "image"),
    }
}
