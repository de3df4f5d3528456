//! Recipe content shared by manual entry, platform import, AI extraction and
//! export.
//!
//! Input from other apps and from language models is loose: numbers arrive as
//! strings (`"15 mins"`), amounts as numbers, fields as `null`. The lenient
//! deserializers here accept all of that so one bad field does not reject a
//! whole recipe.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::{Ingredient, DEFAULT_CATEGORY, DEFAULT_SERVINGS};

/// Longest accepted recipe title.
pub const MAX_TITLE_LEN: usize = 200;

/// Title given to imported recipes that have none.
pub const UNTITLED: &str = "Untitled";

/// Upper bound for prep and cook times, in minutes (about a week).
pub const MAX_MINUTES: i32 = 10_000;

/// URL prefix under which uploaded recipe images are served.
pub const UPLOADS_PATH: &str = "/api/uploads";

/// Recipe content without ownership or persistence metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_ingredients")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "lenient_lines")]
    pub instructions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub prep_time: i32,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub cook_time: i32,
    #[serde(default = "default_servings", deserialize_with = "lenient_servings")]
    pub servings: i32,
    #[serde(default = "default_category", deserialize_with = "lenient_category")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_lines")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: String,
}

fn default_servings() -> i32 {
    DEFAULT_SERVINGS
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            prep_time: 0,
            cook_time: 0,
            servings: DEFAULT_SERVINGS,
            category: default_category(),
            tags: Vec::new(),
            image_url: String::new(),
        }
    }
}

impl RecipeDraft {
    /// Trim text, drop empty lines and nameless ingredients, and apply the
    /// defaults for missing values.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            self.title = UNTITLED.to_string();
        }
        self.description = self.description.trim().to_string();
        self.ingredients = self
            .ingredients
            .into_iter()
            .filter_map(|i| {
                let name = i.name.trim();
                (!name.is_empty()).then(|| Ingredient {
                    name: name.to_string(),
                    amount: i.amount.trim().to_string(),
                    unit: i.unit.trim().to_string(),
                })
            })
            .collect();
        self.instructions = clean_lines(self.instructions);
        self.tags = clean_lines(self.tags);
        self.prep_time = self.prep_time.clamp(0, MAX_MINUTES);
        self.cook_time = self.cook_time.clamp(0, MAX_MINUTES);
        if self.servings <= 0 {
            self.servings = DEFAULT_SERVINGS;
        }
        self.category = self.category.trim().to_string();
        if self.category.is_empty() {
            self.category = DEFAULT_CATEGORY.to_string();
        }
        self.image_url = self.image_url.trim().to_string();
        if !is_valid_image_url(&self.image_url) {
            self.image_url.clear();
        }
        self
    }

    pub fn total_time(&self) -> i32 {
        self.prep_time.saturating_add(self.cook_time)
    }
}

/// File name inside the upload directory that an `image_url` points at.
///
/// Only `/api/uploads/<name>` with a single plain path component qualifies.
pub fn upload_file_name(image_url: &str) -> Option<&str> {
    let name = image_url.strip_prefix(UPLOADS_PATH)?.strip_prefix('/')?;
    let plain = !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0']);
    plain.then_some(name)
}

/// Empty, an absolute http(s) URL, or one of our own uploads.
pub fn is_valid_image_url(url: &str) -> bool {
    if url.is_empty() || upload_file_name(url).is_some() {
        return true;
    }
    let lower = url.to_ascii_lowercase();
    ["http://", "https://"].iter().any(|scheme| {
        lower
            .strip_prefix(scheme)
            .is_some_and(|rest| !rest.is_empty() && !rest.contains(char::is_whitespace))
    })
}

/// Validate user-entered recipe content before it is stored.
pub fn validate_draft(draft: &RecipeDraft) -> Result<(), CoreError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("Recipe title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Recipe title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if draft.servings <= 0 {
        return Err(CoreError::Validation("Servings must be a positive number".into()));
    }
    if draft.prep_time < 0 || draft.cook_time < 0 {
        return Err(CoreError::Validation("Times must not be negative".into()));
    }
    if draft.prep_time > MAX_MINUTES || draft.cook_time > MAX_MINUTES {
        return Err(CoreError::Validation(format!(
            "Times must be at most {MAX_MINUTES} minutes"
        )));
    }
    if !is_valid_image_url(draft.image_url.trim()) {
        return Err(CoreError::Validation(
            "Image URL must be an http(s) link or an uploaded image".into(),
        ));
    }
    if draft.ingredients.iter().any(|i| i.name.trim().is_empty()) {
        return Err(CoreError::Validation("Every ingredient needs a name".into()));
    }
    Ok(())
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Leading integer of a value such as `15`, `"15"`, `"15 mins"` or `"1.5"`.
pub fn leading_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

/// Render a scalar JSON value as text; `null` and containers become empty.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Split a value into lines: arrays map element-wise, strings split on newlines.
pub fn value_to_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_to_text).collect(),
        Value::String(s) => s.lines().map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// Interpret a JSON value as an ingredient: an object with name/amount/unit or
/// a plain line of text.
pub fn value_to_ingredient(value: &Value) -> Option<Ingredient> {
    match value {
        Value::Object(map) => {
            let name = map.get("name").map(value_to_text).unwrap_or_default();
            Some(Ingredient {
                name,
                amount: map.get("amount").map(value_to_text).unwrap_or_default(),
                unit: map.get("unit").map(value_to_text).unwrap_or_default(),
            })
        }
        Value::String(s) => Some(Ingredient::new(s.clone(), "", "")),
        _ => None,
    }
}

pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(value_to_text(&Value::deserialize(d)?))
}

fn lenient_lines<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(value_to_lines(&Value::deserialize(d)?))
}

fn lenient_minutes<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    Ok(leading_int(&Value::deserialize(d)?).unwrap_or(0))
}

fn lenient_servings<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    Ok(leading_int(&Value::deserialize(d)?).unwrap_or(DEFAULT_SERVINGS))
}

fn lenient_category<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let text = value_to_text(&Value::deserialize(d)?);
    Ok(if text.trim().is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        text
    })
}

fn lenient_ingredients<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Ingredient>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match &value {
        Value::Array(items) => items.iter().filter_map(value_to_ingredient).collect(),
        Value::String(s) => s.lines().map(|l| Ingredient::new(l, "", "")).collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_fields_accept_loose_model_output() {
        let json = r#"{
            "title": "Soup",
            "ingredients": [{"name": "carrot", "amount": 2, "unit": null}, "1 onion"],
            "instructions": "Chop\n\nBoil",
            "prep_time": "15 mins",
            "cook_time": 20.4,
            "servings": null,
            "category": "",
            "tags": ["warm", "", "easy"]
        }"#;
        let draft: RecipeDraft = serde_json::from_str(json).unwrap();
        let draft = draft.normalized();

        assert_eq!(draft.ingredients[0], Ingredient::new("carrot", "2", ""));
        assert_eq!(draft.ingredients[1].name, "1 onion");
        assert_eq!(draft.instructions, vec!["Chop", "Boil"]);
        assert_eq!(draft.prep_time, 15);
        assert_eq!(draft.cook_time, 20);
        assert_eq!(draft.servings, DEFAULT_SERVINGS);
        assert_eq!(draft.category, DEFAULT_CATEGORY);
        assert_eq!(draft.tags, vec!["warm", "easy"]);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let draft: RecipeDraft = serde_json::from_str("{}").unwrap();
        assert_eq!(draft.servings, 4);
        assert_eq!(draft.category, "Other");
        assert_eq!(draft.normalized().title, UNTITLED);
    }

    #[test]
    fn validation_rejects_empty_title_and_bad_servings() {
        let mut draft = RecipeDraft {
            title: "  ".into(),
            ..RecipeDraft::default()
        };
        assert!(validate_draft(&draft).is_err());

        draft.title = "Pasta".into();
        assert!(validate_draft(&draft).is_ok());

        draft.servings = 0;
        assert!(validate_draft(&draft).is_err());
    }

    #[test]
    fn times_are_bounded() {
        let mut draft = RecipeDraft {
            title: "Stock".into(),
            prep_time: MAX_MINUTES,
            cook_time: MAX_MINUTES,
            ..RecipeDraft::default()
        };
        assert!(validate_draft(&draft).is_ok());
        assert_eq!(draft.total_time(), 2 * MAX_MINUTES);

        draft.prep_time = i32::MAX;
        assert!(validate_draft(&draft).is_err());
        assert_eq!(draft.total_time(), i32::MAX);
        assert_eq!(draft.normalized().prep_time, MAX_MINUTES);
    }

    #[test]
    fn image_urls_must_be_links_or_plain_uploads() {
        assert!(is_valid_image_url(""));
        assert!(is_valid_image_url("https://example.com/soup.jpg"));
        assert!(is_valid_image_url("/api/uploads/12.png"));

        for bad in [
            "/api/uploads/../secret.txt",
            "/api/uploads/..",
            "/api/uploads/a/b.png",
            "/api/uploads/a\\b.png",
            "/api/uploads/",
            "/etc/passwd",
            "file:///etc/passwd",
            "javascript:alert(1)",
        ] {
            assert!(!is_valid_image_url(bad), "{bad}");
        }
        assert_eq!(upload_file_name("/api/uploads/12.png"), Some("12.png"));
        assert_eq!(upload_file_name("/api/uploads/../x"), None);
    }

    #[test]
    fn imported_drafts_lose_unsafe_image_urls() {
        let draft = RecipeDraft {
            image_url: "/api/uploads/../../etc/passwd".into(),
            ..RecipeDraft::default()
        };
        assert_eq!(draft.normalized().image_url, "");

        let draft = RecipeDraft {
            title: "Soup".into(),
            image_url: "/api/uploads/../x".into(),
            ..RecipeDraft::default()
        };
        assert!(validate_draft(&draft).is_err());
    }
}
