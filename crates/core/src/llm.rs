//! Provider-independent pieces of the AI features: provider names, prompt
//! defaults, prompt construction, response cleanup and cache keys.
//!
//! The HTTP calls themselves live in the API crate.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::recipe::RecipeDraft;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Page or pasted text is cut to this many characters before prompting so
/// small local models keep within their context window.
pub const MAX_SOURCE_CHARS: usize = 3_000;

/// Fewest recipes needed before a meal plan can be generated.
pub const MIN_RECIPES_FOR_PLAN: usize = 3;

/// Most recipes summarised into a meal-plan prompt.
pub const MAX_PLAN_RECIPES: usize = 30;

/// Most recipes summarised into a fridge-search prompt.
pub const MAX_FRIDGE_RECIPES: usize = 25;

/// Ingredient names per recipe in a fridge-search prompt.
pub const MAX_FRIDGE_INGREDIENTS: usize = 10;

pub const DEFAULT_PLAN_DAYS: u32 = 7;
pub const MAX_PLAN_DAYS: u32 = 14;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// Elements whose content never belongs to a recipe.
const NOISE_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

static NOISE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    NOISE_TAGS
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).expect("valid regex"))
        .collect()
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Hosted or local model backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
    Ollama,
}

impl LlmProvider {
    pub const ALL: [LlmProvider; 3] = [
        LlmProvider::OpenAi,
        LlmProvider::Anthropic,
        LlmProvider::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Ollama => "ollama",
        }
    }

    pub fn available() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.as_str()).collect()
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" => Ok(LlmProvider::Anthropic),
            "ollama" => Ok(LlmProvider::Ollama),
            "embedded" => Err(CoreError::Validation(
                "The embedded model is not available on this server. \
                 Please use 'openai', 'anthropic', or 'ollama'."
                    .into(),
            )),
            other => Err(CoreError::Validation(format!(
                "Unknown LLM provider '{other}'. Must be one of: openai, anthropic, ollama"
            ))),
        }
    }
}

impl TryFrom<String> for LlmProvider {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LlmProvider> for String {
    fn from(value: LlmProvider) -> Self {
        value.as_str().to_string()
    }
}

/// The effective model selection for one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LlmProfile {
    pub provider: LlmProvider,
    /// Model name for the selected provider.
    pub model: String,
    /// Base URL, only meaningful for Ollama.
    pub base_url: String,
}

/// Cache key for a completion: SHA-256 over the prompts and the model
/// selection, hex encoded.
pub fn cache_key(system_prompt: &str, user_prompt: &str, profile: &LlmProfile) -> String {
    let mut hasher = Sha256::new();
    hasher.update(system_prompt.as_bytes());
    hasher.update(b"|");
    hasher.update(user_prompt.as_bytes());
    hasher.update(b"|");
    hasher.update(profile.provider.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(profile.model.as_bytes());
    if profile.provider == LlmProvider::Ollama {
        hasher.update(b"|");
        hasher.update(profile.base_url.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// The three user-customisable system prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    RecipeExtraction,
    MealPlanning,
    FridgeSearch,
}

impl PromptKind {
    pub const ALL: [PromptKind; 3] = [
        PromptKind::RecipeExtraction,
        PromptKind::MealPlanning,
        PromptKind::FridgeSearch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::RecipeExtraction => "recipe_extraction",
            PromptKind::MealPlanning => "meal_planning",
            PromptKind::FridgeSearch => "fridge_search",
        }
    }
}

const RECIPE_EXTRACTION_PROMPT: &str = r#"You are a recipe extraction assistant. Extract recipe information from the provided content and return ONLY valid JSON.
Return exactly this format (no markdown, no explanation):
{
  "title": "Recipe Name",
  "description": "Brief description",
  "ingredients": [{"name": "ingredient", "amount": "1", "unit": "cup"}],
  "instructions": ["Step 1", "Step 2"],
  "prep_time": 15,
  "cook_time": 30,
  "servings": 4,
  "category": "Dinner",
  "tags": ["tag1", "tag2"]
}
Categories: Breakfast, Lunch, Dinner, Dessert, Appetizer, Snack, Beverage, Other"#;

const MEAL_PLANNING_PROMPT: &str = r#"You are a meal planning assistant. Create a balanced meal plan using the available recipes.
Return ONLY valid JSON in this format:
{
  "plan": [
    {"day": 0, "meals": [
      {"meal_type": "Breakfast", "recipe_id": 1, "recipe_title": "title"},
      {"meal_type": "Lunch", "recipe_id": 2, "recipe_title": "title"},
      {"meal_type": "Dinner", "recipe_id": 3, "recipe_title": "title"}
    ]}
  ],
  "notes": "Brief explanation of the plan"
}
Include one entry per requested day (day 0 = today).
Consider variety, nutrition balance, and user preferences. Use actual recipe IDs from the provided list."#;

const FRIDGE_SEARCH_PROMPT: &str = r#"You are a recipe assistant. Given a list of available ingredients, suggest ONE new simple recipe that uses them (allowing for common pantry staples).

Return ONLY valid JSON in this format (no markdown, no explanation):
{
  "ai_suggestion": {
    "title": "Recipe Name",
    "description": "Brief description",
    "ingredients": [{"name": "ingredient", "amount": "1", "unit": "cup"}],
    "instructions": ["Step 1", "Step 2"],
    "prep_time": 10,
    "cook_time": 20,
    "servings": 2,
    "category": "Dinner",
    "tags": []
  }
}"#;

/// Built-in system prompt for `kind`.
pub fn default_prompt(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::RecipeExtraction => RECIPE_EXTRACTION_PROMPT,
        PromptKind::MealPlanning => MEAL_PLANNING_PROMPT,
        PromptKind::FridgeSearch => FRIDGE_SEARCH_PROMPT,
    }
}

/// User prompt for extracting a recipe from a fetched web page.
pub fn page_extraction_prompt(page_text: &str) -> String {
    format!("Extract recipe from:\n{}", truncate_chars(page_text, MAX_SOURCE_CHARS))
}

/// User prompt for extracting a recipe from pasted text.
pub fn text_extraction_prompt(text: &str) -> String {
    format!("Parse this recipe:\n{}", truncate_chars(text, MAX_SOURCE_CHARS))
}

/// Compact recipe listing used in the meal-plan prompt.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub category: String,
}

pub fn meal_plan_prompt(
    days: u32,
    preferences: &str,
    exclude: &[i64],
    recipes: &[RecipeSummary],
) -> String {
    let preferences = if preferences.trim().is_empty() {
        "balanced variety"
    } else {
        preferences.trim()
    };
    let exclude = if exclude.is_empty() {
        "none".to_string()
    } else {
        exclude.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
    };
    let listing = serde_json::to_string(&recipes[..recipes.len().min(MAX_PLAN_RECIPES)])
        .unwrap_or_else(|_| "[]".into());

    format!(
        "Create a {days}-day meal plan.\nPreferences: {preferences}\nExclude recipes: {exclude}\n\nAvailable recipes:\n{listing}"
    )
}

pub fn fridge_idea_prompt(ingredients: &[String]) -> String {
    format!(
        "I have these ingredients: {}. Suggest a simple recipe I can make.",
        ingredients.join(", ")
    )
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

/// Strip a surrounding markdown code fence (with optional language tag).
pub fn clean_llm_json(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest,
        };
        text = text.trim_end();
        if let Some(body) = text.strip_suffix("```") {
            text = body;
        }
    }
    text.trim()
}

/// Parse a model response as a JSON object.
pub fn parse_llm_object(raw: &str) -> Result<Value, CoreError> {
    let cleaned = clean_llm_json(raw);
    if cleaned.is_empty() {
        return Err(CoreError::Upstream("AI returned an empty response".into()));
    }
    match serde_json::from_str::<Value>(cleaned) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(CoreError::Upstream("AI response was not a JSON object".into())),
        Err(e) => Err(CoreError::Upstream(format!("AI response was not valid JSON: {e}"))),
    }
}

/// Parse a recipe-extraction response.
pub fn parse_recipe_response(raw: &str) -> Result<RecipeDraft, CoreError> {
    let value = parse_llm_object(raw)?;
    let draft: RecipeDraft = serde_json::from_value(value)
        .map_err(|e| CoreError::Upstream(format!("Failed to parse recipe data: {e}")))?;
    Ok(draft.normalized())
}

/// Pull a recipe idea out of a fridge-search response. Accepts either the
/// `{"ai_suggestion": {...}}` wrapper or a bare recipe object.
pub fn parse_fridge_idea(raw: &str) -> Result<Option<RecipeDraft>, CoreError> {
    let value = parse_llm_object(raw)?;
    let candidate = match value.get("ai_suggestion") {
        Some(Value::Null) => return Ok(None),
        Some(inner) => inner.clone(),
        None if value.get("title").is_some() => value,
        None => return Ok(None),
    };
    let draft: RecipeDraft = serde_json::from_value(candidate)
        .map_err(|e| CoreError::Upstream(format!("Failed to parse suggested recipe: {e}")))?;
    Ok(Some(draft.normalized()))
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// First `max` characters of `text`, on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Visible text of an HTML page, one trimmed line per text run. Scripts,
/// styles and page chrome (nav, header, footer) are dropped.
pub fn html_to_text(html: &str) -> String {
    let mut cleaned = COMMENT_RE.replace_all(html, " ").into_owned();
    for re in NOISE_RES.iter() {
        cleaned = re.replace_all(&cleaned, " ").into_owned();
    }
    let text = TAG_RE.replace_all(&cleaned, "\n");

    decode_entities(&text)
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
