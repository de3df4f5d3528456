//! LLM gateway for the AI endpoints.
//!
//! Handlers call [`complete`], which resolves the user's provider settings,
//! applies their custom system prompt, consults the response cache and only
//! then reaches the [`LlmBackend`]. The backend is a trait object on
//! [`AppState`](crate::state::AppState) so tests can swap in a canned
//! implementation.

pub mod backend;

use kitchenry_core::error::CoreError;
use kitchenry_core::llm::{
    cache_key, default_prompt, LlmProfile, LlmProvider, PromptKind, DEFAULT_OLLAMA_MODEL,
    DEFAULT_OLLAMA_URL,
};
use kitchenry_core::types::DbId;
use kitchenry_db::repositories::{LlmCacheRepo, LlmSettingsRepo, PromptRepo};

pub use backend::HttpLlmBackend;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Server-wide LLM defaults. Hosted-provider API keys live only here, never
/// in per-user settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub default_provider: LlmProvider,
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
}

impl LlmConfig {
    /// Load LLM configuration from environment variables.
    ///
    /// | Env Var             | Default                    |
    /// |---------------------|----------------------------|
    /// | `LLM_PROVIDER`      | `ollama`                   |
    /// | `OLLAMA_URL`        | `http://localhost:11434`   |
    /// | `OLLAMA_MODEL`      | `llama3`                   |
    /// | `OPENAI_API_KEY`    | unset                      |
    /// | `OPENAI_MODEL`      | `gpt-4o`                   |
    /// | `ANTHROPIC_API_KEY` | unset                      |
    /// | `ANTHROPIC_MODEL`   | `claude-3-5-sonnet-latest` |
    ///
    /// # Panics
    ///
    /// Panics if `LLM_PROVIDER` names an unknown provider.
    pub fn from_env() -> Self {
        let default_provider = std::env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| "ollama".into())
            .parse()
            .expect("LLM_PROVIDER must be one of: openai, anthropic, ollama");

        Self {
            default_provider,
            ollama_url: env_or("OLLAMA_URL", DEFAULT_OLLAMA_URL),
            ollama_model: env_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            openai_api_key: env_key("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o"),
            anthropic_api_key: env_key("ANTHROPIC_API_KEY"),
            anthropic_model: env_or("ANTHROPIC_MODEL", "claude-3-5-sonnet-latest"),
        }
    }

    /// Model used for `provider` when the user has not chosen one.
    pub fn model_for(&self, provider: LlmProvider) -> &str {
        match provider {
            LlmProvider::OpenAi => &self.openai_model,
            LlmProvider::Anthropic => &self.anthropic_model,
            LlmProvider::Ollama => &self.ollama_model,
        }
    }

    pub fn has_api_key(&self, provider: LlmProvider) -> bool {
        match provider {
            LlmProvider::OpenAi => self.openai_api_key.is_some(),
            LlmProvider::Anthropic => self.anthropic_api_key.is_some(),
            LlmProvider::Ollama => true,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Backend seam
// ---------------------------------------------------------------------------

/// One completion call: system prompt, user prompt and model selection.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub profile: LlmProfile,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Errors from an LLM provider call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("AI request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("AI provider error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// A hosted provider was selected without its API key.
    #[error("No {0} API key configured")]
    NotConfigured(&'static str),

    /// The provider answered without any text.
    #[error("AI returned an empty response")]
    EmptyResponse,
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Core(CoreError::Upstream(err.to_string()))
    }
}

/// Something that turns prompts into model output.
#[async_trait::async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, request: &LlmRequest) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Effective provider selection for `user_id`: their stored settings, else
/// the server defaults. Hosted providers always use the server's model.
pub async fn resolve_profile(
    pool: &kitchenry_db::DbPool,
    config: &LlmConfig,
    user_id: DbId,
) -> Result<LlmProfile, sqlx::Error> {
    let settings = LlmSettingsRepo::find_by_user(pool, user_id).await?;

    let profile = match settings {
        Some(s) => {
            // Stored rows were validated on write; fall back if that changed.
            let provider = s.provider.parse().unwrap_or(config.default_provider);
            let (model, base_url) = match provider {
                LlmProvider::Ollama => (s.ollama_model, s.ollama_url),
                other => (config.model_for(other).to_string(), String::new()),
            };
            LlmProfile {
                provider,
                model,
                base_url,
            }
        }
        None => LlmProfile {
            provider: config.default_provider,
            model: config.model_for(config.default_provider).to_string(),
            base_url: match config.default_provider {
                LlmProvider::Ollama => config.ollama_url.clone(),
                _ => String::new(),
            },
        },
    };
    Ok(profile)
}

/// Run a completion of `kind` for `user_id`, served from the cache when the
/// same prompts were already answered by the same model.
pub async fn complete(
    state: &AppState,
    user_id: DbId,
    kind: PromptKind,
    user_prompt: String,
) -> AppResult<String> {
    let profile = resolve_profile(&state.pool, &state.config.llm, user_id).await?;
    let custom = PromptRepo::get(&state.pool, user_id).await?;
    let system_prompt = custom
        .get(kind)
        .unwrap_or_else(|| default_prompt(kind))
        .to_string();

    let key = cache_key(&system_prompt, &user_prompt, &profile);
    if let Some(cached) = LlmCacheRepo::get(&state.pool, &key).await? {
        tracing::debug!(user_id, kind = kind.as_str(), "LLM cache hit");
        return Ok(cached);
    }

    let request = LlmRequest {
        profile,
        system_prompt,
        user_prompt,
    };
    let response = state.llm.complete(&request).await?;

    LlmCacheRepo::put(
        &state.pool,
        &key,
        &response,
        request.profile.provider.as_str(),
        &request.profile.model,
    )
    .await?;

    tracing::info!(
        user_id,
        kind = kind.as_str(),
        provider = request.profile.provider.as_str(),
        "LLM completion stored",
    );
    Ok(response)
}
