//! Per-user LLM provider settings and the connection test.

use std::time::Duration;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use kitchenry_core::llm::{LlmProvider, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use kitchenry_core::types::DbId;
use kitchenry_db::repositories::LlmSettingsRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::llm::resolve_profile;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const CONNECTION_TEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateLlmSettings {
    pub provider: String,
    pub ollama_url: Option<String>,
    pub ollama_model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LlmSettingsView {
    pub provider: LlmProvider,
    pub ollama_url: String,
    pub ollama_model: String,
    pub available_providers: Vec<&'static str>,
    pub openai_configured: bool,
    pub anthropic_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ConnectionTest {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available_models: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn settings_view(state: &AppState, user_id: DbId) -> AppResult<LlmSettingsView> {
    let config = &state.config.llm;
    let stored = LlmSettingsRepo::find_by_user(&state.pool, user_id).await?;
    let (provider, ollama_url, ollama_model) = match stored {
        Some(s) => (
            s.provider.parse().unwrap_or(config.default_provider),
            s.ollama_url,
            s.ollama_model,
        ),
        None => (
            config.default_provider,
            config.ollama_url.clone(),
            config.ollama_model.clone(),
        ),
    };

    Ok(LlmSettingsView {
        provider,
        ollama_url,
        ollama_model,
        available_providers: LlmProvider::available(),
        openai_configured: config.has_api_key(LlmProvider::OpenAi),
        anthropic_configured: config.has_api_key(LlmProvider::Anthropic),
    })
}

/// GET /api/settings/llm
pub async fn get_llm_settings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let view = settings_view(&state, auth.user_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/settings/llm
///
/// `embedded` and unknown providers are rejected with 400.
pub async fn update_llm_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateLlmSettings>,
) -> AppResult<impl IntoResponse> {
    let provider: LlmProvider = input.provider.parse()?;

    let ollama_url = input
        .ollama_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_OLLAMA_URL);
    if !(ollama_url.starts_with("http://") || ollama_url.starts_with("https://")) {
        return Err(AppError::validation(
            "Ollama URL must start with http:// or https://",
        ));
    }
    let ollama_model = input
        .ollama_model
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_OLLAMA_MODEL);

    LlmSettingsRepo::upsert(
        &state.pool,
        auth.user_id,
        provider,
        ollama_url.trim_end_matches('/'),
        ollama_model,
    )
    .await?;

    tracing::info!(user_id = auth.user_id, provider = provider.as_str(), "LLM settings updated");

    let view = settings_view(&state, auth.user_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/settings/llm/test
///
/// Check the caller's effective provider. Ollama is probed over HTTP; hosted
/// providers only report whether the server has an API key.
pub async fn test_llm_connection(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let config = &state.config.llm;
    let profile = resolve_profile(&state.pool, config, auth.user_id).await?;

    let result = match profile.provider {
        LlmProvider::Ollama => probe_ollama(&state.http, &profile.base_url).await,
        LlmProvider::Anthropic => key_check(
            config.has_api_key(LlmProvider::Anthropic),
            "Anthropic",
            "ANTHROPIC_API_KEY",
        ),
        LlmProvider::OpenAi => key_check(
            config.has_api_key(LlmProvider::OpenAi),
            "OpenAI",
            "OPENAI_API_KEY",
        ),
    };

    tracing::info!(
        user_id = auth.user_id,
        provider = profile.provider.as_str(),
        success = result.success,
        "LLM connection tested",
    );

    Ok(Json(DataResponse { data: result }))
}

fn key_check(configured: bool, name: &str, env_var: &str) -> ConnectionTest {
    ConnectionTest {
        success: configured,
        message: if configured {
            format!("{name} API key configured")
        } else {
            format!("No {name} API key configured. Set {env_var} in environment.")
        },
        available_models: Vec::new(),
    }
}

async fn probe_ollama(client: &reqwest::Client, base_url: &str) -> ConnectionTest {
    let url = format!("{}/api/tags", base_url.trim_end_matches('/'));
    let response = client
        .get(&url)
        .timeout(CONNECTION_TEST_TIMEOUT)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status);

    let tags = match response {
        Ok(resp) => resp.json::<OllamaTags>().await,
        Err(e) => Err(e),
    };

    match tags {
        Ok(tags) => ConnectionTest {
            success: true,
            message: "Connected to Ollama".into(),
            available_models: ollama_model_names(tags.models.into_iter().map(|m| m.name)),
        },
        Err(e) => ConnectionTest {
            success: false,
            message: format!("Cannot reach Ollama at {base_url}: {e}"),
            available_models: Vec::new(),
        },
    }
}

/// Model names without their `:tag` suffix, deduplicated in order.
fn ollama_model_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let base = name.split(':').next().unwrap_or_default().to_string();
        if !base.is_empty() && !out.contains(&base) {
            out.push(base);
        }
    }
    out
}
