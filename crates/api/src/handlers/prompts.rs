//! Per-user overrides of the AI system prompts.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kitchenry_core::llm::{default_prompt, PromptKind};
use kitchenry_db::models::prompt::CustomPrompts;
use kitchenry_db::repositories::PromptRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Stored overrides next to the built-in defaults, so the editor can show
/// and restore either.
#[derive(Debug, Serialize)]
pub struct PromptsView {
    pub custom: CustomPrompts,
    pub defaults: BTreeMap<&'static str, &'static str>,
}

fn view(custom: CustomPrompts) -> PromptsView {
    PromptsView {
        custom,
        defaults: PromptKind::ALL
            .iter()
            .map(|k| (k.as_str(), default_prompt(*k)))
            .collect(),
    }
}

/// GET /api/prompts
pub async fn get_prompts(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let custom = PromptRepo::get(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: view(custom) }))
}

/// PUT /api/prompts
///
/// Omitted fields keep their stored value.
pub async fn update_prompts(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CustomPrompts>,
) -> AppResult<impl IntoResponse> {
    let custom = PromptRepo::upsert(&state.pool, auth.user_id, &input).await?;

    tracing::info!(user_id = auth.user_id, "Custom prompts updated");

    Ok(Json(DataResponse { data: view(custom) }))
}

/// DELETE /api/prompts
///
/// Drop every override and go back to the defaults.
pub async fn reset_prompts(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    PromptRepo::reset(&state.pool, auth.user_id).await?;

    tracing::info!(user_id = auth.user_id, "Custom prompts reset");

    Ok(StatusCode::NO_CONTENT)
}
