//! Bulk import of recipes exported from other apps.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kitchenry_core::import::{parse_platform, Platform};
use kitchenry_db::repositories::RecipeRepo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /import/platform`. `data` is either the export
/// file's text or the parsed JSON itself.
#[derive(Debug, Deserialize)]
pub struct PlatformImportRequest {
    pub platform: String,
    pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub imported: u64,
    pub errors: Vec<String>,
}

/// POST /api/import/platform
///
/// Recipes that cannot be read are reported in `errors`; the rest are
/// imported into the caller's household.
pub async fn import_platform(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<PlatformImportRequest>,
) -> AppResult<impl IntoResponse> {
    let platform: Platform = input.platform.parse()?;
    let document = match input.data {
        Value::String(text) => text,
        other => other.to_string(),
    };

    let outcome = parse_platform(platform, &document)?;
    if outcome.recipes.is_empty() && outcome.errors.is_empty() {
        return Err(AppError::validation("No recipes found in import data"));
    }

    let imported = RecipeRepo::create_many(
        &state.pool,
        user.id(),
        user.household_id(),
        &outcome.recipes,
    )
    .await?;

    tracing::info!(
        user_id = user.id(),
        platform = platform.as_str(),
        imported,
        failed = outcome.errors.len(),
        "Recipes imported",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ImportSummary {
                imported,
                errors: outcome.errors,
            },
        }),
    ))
}
