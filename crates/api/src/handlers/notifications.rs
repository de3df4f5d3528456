//! Push subscription and notification preference handlers.
//!
//! Delivery of push messages is left to the service worker's push provider;
//! the server only stores what the browser hands it.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use kitchenry_db::models::notification::NotificationSettings;
use kitchenry_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Longest accepted reminder lead time (one day).
const MAX_REMINDER_MINUTES: i32 = 24 * 60;

/// POST /api/notifications/subscribe
///
/// Store the browser's `PushSubscription` JSON, replacing any earlier one.
pub async fn subscribe(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(subscription): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let has_endpoint = subscription
        .get("endpoint")
        .and_then(|e| e.as_str())
        .is_some_and(|e| !e.is_empty());
    if !has_endpoint {
        return Err(AppError::validation("Subscription must include an endpoint"));
    }

    NotificationRepo::upsert_subscription(&state.pool, auth.user_id, &subscription).await?;

    tracing::info!(user_id = auth.user_id, "Push subscription stored");

    Ok(Json(MessageResponse::new("Subscribed to notifications")))
}

/// GET /api/notifications/settings
pub async fn get_settings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let settings = NotificationRepo::get_settings(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/notifications/settings
pub async fn update_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<NotificationSettings>,
) -> AppResult<impl IntoResponse> {
    if !(0..=MAX_REMINDER_MINUTES).contains(&input.reminder_time) {
        return Err(AppError::validation(format!(
            "reminder_time must be between 0 and {MAX_REMINDER_MINUTES} minutes"
        )));
    }

    let settings = NotificationRepo::upsert_settings(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        enabled = settings.enabled,
        "Notification settings updated",
    );

    Ok(Json(DataResponse { data: settings }))
}
