//! iCalendar export of the meal plan.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;
use kitchenry_core::ical::{render_meal_calendar, CalendarEntry, ICS_FILENAME};
use kitchenry_db::repositories::MealPlanRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::query::DateRangeParams;
use crate::state::AppState;

/// GET /api/calendar/ical?start_date=&end_date=
///
/// Planned meals in the range as an `.ics` attachment.
pub async fn export_ical(
    user: CurrentUser,
    State(state): State<AppState>,
    Query(range): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    if range.end_date < range.start_date {
        return Err(AppError::validation("end_date must not be before start_date"));
    }

    let plans =
        MealPlanRepo::list_in_range(&state.pool, user.scope(), range.start_date, range.end_date)
            .await?;
    let entries: Vec<CalendarEntry> = plans
        .into_iter()
        .filter_map(|p| {
            Some(CalendarEntry {
                id: p.id,
                date: p.plan_date,
                meal_type: p.meal_type.parse().ok()?,
                recipe_title: p.recipe_title,
                notes: p.notes,
            })
        })
        .collect();

    let body = render_meal_calendar(&entries, Utc::now());

    tracing::info!(user_id = user.id(), events = entries.len(), "Calendar exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{ICS_FILENAME}\""),
            ),
        ],
        body,
    ))
}
