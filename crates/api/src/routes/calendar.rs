use axum::routing::get;
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// Routes mounted at `/calendar`.
///
/// ```text
/// GET    /ical?start_date&end_date -> export_ical
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/ical", get(calendar::export_ical))
}
