use axum::routing::get;
use axum::Router;

use crate::handlers::homeassistant;
use crate::state::AppState;

/// Routes mounted at `/homeassistant`, shaped for REST sensors.
///
/// ```text
/// GET    /config                  -> config (public)
/// GET    /today                   -> today
/// GET    /shopping                -> shopping
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/config", get(homeassistant::config))
        .route("/today", get(homeassistant::today))
        .route("/shopping", get(homeassistant::shopping))
}
