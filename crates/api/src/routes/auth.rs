//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /register                -> register (public)
/// POST   /login                   -> login (public)
/// GET    /me                      -> me
/// PUT    /me                      -> update_me
/// DELETE /me                      -> delete_me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/me",
            get(auth::me).put(auth::update_me).delete(auth::delete_me),
        )
}
