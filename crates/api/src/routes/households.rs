//! Route definitions for the `/households` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::households;
use crate::state::AppState;

/// Routes mounted at `/households`.
///
/// Join-code management, joining by code and ownership transfer are
/// restricted to the owner by the handlers.
///
/// ```text
/// POST   /                        -> create_household
/// GET    /me                      -> get_my_household
/// GET    /members                 -> list_members
/// POST   /invite                  -> invite_member
/// POST   /leave                   -> leave_household
/// POST   /join-code               -> generate_code
/// DELETE /join-code               -> revoke_code
/// POST   /join                    -> join_by_code
/// POST   /transfer                -> transfer_ownership
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(households::create_household))
        .route("/me", get(households::get_my_household))
        .route("/members", get(households::list_members))
        .route("/invite", post(households::invite_member))
        .route("/leave", post(households::leave_household))
        .route(
            "/join-code",
            post(households::generate_code).delete(households::revoke_code),
        )
        .route("/join", post(households::join_by_code))
        .route("/transfer", post(households::transfer_ownership))
}
