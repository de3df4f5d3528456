//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the user id from a JWT Bearer token.
//! - [`auth::CurrentUser`] -- Additionally loads the user row, for handlers
//!   that need the household scope.

pub mod auth;
