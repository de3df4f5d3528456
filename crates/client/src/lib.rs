//! Client library for the Kitchenry API.
//!
//! Provides the typed [`api::ApiClient`], persistent client state
//! ([`store`]), backend URL resolution ([`config`]) and the session state
//! machine ([`auth::AuthContext`]) that front ends build on.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
