//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `kitchenry_db` and the pure logic
//! in `kitchenry_core`, and map errors via [`AppError`](crate::error::AppError).

pub mod ai;
pub mod auth;
pub mod calendar;
pub mod cooking;
pub mod favorites;
pub mod homeassistant;
pub mod households;
pub mod import;
pub mod llm_settings;
pub mod meal_plans;
pub mod meta;
pub mod notifications;
pub mod prompts;
pub mod recipes;
pub mod shared;
pub mod shopping_lists;
