//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and partial updates where the API
//!   accepts them

pub mod cooking;
pub mod household;
pub mod llm_settings;
pub mod meal_plan;
pub mod notification;
pub mod prompt;
pub mod recipe;
pub mod share;
pub mod shopping_list;
pub mod user;
