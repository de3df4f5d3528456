//! SQL rendering of [`Scope`] for household-shared tables.
//!
//! Tables using this carry both `household_id` (nullable) and `user_id`.

use kitchenry_core::types::{DbId, Scope};

/// `WHERE` fragment selecting the rows of `scope` from the table aliased
/// `alias`, together with the value to bind at `$placeholder`.
pub fn scope_filter(scope: Scope, alias: &str, placeholder: usize) -> (String, DbId) {
    match scope {
        Scope::Household(id) => (format!("{alias}.household_id = ${placeholder}"), id),
        Scope::Personal(user_id) => (
            format!("{alias}.household_id IS NULL AND {alias}.user_id = ${placeholder}"),
            user_id,
        ),
    }
}
