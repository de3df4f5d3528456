//! Push subscription and notification preference models.

use kitchenry_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Minutes before a meal at which the default reminder fires.
pub const DEFAULT_REMINDER_MINUTES: i32 = 30;

/// Notification preferences of one user. Users without a stored row get
/// [`NotificationSettings::default`].
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub meal_reminders: bool,
    /// Minutes before the meal.
    pub reminder_time: i32,
    pub shopping_reminders: bool,
    pub weekly_plan_reminder: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            meal_reminders: true,
            reminder_time: DEFAULT_REMINDER_MINUTES,
            shopping_reminders: true,
            weekly_plan_reminder: true,
        }
    }
}

/// A row from the `push_subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PushSubscription {
    pub id: DbId,
    pub user_id: DbId,
    pub subscription: serde_json::Value,
}
