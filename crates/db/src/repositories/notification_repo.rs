//! Repository for the `push_subscriptions` and `notification_settings`
//! tables.

use kitchenry_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::NotificationSettings;

/// Push subscriptions and notification preferences.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Store the browser push subscription of a user, replacing any previous
    /// one.
    pub async fn upsert_subscription(
        pool: &PgPool,
        user_id: DbId,
        subscription: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO push_subscriptions (user_id, subscription) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_push_subscriptions_user_id \
             DO UPDATE SET subscription = EXCLUDED.subscription",
        )
        .bind(user_id)
        .bind(subscription)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Stored preferences, or the defaults if the user never saved any.
    pub async fn get_settings(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<NotificationSettings, sqlx::Error> {
        let settings = sqlx::query_as::<_, NotificationSettings>(
            "SELECT enabled, meal_reminders, reminder_time, shopping_reminders, \
                    weekly_plan_reminder \
             FROM notification_settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(settings.unwrap_or_default())
    }

    pub async fn upsert_settings(
        pool: &PgPool,
        user_id: DbId,
        settings: &NotificationSettings,
    ) -> Result<NotificationSettings, sqlx::Error> {
        sqlx::query_as::<_, NotificationSettings>(
            "INSERT INTO notification_settings \
                (user_id, enabled, meal_reminders, reminder_time, shopping_reminders, \
                 weekly_plan_reminder) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT ON CONSTRAINT uq_notification_settings_user_id DO UPDATE SET \
                enabled = EXCLUDED.enabled, \
                meal_reminders = EXCLUDED.meal_reminders, \
                reminder_time = EXCLUDED.reminder_time, \
                shopping_reminders = EXCLUDED.shopping_reminders, \
                weekly_plan_reminder = EXCLUDED.weekly_plan_reminder \
             RETURNING enabled, meal_reminders, reminder_time, shopping_reminders, \
                       weekly_plan_reminder",
        )
        .bind(user_id)
        .bind(settings.enabled)
        .bind(settings.meal_reminders)
        .bind(settings.reminder_time)
        .bind(settings.shopping_reminders)
        .bind(settings.weekly_plan_reminder)
        .fetch_one(pool)
        .await
    }
}
