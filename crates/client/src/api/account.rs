//! Account, notification and per-user settings endpoints.

use serde_json::json;

use super::ApiClient;
use crate::error::ClientError;
use crate::models::{
    AuthSession, ConnectionTest, CustomPrompts, LlmSettings, Message, NotificationSettings,
    PromptsView, UpdateLlmSettings, UpdateProfile, User,
};

impl ApiClient {
    // ---- auth ----

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ClientError> {
        self.post(
            "/auth/register",
            &json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        self.post("/auth/login", &json!({ "email": email, "password": password }))
            .await
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        self.get("/auth/me").await
    }

    pub async fn update_me(&self, update: &UpdateProfile) -> Result<User, ClientError> {
        self.put("/auth/me", update).await
    }

    pub async fn delete_account(&self) -> Result<(), ClientError> {
        self.delete("/auth/me").await
    }

    // ---- notifications ----

    /// Register a browser push subscription (the raw `PushSubscription` JSON).
    pub async fn subscribe_push(
        &self,
        subscription: &serde_json::Value,
    ) -> Result<Message, ClientError> {
        self.post("/notifications/subscribe", subscription).await
    }

    pub async fn notification_settings(&self) -> Result<NotificationSettings, ClientError> {
        self.get("/notifications/settings").await
    }

    pub async fn update_notification_settings(
        &self,
        settings: &NotificationSettings,
    ) -> Result<NotificationSettings, ClientError> {
        self.put("/notifications/settings", settings).await
    }

    // ---- LLM settings and prompts ----

    pub async fn llm_settings(&self) -> Result<LlmSettings, ClientError> {
        self.get("/settings/llm").await
    }

    pub async fn update_llm_settings(
        &self,
        update: &UpdateLlmSettings,
    ) -> Result<LlmSettings, ClientError> {
        self.put("/settings/llm", update).await
    }

    pub async fn test_llm_connection(&self) -> Result<ConnectionTest, ClientError> {
        self.post_empty("/settings/llm/test").await
    }

    pub async fn prompts(&self) -> Result<PromptsView, ClientError> {
        self.get("/prompts").await
    }

    pub async fn update_prompts(
        &self,
        prompts: &CustomPrompts,
    ) -> Result<PromptsView, ClientError> {
        self.put("/prompts", prompts).await
    }

    pub async fn reset_prompts(&self) -> Result<(), ClientError> {
        self.delete("/prompts").await
    }
}
