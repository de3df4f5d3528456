//! AI-assisted features, bulk import and server metadata.

use kitchenry_core::recipe::RecipeDraft;
use serde_json::{json, Value};

use super::ApiClient;
use crate::error::ClientError;
use crate::models::{AutoMealPlanRequest, FridgeSearchRequest, FridgeSearchResponse, ImportSummary};

impl ApiClient {
    /// Extract a recipe from a web page. The draft is not saved.
    pub async fn import_from_url(&self, url: &str) -> Result<RecipeDraft, ClientError> {
        self.post("/ai/import-url", &json!({ "url": url })).await
    }

    /// Extract a recipe from pasted text. The draft is not saved.
    pub async fn import_from_text(&self, text: &str) -> Result<RecipeDraft, ClientError> {
        self.post("/ai/import-text", &json!({ "text": text })).await
    }

    /// Propose a meal plan. The result is model output keyed by day; nothing
    /// is stored until the caller creates the entries it keeps.
    pub async fn auto_meal_plan(
        &self,
        request: &AutoMealPlanRequest,
    ) -> Result<Value, ClientError> {
        self.post("/ai/auto-meal-plan", request).await
    }

    pub async fn fridge_search(
        &self,
        request: &FridgeSearchRequest,
    ) -> Result<FridgeSearchResponse, ClientError> {
        self.post("/ai/fridge-search", request).await
    }

    /// Import recipes exported from another app (`paprika`, `json`, ...).
    /// `data` is the export file's JSON, or its text.
    pub async fn import_platform(
        &self,
        platform: &str,
        data: Value,
    ) -> Result<ImportSummary, ClientError> {
        self.post(
            "/import/platform",
            &json!({ "platform": platform, "data": data }),
        )
        .await
    }

    /// Public client configuration advertised by the server.
    pub async fn server_config(&self) -> Result<Value, ClientError> {
        self.get("/config").await
    }
}
