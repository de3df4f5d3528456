//! Household membership and ownership.

use kitchenry_core::types::DbId;
use serde_json::json;

use super::ApiClient;
use crate::error::ClientError;
use crate::models::{Household, JoinCode, Message, User};

impl ApiClient {
    pub async fn create_household(&self, name: &str) -> Result<Household, ClientError> {
        self.post("/households", &json!({ "name": name })).await
    }

    /// The caller's household, `None` when they have not joined one.
    pub async fn my_household(&self) -> Result<Option<Household>, ClientError> {
        self.get("/households/me").await
    }

    pub async fn household_members(&self) -> Result<Vec<User>, ClientError> {
        self.get("/households/members").await
    }

    /// Add an existing user, found by email, to the caller's household.
    pub async fn invite_member(&self, email: &str) -> Result<Household, ClientError> {
        self.post("/households/invite", &json!({ "email": email }))
            .await
    }

    pub async fn leave_household(&self) -> Result<Message, ClientError> {
        self.post_empty("/households/leave").await
    }

    pub async fn generate_join_code(&self) -> Result<JoinCode, ClientError> {
        self.post_empty("/households/join-code").await
    }

    pub async fn revoke_join_code(&self) -> Result<(), ClientError> {
        self.delete("/households/join-code").await
    }

    pub async fn join_household(&self, join_code: &str) -> Result<Household, ClientError> {
        self.post("/households/join", &json!({ "join_code": join_code }))
            .await
    }

    pub async fn transfer_ownership(&self, user_id: DbId) -> Result<Household, ClientError> {
        self.post("/households/transfer", &json!({ "user_id": user_id }))
            .await
    }
}
