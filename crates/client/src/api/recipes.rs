//! Recipes, favorites, sharing and the recipe card.

use kitchenry_core::recipe::RecipeDraft;
use kitchenry_core::types::DbId;
use reqwest::multipart::{Form, Part};

use super::ApiClient;
use crate::error::ClientError;
use crate::models::{
    FavoriteState, ImageUpload, PrintView, Recipe, RecipeQuery, ScaledRecipe, ShareLink,
    SharedRecipe,
};

impl ApiClient {
    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        self.get("/categories").await
    }

    pub async fn recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, ClientError> {
        self.get_query("/recipes", query).await
    }

    pub async fn recipe(&self, id: DbId) -> Result<Recipe, ClientError> {
        self.get(&format!("/recipes/{id}")).await
    }

    pub async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, ClientError> {
        self.post("/recipes", draft).await
    }

    pub async fn update_recipe(
        &self,
        id: DbId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, ClientError> {
        self.put(&format!("/recipes/{id}"), draft).await
    }

    pub async fn delete_recipe(&self, id: DbId) -> Result<(), ClientError> {
        self.delete(&format!("/recipes/{id}")).await
    }

    /// Upload a photo for a recipe. `file_name` decides the stored extension.
    pub async fn upload_recipe_image(
        &self,
        id: DbId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImageUpload, ClientError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        self.post_multipart(&format!("/recipes/{id}/image"), form)
            .await
    }

    /// Export every visible recipe as portable JSON drafts.
    pub async fn export_recipes(&self) -> Result<Vec<RecipeDraft>, ClientError> {
        self.get("/recipes/export").await
    }

    pub async fn scaled_recipe(
        &self,
        id: DbId,
        servings: i32,
    ) -> Result<ScaledRecipe, ClientError> {
        self.get_query(&format!("/recipes/{id}/scaled"), &[("servings", servings)])
            .await
    }

    pub async fn print_view(&self, id: DbId) -> Result<PrintView, ClientError> {
        self.get(&format!("/recipes/{id}/print")).await
    }

    /// PNG recipe card, sized for social sharing.
    pub async fn recipe_card(&self, id: DbId) -> Result<Vec<u8>, ClientError> {
        self.get_bytes(&format!("/recipes/{id}/card")).await
    }

    // ---- favorites ----

    pub async fn toggle_favorite(&self, id: DbId) -> Result<FavoriteState, ClientError> {
        self.post_empty(&format!("/recipes/{id}/favorite")).await
    }

    pub async fn favorite_ids(&self) -> Result<Vec<DbId>, ClientError> {
        self.get("/favorites").await
    }

    pub async fn add_favorite(&self, recipe_id: DbId) -> Result<FavoriteState, ClientError> {
        self.post_empty(&format!("/favorites/{recipe_id}")).await
    }

    pub async fn remove_favorite(&self, recipe_id: DbId) -> Result<(), ClientError> {
        self.delete(&format!("/favorites/{recipe_id}")).await
    }

    // ---- sharing ----

    pub async fn share_recipe(&self, id: DbId) -> Result<ShareLink, ClientError> {
        self.post_empty(&format!("/recipes/{id}/share")).await
    }

    /// Read a shared recipe. Works without a session.
    pub async fn shared_recipe(&self, share_id: &str) -> Result<SharedRecipe, ClientError> {
        self.get(&format!("/shared/{share_id}")).await
    }
}
