//! Meal plans, shopping lists, the calendar export and cook mode.

use chrono::NaiveDate;
use kitchenry_core::types::{DbId, Feedback};
use serde::Serialize;
use serde_json::json;

use super::ApiClient;
use crate::error::ClientError;
use crate::models::{
    CookSession, CookingStats, MealPlan, Message, NewMealPlan, NewShoppingItem, SaveShoppingList,
    ShoppingItem, ShoppingItemUpdate, ShoppingList, Suggestion,
};

#[derive(Serialize)]
struct DateRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl ApiClient {
    // ---- meal plans ----

    /// Entries between `start` and `end`, both inclusive.
    pub async fn meal_plans(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MealPlan>, ClientError> {
        let range = DateRange {
            start_date: start,
            end_date: end,
        };
        self.get_query("/meal-plans", &range).await
    }

    pub async fn create_meal_plan(&self, plan: &NewMealPlan) -> Result<MealPlan, ClientError> {
        self.post("/meal-plans", plan).await
    }

    pub async fn delete_meal_plan(&self, id: DbId) -> Result<(), ClientError> {
        self.delete(&format!("/meal-plans/{id}")).await
    }

    /// The `.ics` calendar for a date range.
    pub async fn export_ical(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String, ClientError> {
        let range = DateRange {
            start_date: start,
            end_date: end,
        };
        self.get_text("/calendar/ical", &range).await
    }

    // ---- shopping lists ----

    pub async fn shopping_lists(&self) -> Result<Vec<ShoppingList>, ClientError> {
        self.get("/shopping-lists").await
    }

    pub async fn shopping_list(&self, id: DbId) -> Result<ShoppingList, ClientError> {
        self.get(&format!("/shopping-lists/{id}")).await
    }

    pub async fn create_shopping_list(
        &self,
        list: &SaveShoppingList,
    ) -> Result<ShoppingList, ClientError> {
        self.post("/shopping-lists", list).await
    }

    /// Replace a list's name and items.
    pub async fn update_shopping_list(
        &self,
        id: DbId,
        list: &SaveShoppingList,
    ) -> Result<ShoppingList, ClientError> {
        self.put(&format!("/shopping-lists/{id}"), list).await
    }

    pub async fn delete_shopping_list(&self, id: DbId) -> Result<(), ClientError> {
        self.delete(&format!("/shopping-lists/{id}")).await
    }

    /// Build a list from the ingredients of the given recipes.
    pub async fn shopping_list_from_recipes(
        &self,
        recipe_ids: &[DbId],
    ) -> Result<ShoppingList, ClientError> {
        self.post("/shopping-lists/from-recipes", recipe_ids).await
    }

    pub async fn add_shopping_item(
        &self,
        list_id: DbId,
        item: &NewShoppingItem,
    ) -> Result<ShoppingItem, ClientError> {
        self.post(&format!("/shopping-lists/{list_id}/items"), item)
            .await
    }

    pub async fn update_shopping_item(
        &self,
        list_id: DbId,
        item_id: DbId,
        update: &ShoppingItemUpdate,
    ) -> Result<ShoppingItem, ClientError> {
        self.put(&format!("/shopping-lists/{list_id}/items/{item_id}"), update)
            .await
    }

    pub async fn set_item_checked(
        &self,
        list_id: DbId,
        item_id: DbId,
        checked: bool,
    ) -> Result<ShoppingItem, ClientError> {
        let update = ShoppingItemUpdate {
            checked: Some(checked),
            ..ShoppingItemUpdate::default()
        };
        self.update_shopping_item(list_id, item_id, &update).await
    }

    pub async fn delete_shopping_item(
        &self,
        list_id: DbId,
        item_id: DbId,
    ) -> Result<(), ClientError> {
        self.delete(&format!("/shopping-lists/{list_id}/items/{item_id}"))
            .await
    }

    // ---- cook mode ----

    pub async fn tonight_suggestions(&self) -> Result<Vec<Suggestion>, ClientError> {
        self.get("/cooking/tonight").await
    }

    pub async fn start_cooking(&self, recipe_id: DbId) -> Result<CookSession, ClientError> {
        self.post("/cooking/session", &json!({ "recipe_id": recipe_id }))
            .await
    }

    pub async fn complete_cooking(
        &self,
        session_id: DbId,
        feedback: Feedback,
    ) -> Result<CookSession, ClientError> {
        self.post(
            &format!("/cooking/session/{session_id}/complete"),
            &json!({ "feedback": feedback }),
        )
        .await
    }

    /// Rate a recipe without a cooking session.
    pub async fn cooking_feedback(
        &self,
        recipe_id: DbId,
        feedback: Feedback,
    ) -> Result<Message, ClientError> {
        self.post(
            "/cooking/feedback",
            &json!({ "recipe_id": recipe_id, "feedback": feedback }),
        )
        .await
    }

    pub async fn cooking_stats(&self) -> Result<CookingStats, ClientError> {
        self.get("/cooking/stats").await
    }
}
