//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod cooking_repo;
pub mod favorite_repo;
pub mod household_repo;
pub mod llm_cache_repo;
pub mod llm_settings_repo;
pub mod meal_plan_repo;
pub mod notification_repo;
pub mod prompt_repo;
pub mod recipe_repo;
pub mod share_repo;
pub mod shopping_list_repo;
pub mod user_repo;

pub use cooking_repo::CookingRepo;
pub use favorite_repo::FavoriteRepo;
pub use household_repo::HouseholdRepo;
pub use llm_cache_repo::LlmCacheRepo;
pub use llm_settings_repo::LlmSettingsRepo;
pub use meal_plan_repo::MealPlanRepo;
pub use notification_repo::NotificationRepo;
pub use prompt_repo::PromptRepo;
pub use recipe_repo::RecipeRepo;
pub use share_repo::ShareRepo;
pub use shopping_list_repo::ShoppingListRepo;
pub use user_repo::UserRepo;
