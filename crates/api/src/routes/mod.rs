pub mod ai;
pub mod auth;
pub mod calendar;
pub mod cooking;
pub mod favorites;
pub mod health;
pub mod homeassistant;
pub mod households;
pub mod import;
pub mod meal_plans;
pub mod meta;
pub mod notifications;
pub mod recipes;
pub mod settings;
pub mod shared;
pub mod shopping_lists;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                  service health (public)
/// /categories                              recipe categories (public)
/// /config                                  client configuration (public)
///
/// /auth/register                           register (public)
/// /auth/login                              login (public)
/// /auth/me                                 get, update, delete account
///
/// /households                              create
/// /households/me                           caller's household
/// /households/members                      list members
/// /households/invite                       add a user by email
/// /households/leave                        leave
/// /households/join-code                    generate, revoke (owner)
/// /households/join                         join by code
/// /households/transfer                     transfer ownership (owner)
///
/// /recipes                                 list, create
/// /recipes/export                          export as JSON
/// /recipes/{id}                            get, update, delete
/// /recipes/{id}/image                      upload image (multipart)
/// /recipes/{id}/favorite                   toggle favorite
/// /recipes/{id}/scaled                     scaled ingredients
/// /recipes/{id}/print                      print view
/// /recipes/{id}/share                      create share link
/// /recipes/{id}/card                       PNG recipe card
///
/// /favorites                               list favorite ids
/// /favorites/{recipe_id}                   add, remove
///
/// /shared/{share_id}                       shared recipe (public)
///
/// /meal-plans                              list in range, create
/// /meal-plans/{id}                         delete
///
/// /shopping-lists                          list, create
/// /shopping-lists/from-recipes             generate from recipes
/// /shopping-lists/{id}                     get, update, delete
/// /shopping-lists/{id}/items               append item
/// /shopping-lists/{id}/items/{item_id}     update, delete item
///
/// /calendar/ical                           iCalendar export
///
/// /cooking/tonight                         tonight's suggestions
/// /cooking/session                         start session
/// /cooking/session/{id}/complete           complete session
/// /cooking/feedback                        quick feedback
/// /cooking/stats                           cooking statistics
///
/// /notifications/subscribe                 push subscription
/// /notifications/settings                  get, update
///
/// /settings/llm                            get, update provider settings
/// /settings/llm/test                       connection test
/// /prompts                                 get, update, reset custom prompts
///
/// /ai/import-url                           extract recipe from a web page
/// /ai/import-text                          extract recipe from text
/// /ai/auto-meal-plan                       generate a meal plan
/// /ai/fridge-search                        match recipes to ingredients
///
/// /import/platform                         bulk import from other apps
///
/// /homeassistant/config                    REST sensor configuration (public)
/// /homeassistant/today                     today's meals
/// /homeassistant/shopping                  unchecked shopping items
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(meta::router())
        .merge(settings::router())
        .nest("/auth", auth::router())
        .nest("/households", households::router())
        .nest("/recipes", recipes::router(config.max_upload_bytes))
        .nest("/favorites", favorites::router())
        .nest("/shared", shared::router())
        .nest("/meal-plans", meal_plans::router())
        .nest("/shopping-lists", shopping_lists::router())
        .nest("/calendar", calendar::router())
        .nest("/cooking", cooking::router())
        .nest("/notifications", notifications::router())
        .nest("/ai", ai::router())
        .nest("/import", import::router())
        .nest("/homeassistant", homeassistant::router())
}
