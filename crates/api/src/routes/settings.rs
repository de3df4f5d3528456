//! Per-user LLM provider settings and custom prompts.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{llm_settings, prompts};
use crate::state::AppState;

/// Routes merged at the `/api` root.
///
/// ```text
/// GET    /settings/llm            -> get_llm_settings
/// PUT    /settings/llm            -> update_llm_settings
/// POST   /settings/llm/test       -> test_llm_connection
/// GET    /prompts                 -> get_prompts
/// PUT    /prompts                 -> update_prompts
/// DELETE /prompts                 -> reset_prompts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/settings/llm",
            get(llm_settings::get_llm_settings).put(llm_settings::update_llm_settings),
        )
        .route("/settings/llm/test", post(llm_settings::test_llm_connection))
        .route(
            "/prompts",
            get(prompts::get_prompts)
                .put(prompts::update_prompts)
                .delete(prompts::reset_prompts),
        )
}
