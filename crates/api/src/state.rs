use std::sync::Arc;

use crate::config::ServerConfig;
use crate::llm::LlmBackend;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: kitchenry_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Completion backend used by the AI endpoints.
    pub llm: Arc<dyn LlmBackend>,
    /// Shared HTTP client for outbound fetches (recipe pages, Ollama probes).
    pub http: reqwest::Client,
}
