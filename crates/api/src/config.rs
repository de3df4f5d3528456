use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;
use crate::llm::LlmConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory recipe images are written to and served from.
    pub upload_dir: PathBuf,
    /// Built single-page app to serve at `/`, if any.
    pub static_dir: Option<PathBuf>,
    /// Largest accepted request body for image uploads.
    pub max_upload_bytes: usize,
    /// Lifetime of public share links.
    pub share_expiry_days: i64,
    /// Lifetime of household join codes.
    pub join_code_expiry_days: i64,
    /// Age after which cached LLM responses are purged.
    pub llm_cache_ttl_days: i64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Server-wide LLM defaults and API keys.
    pub llm: LlmConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `8001`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `UPLOAD_DIR`            | `uploads`               |
    /// | `STATIC_DIR`            | unset                   |
    /// | `MAX_UPLOAD_BYTES`      | `10485760`              |
    /// | `SHARE_EXPIRY_DAYS`     | `30`                    |
    /// | `JOIN_CODE_EXPIRY_DAYS` | `7`                     |
    /// | `LLM_CACHE_TTL_DAYS`    | `30`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let share_expiry_days = env_days("SHARE_EXPIRY_DAYS", 30);
        let join_code_expiry_days = env_days("JOIN_CODE_EXPIRY_DAYS", 7);
        let llm_cache_ttl_days = env_days("LLM_CACHE_TTL_DAYS", 30);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            static_dir,
            max_upload_bytes,
            share_expiry_days,
            join_code_expiry_days,
            llm_cache_ttl_days,
            jwt: JwtConfig::from_env(),
            llm: LlmConfig::from_env(),
        }
    }
}

fn env_days(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{name} must be a valid number of days"))
}
