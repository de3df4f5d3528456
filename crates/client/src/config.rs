//! Backend URL resolution.

use crate::error::ClientError;
use crate::store::{SessionStore, StoreKey};

/// Backend URL baked in at compile time, if any.
pub const BUILD_BACKEND_URL: Option<&str> = option_env!("KITCHENRY_BACKEND_URL");

/// Client-side configuration supplied by the host application.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// URL injected at runtime (for example by the page that embeds the app).
    pub runtime_url: Option<String>,
}

impl ClientConfig {
    pub fn with_runtime_url(url: impl Into<String>) -> Self {
        Self {
            runtime_url: Some(url.into()),
        }
    }
}

/// Resolve the backend base URL.
///
/// Priority: the override saved in the store, then the runtime-injected
/// value, then [`BUILD_BACKEND_URL`]. Blank candidates and unreplaced
/// deployment placeholders (`__BACKEND_URL__`) are skipped; the result has no
/// trailing slash and is empty when nothing is configured.
pub fn resolve_server_url(
    store: &dyn SessionStore,
    config: &ClientConfig,
) -> Result<String, ClientError> {
    let stored = store.get(StoreKey::ServerUrl)?;
    Ok(pick_server_url(
        stored.as_deref(),
        config.runtime_url.as_deref(),
        BUILD_BACKEND_URL,
    ))
}

fn pick_server_url(stored: Option<&str>, runtime: Option<&str>, build: Option<&str>) -> String {
    [stored, runtime, build]
        .into_iter()
        .flatten()
        .map(|url| url.trim().trim_end_matches('/'))
        .find(|url| !url.is_empty() && !url.starts_with("__"))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn stored_override_wins() {
        assert_eq!(
            pick_server_url(Some("http://saved/"), Some("http://runtime"), Some("http://build")),
            "http://saved"
        );
    }

    #[test]
    fn blank_values_fall_through() {
        assert_eq!(
            pick_server_url(Some("  "), Some(""), Some("http://build")),
            "http://build"
        );
        assert_eq!(pick_server_url(None, Some("http://runtime"), None), "http://runtime");
        assert_eq!(pick_server_url(None, None, None), "");
    }

    #[test]
    fn placeholders_are_ignored() {
        assert_eq!(
            pick_server_url(None, Some("__BACKEND_URL__"), Some("http://build")),
            "http://build"
        );
    }

    #[test]
    fn resolves_from_store_then_config() {
        let store = MemoryStore::new();
        let config = ClientConfig::with_runtime_url("http://runtime:8001/");
        assert_eq!(
            resolve_server_url(&store, &config).unwrap(),
            "http://runtime:8001"
        );

        store.set(StoreKey::ServerUrl, "http://override").unwrap();
        assert_eq!(resolve_server_url(&store, &config).unwrap(), "http://override");
    }
}
