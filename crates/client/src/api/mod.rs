//! Typed HTTP client for the Kitchenry API.
//!
//! [`ApiClient`] owns the transport concerns shared by every resource:
//! base URL, bearer token, the `{ "data": ... }` envelope and error
//! extraction. Resource helpers live in the submodules as further
//! `impl ApiClient` blocks.
//!
//! A 401 from any call clears the stored session and sends the user to
//! [`LOGIN_PATH`] through the configured [`Navigator`]. Nothing is retried.

pub mod account;
pub mod ai;
pub mod households;
pub mod planning;
pub mod recipes;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{resolve_server_url, ClientConfig};
use crate::error::ClientError;
use crate::store::SessionStore;

/// Route the UI shows when the session is gone.
pub const LOGIN_PATH: &str = "/login";

/// Receives navigation requests from the client layer.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator for headless use; it only logs.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "Navigation requested");
    }
}

/// HTTP client bound to one backend and one session store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client for the backend resolved from `store` and `config`.
    ///
    /// Fails with [`ClientError::NotConfigured`] when no URL is known.
    pub fn new(
        store: Arc<dyn SessionStore>,
        config: &ClientConfig,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let base_url = resolve_server_url(store.as_ref(), config)?;
        if base_url.is_empty() {
            return Err(ClientError::NotConfigured);
        }
        Ok(Self::with_client(
            reqwest::Client::new(),
            base_url,
            store,
            navigator,
        ))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            store,
            navigator,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Absolute URL of an API path such as `/recipes`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    // ---- request plumbing ----

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = self.store.token()? {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    /// Send a request and map failure statuses to [`ClientError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);

        if status == StatusCode::UNAUTHORIZED {
            self.end_session();
            return Err(ClientError::Unauthorized(message));
        }

        tracing::debug!(status = status.as_u16(), %message, "API request failed");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Drop the stored credentials and route to the login page.
    fn end_session(&self) {
        if let Err(e) = self.store.clear_session() {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
        tracing::info!("Session rejected by server, redirecting to login");
        self.navigator.navigate(LOGIN_PATH);
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        let value: Value = serde_json::from_slice(&bytes)?;
        Ok(serde_json::from_value(unwrap_data(value))?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        Self::decode(response).await
    }

    pub(crate) async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::GET, path)?.query(query))
            .await?;
        Self::decode(response).await
    }

    /// GET a text body such as a calendar file.
    pub(crate) async fn get_text<Q>(&self, path: &str, query: &Q) -> Result<String, ClientError>
    where
        Q: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::GET, path)?.query(query))
            .await?;
        Ok(response.text().await?)
    }

    /// GET a binary body such as a rendered image.
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::POST, path)?.json(body))
            .await?;
        Self::decode(response).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let response = self.send(self.request(Method::POST, path)?).await?;
        Self::decode(response).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        let response = self
            .send(self.request(Method::POST, path)?.multipart(form))
            .await?;
        Self::decode(response).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::PUT, path)?.json(body))
            .await?;
        Self::decode(response).await
    }

    /// DELETE and discard whatever the server answers.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }
}

/// Strip the `{ "data": ... }` envelope when present.
fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Best-effort human message for a failed response.
///
/// Uses the `error` field of a JSON body (or `message`/`detail`), falling
/// back to the status reason.
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message", "detail"].iter().find_map(|key| {
                value
                    .get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| {
            format!(
                "Request failed: {}",
                status.canonical_reason().unwrap_or("unknown status")
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_is_unwrapped() {
        assert_eq!(unwrap_data(json!({"data": [1, 2]})), json!([1, 2]));
        assert_eq!(unwrap_data(json!({"data": null})), Value::Null);
        assert_eq!(unwrap_data(json!({"status": "ok"})), json!({"status": "ok"}));
        assert_eq!(unwrap_data(json!([1])), json!([1]));
    }

    #[test]
    fn error_message_prefers_error_field() {
        let body = r#"{"error":"Title is required","code":"VALIDATION_ERROR"}"#;
        assert_eq!(error_message(StatusCode::BAD_REQUEST, body), "Title is required");
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"detail":"model offline"}"#),
            "model offline"
        );
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Request failed: Internal Server Error"
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, r#"{"error":"  "}"#),
            "Request failed: Not Found"
        );
    }

    #[test]
    fn url_joins_api_prefix() {
        let client = ApiClient::with_client(
            reqwest::Client::new(),
            "http://kitchen.local:8001/",
            Arc::new(crate::store::MemoryStore::new()),
            Arc::new(LogNavigator),
        );
        assert_eq!(client.url("/recipes"), "http://kitchen.local:8001/api/recipes");
    }
}
