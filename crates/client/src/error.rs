//! Errors surfaced by the API client.

/// Errors from the client layer.
///
/// Every failed request rejects to the caller; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status other than 401.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Best-effort message extracted from the response body.
        message: String,
    },

    /// The server rejected the credentials. The local session has already
    /// been cleared when this is returned.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No backend URL could be resolved.
    #[error("No server URL configured")]
    NotConfigured,

    /// Reading or writing the session store failed.
    #[error("Session store error: {0}")]
    Store(String),

    /// A response body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of the failure, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
