//! HTTP implementation of [`LlmBackend`] for Ollama, OpenAI and Anthropic.

use std::time::Duration;

use kitchenry_core::llm::LlmProvider;
use serde::Deserialize;
use serde_json::json;

use super::{LlmBackend, LlmConfig, LlmError, LlmRequest};

/// Local models can be slow to load; hosted APIs answer well inside this.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 2000;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Calls the provider named in each request's profile.
pub struct HttpLlmBackend {
    client: reqwest::Client,
    config: LlmConfig,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicBlock {
    #[serde(default)]
    text: Option<String>,
}

impl HttpLlmBackend {
    /// Create a backend reusing an existing [`reqwest::Client`].
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    async fn ollama(&self, request: &LlmRequest) -> Result<String, LlmError> {
        let base = request.profile.base_url.trim_end_matches('/');
        let prompt = format!(
            "{}\n\nUser: {}\n\nAssistant:",
            request.system_prompt, request.user_prompt
        );
        let body = json!({
            "model": request.profile.model,
            "prompt": prompt,
            "stream": false,
            "options": { "temperature": TEMPERATURE, "num_predict": MAX_TOKENS },
        });

        let response = self
            .client
            .post(format!("{base}/api/generate"))
            .timeout(COMPLETION_TIMEOUT)
            .json(&body)
            .send()
            .await?;
        let parsed: OllamaResponse = Self::ensure_success(response).await?.json().await?;
        Ok(parsed.response)
    }

    async fn openai(&self, request: &LlmRequest) -> Result<String, LlmError> {
        let key = self
            .config
            .openai_api_key
            .as_deref()
            .ok_or(LlmError::NotConfigured("OpenAI"))?;
        let body = json!({
            "model": request.profile.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .client
            .post(OPENAI_URL)
            .timeout(COMPLETION_TIMEOUT)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;
        let parsed: OpenAiResponse = Self::ensure_success(response).await?.json().await?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    async fn anthropic(&self, request: &LlmRequest) -> Result<String, LlmError> {
        let key = self
            .config
            .anthropic_api_key
            .as_deref()
            .ok_or(LlmError::NotConfigured("Anthropic"))?;
        let body = json!({
            "model": request.profile.model,
            "system": request.system_prompt,
            "messages": [{ "role": "user", "content": request.user_prompt }],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .client
            .post(ANTHROPIC_URL)
            .timeout(COMPLETION_TIMEOUT)
            .header("x-api-key", key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;
        let parsed: AnthropicResponse = Self::ensure_success(response).await?.json().await?;
        Ok(parsed
            .content
            .into_iter()
            .filter_map(|b| b.text)
            .collect::<Vec<_>>()
            .join(""))
    }

    /// Return the response unchanged on success, or an
    /// [`LlmError::ApiError`] carrying the status and body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl LlmBackend for HttpLlmBackend {
    async fn complete(&self, request: &LlmRequest) -> Result<String, LlmError> {
        let text = match request.profile.provider {
            LlmProvider::Ollama => self.ollama(request).await?,
            LlmProvider::OpenAi => self.openai(request).await?,
            LlmProvider::Anthropic => self.anthropic(request).await?,
        };
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}
