/// Ollama HTTP client implementation.
///
/// This module provides `OllamaClient` for making synchronous chat requests to the Ollama API,
/// along with error types and builder patterns for configuration.
use std::time::Duration;

use thiserror::Error;

/// Default Ollama endpoint when neither the builder nor `OLLAMA_HOST` provide one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default chat model name sent with each request.
pub const DEFAULT_MODEL: &str = "qwen2.5:7b-instruct";

/// Default upper bound on a single chat call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when interacting with the Ollama API.
#[derive(Debug, Error)]
pub enum OllamaError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Ollama API-specific errors
    #[error("Ollama API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for OllamaError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// A single chat exchange sent to the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatRequest<'a> {
    /// Model name (e.g., "qwen2.5:7b-instruct")
    pub model: &'a str,
    /// Sampling temperature; kept low for repeatable answers
    pub temperature: f32,
    /// System instruction
    pub system: &'a str,
    /// User message
    pub user: &'a str,
}

/// Builder for constructing `OllamaClient` instances.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use ragdesk::ollama::OllamaClientBuilder;
///
/// let client = OllamaClientBuilder::new()
///     .base_url("http://localhost:11434")
///     .timeout(Duration::from_secs(5))
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug, Default)]
pub struct OllamaClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl OllamaClientBuilder {
    /// Creates a new `OllamaClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL for the Ollama API.
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL (e.g., "http://localhost:11434")
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the upper bound on a single chat call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `OllamaClient` with the configured settings.
    ///
    /// # Returns
    ///
    /// Returns `Ok(OllamaClient)` if the client was created successfully,
    /// or `Err(OllamaError)` if there was an error (e.g., invalid URL).
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, this method will check the `OLLAMA_HOST`
    /// environment variable. If not set, it defaults to [`DEFAULT_BASE_URL`].
    ///
    /// The model name is not part of the client; each [`ChatRequest`]
    /// names the model it is sent to.
    pub fn build(self) -> Result<OllamaClient, OllamaError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        let base_url = base_url.trim_end_matches('/').to_string();

        reqwest::Url::parse(&base_url)
            .map_err(|e| OllamaError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(CONNECT_TIMEOUT))
            .build()
            .map_err(OllamaError::Network)?;

        Ok(OllamaClient {
            client,
            base_url,
            timeout,
        })
    }
}

/// Synchronous HTTP client for the Ollama chat API.
///
/// Each call makes exactly one attempt, bounded by the configured timeout.
/// It should be constructed using `OllamaClientBuilder`.
pub struct OllamaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout: Duration,
}

/// Trait for the language-model collaborator.
///
/// This trait enables mocking in unit tests: the grounded answerer only ever
/// sends a request and receives a reply or a failure.
pub trait OllamaClientTrait: Send + Sync {
    /// Sends one chat exchange and returns the assistant's reply text.
    fn chat(&self, request: &ChatRequest<'_>) -> Result<String, OllamaError>;
}

impl OllamaClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn chat_internal(&self, request: &ChatRequest<'_>) -> Result<String, OllamaError> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&chat_request_body(request))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(OllamaError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(OllamaError::Serialization)?;
        parse_chat_response(&json)
    }
}

impl OllamaClientTrait for OllamaClient {
    fn chat(&self, request: &ChatRequest<'_>) -> Result<String, OllamaError> {
        self.chat_internal(request)
    }
}

fn chat_request_body(request: &ChatRequest<'_>) -> serde_json::Value {
    serde_json::json!({
        "model": request.model,
        "messages": [
            {"role": "system", "content": request.system},
            {"role": "user", "content": request.user},
        ],
        "stream": false,
        "options": {"temperature": request.temperature},
    })
}

/// Extracts `message.content` from an Ollama chat response.
fn parse_chat_response(json: &serde_json::Value) -> Result<String, OllamaError> {
    json.get("message")
        .and_then(|m| m.get("content"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| OllamaError::Api {
            message: "Missing 'message.content' field in API response".to_string(),
        })
}
