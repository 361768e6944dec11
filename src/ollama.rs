/// Ollama HTTP client module.
///
/// This module provides a blocking HTTP client for the Ollama chat API,
/// including error handling and timeout configuration.
mod client;

pub use client::{
    ChatRequest, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, OllamaClient,
    OllamaClientBuilder, OllamaClientTrait, OllamaError,
};
