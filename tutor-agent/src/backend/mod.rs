//! LLM Backend abstraction layer.
//!
//! Provides a trait-based interface over the inference services the tutor
//! can talk to:
//! - Google Gemini (`generateContent` REST API)
//! - OpenAI-compatible (OpenAI, Ollama, vLLM, etc.)
//! - Mock backend for testing

pub mod gemini;
pub mod mock;
pub mod openai;
pub mod traits;

use std::time::Duration;

use reqwest::{header, Client};

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use openai::OpenAiBackend;
pub use traits::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client shared by the network backends.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Unavailable(format!("HTTP client: {e}")))
}

/// Turn a non-success HTTP response into an error.
pub(crate) async fn error_for_status(response: reqwest::Response) -> LlmError {
    let status = response.status();
    let retry_after_ms = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs * 1000);
    let body = response.text().await.unwrap_or_default();

    match status.as_u16() {
        429 => LlmError::RateLimited { retry_after_ms },
        401 | 403 => LlmError::Unavailable(format!("HTTP {}: credential rejected", status)),
        _ => LlmError::RequestFailed(format!("HTTP {}: {}", status, body)),
    }
}
