//! Google Gemini backend.
//!
//! Talks to the Generative Language REST API:
//! `POST {base_url}/models/{model}:generateContent`, authenticated with the
//! `x-goog-api-key` header. Response schemas are passed through as
//! `generationConfig.responseSchema`, so the model itself is constrained to
//! the level shape.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::*;
use super::{error_for_status, http_client};

/// Public Generative Language API endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini backend.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    /// Create a backend against `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential);
        }

        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

/// `generateContent` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

fn text_content(role: &str, text: &str) -> Content {
    Content {
        role: Some(role.to_string()),
        parts: vec![Part {
            text: Some(text.to_string()),
        }],
    }
}

fn build_request(request: &CompletionRequest) -> GenerateRequest {
    let mut generation_config = GenerationConfig {
        temperature: request.temperature,
        max_output_tokens: request.max_tokens,
        ..Default::default()
    };
    if let Some(schema) = &request.response_schema {
        generation_config.response_mime_type = Some("application/json".to_string());
        generation_config.response_schema = Some(schema.clone());
    }

    GenerateRequest {
        system_instruction: request.system_prompt.as_ref().map(|system| Content {
            role: None,
            parts: vec![Part {
                text: Some(system.clone()),
            }],
        }),
        contents: vec![text_content("user", &request.prompt)],
        generation_config,
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = build_request(&request);
        debug!(model = %self.model, "Sending generateContent request");

        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        let usage = generated
            .usage_metadata
            .map(|u| Usage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        let Some(candidate) = generated.candidates.into_iter().next() else {
            return Err(match generated.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => LlmError::ContentFiltered { reason },
                None => LlmError::ParseError("No candidates in response".to_string()),
            });
        };

        let finish_reason = match candidate.finish_reason.as_deref() {
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
                FinishReason::ContentFilter
            }
            _ => FinishReason::Stop,
        };

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if content.trim().is_empty() {
            if finish_reason == FinishReason::ContentFilter {
                return Err(LlmError::ContentFiltered {
                    reason: candidate.finish_reason.unwrap_or_default(),
                });
            }
            return Err(LlmError::EmptyResponse);
        }

        Ok(CompletionResponse {
            content,
            finish_reason,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> GeminiBackend {
        GeminiBackend::new(server.uri(), "gemini-test", "secret", Duration::from_secs(5)).unwrap()
    }

    fn reply(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 11, "candidatesTokenCount": 7 }
        })
    }

    #[test]
    fn test_missing_key_rejected() {
        assert_eq!(
            GeminiBackend::new(GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, "  ", Duration::from_secs(5))
                .err(),
            Some(LlmError::MissingCredential)
        );
    }

    #[test]
    fn test_request_shape() {
        let request = CompletionRequest::user("Make a level")
            .with_system("Be a teacher")
            .with_temperature(0.8)
            .with_json_schema(serde_json::json!({ "type": "OBJECT" }));
        let body = serde_json::to_value(build_request(&request)).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be a teacher");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Make a level");
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[tokio::test]
    async fn test_complete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "secret"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Hint please" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("Look at oxygen")))
            .mount(&server)
            .await;

        let response = backend(&server)
            .complete(CompletionRequest::user("Hint please"))
            .await
            .unwrap();

        assert_eq!(response.content, "Look at oxygen");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.total(), 18);
    }

    #[tokio::test]
    async fn test_blocked_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let err = backend(&server)
            .complete(CompletionRequest::user("?"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LlmError::ContentFiltered {
                reason: "SAFETY".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let backend = backend(&server);
        assert_eq!(
            backend.complete(CompletionRequest::user("?")).await.unwrap_err(),
            LlmError::RateLimited {
                retry_after_ms: Some(3000)
            }
        );
        assert!(matches!(
            backend.complete(CompletionRequest::user("?")).await.unwrap_err(),
            LlmError::RequestFailed(msg) if msg.contains("boom")
        ));
    }

    #[tokio::test]
    async fn test_empty_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("   ")))
            .mount(&server)
            .await;

        let err = backend(&server)
            .complete(CompletionRequest::user("?"))
            .await
            .unwrap_err();
        assert_eq!(err, LlmError::EmptyResponse);
    }

    #[test]
    fn test_plain_request_has_no_schema() {
        let body = serde_json::to_value(build_request(&CompletionRequest::user("Hint"))).unwrap();
        assert!(body.get("systemInstruction").is_none());
        assert!(body["generationConfig"].get("responseSchema").is_none());
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }
}
