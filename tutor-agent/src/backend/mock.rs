//! Mock LLM backend for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::traits::*;

/// Mock backend for testing.
///
/// Replies come from a queue of scripted results; once the queue is empty
/// every call returns the default response content.
pub struct MockBackend {
    model_id: String,
    available: AtomicBool,
    response_content: String,
    scripted: Mutex<VecDeque<Result<String, LlmError>>>,
    last_request: Mutex<Option<CompletionRequest>>,
    call_count: AtomicU32,
}

impl MockBackend {
    /// Create a new mock backend.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            available: AtomicBool::new(true),
            response_content: "Mock response".to_string(),
            scripted: Mutex::new(VecDeque::new()),
            last_request: Mutex::new(None),
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the default response content.
    pub fn with_response(mut self, content: impl Into<String>) -> Self {
        self.response_content = content.into();
        self
    }

    /// Queue replies, consumed one per call.
    pub fn with_script(
        mut self,
        replies: impl IntoIterator<Item = Result<String, LlmError>>,
    ) -> Self {
        self.scripted.get_mut().extend(replies);
        self
    }

    /// Make every call fail with [`LlmError::Unavailable`] when `false`.
    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    /// Get the number of times complete was called.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The most recent request passed to `complete`.
    pub async fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().await.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("mock-model")
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    fn id(&self) -> &str {
        &self.model_id
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        // Estimate token counts
        let prompt_tokens = request.prompt.len() as u32 / 4;
        *self.last_request.lock().await = Some(request);

        if !self.available.load(Ordering::SeqCst) {
            return Err(LlmError::Unavailable("Mock backend disabled".to_string()));
        }

        let content = match self.scripted.lock().await.pop_front() {
            Some(reply) => reply?,
            None => self.response_content.clone(),
        };
        let completion_tokens = content.len() as u32 / 4;

        Ok(CompletionResponse {
            content,
            finish_reason: FinishReason::Stop,
            usage: Usage {
                prompt_tokens,
                completion_tokens,
            },
        })
    }
}
