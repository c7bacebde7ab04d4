//! TutorService - level generation and hints with graceful fallback.
//!
//! Both operations are one-shot: no retries, and no error ever crosses this
//! boundary. A service built without a backend (no credential) answers every
//! call with its degraded result straight away.

use std::sync::Arc;

use balance::Level;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::backend::traits::{CompletionRequest, LlmBackend, LlmError};
use crate::prompt::{generation_prompt, hint_prompt, GENERATION_SYSTEM_PROMPT};
use crate::schema::{level_response_schema, parse_generated_level, SchemaError};

/// Shown instead of a hint when no credential is configured.
pub const NO_CREDENTIAL_HINT: &str = "I can't help you without an API key, sorry!";
/// Shown when the model answers with nothing.
pub const EMPTY_HINT_FALLBACK: &str = "Try counting the atoms of each colour!";
/// Shown when the hint request fails.
pub const ERROR_HINT_FALLBACK: &str = "Focus on the most complex element first.";

/// Error types inside the service. Callers only see `None` or fallback text.
#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    /// Backend error
    #[error("Backend error: {0}")]
    Backend(#[from] LlmError),

    /// Response did not describe a valid level
    #[error("Invalid generated level: {0}")]
    Schema(#[from] SchemaError),

    /// The model returned a level the player already has
    #[error("Generated level {0:?} duplicates an existing one")]
    DuplicateName(String),
}

/// Configuration for the TutorService.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// Sampling temperature for level generation
    pub generation_temperature: f32,
    /// Output token cap for level generation
    pub generation_max_tokens: u32,
    /// Output token cap for hints
    pub hint_max_tokens: u32,
    /// Hints longer than this many characters are cut
    pub max_hint_chars: usize,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            generation_temperature: 0.8,
            generation_max_tokens: 2048,
            hint_max_tokens: 256,
            max_hint_chars: 400,
        }
    }
}

/// Generates levels and hints through an optional LLM backend.
pub struct TutorService {
    config: TutorConfig,
    backend: Option<Arc<dyn LlmBackend>>,
}

impl TutorService {
    /// Create a service backed by `backend`.
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            config: TutorConfig::default(),
            backend: Some(backend),
        }
    }

    /// Service with AI features turned off.
    pub fn disabled() -> Self {
        Self {
            config: TutorConfig::default(),
            backend: None,
        }
    }

    /// Create with configuration.
    pub fn with_config(mut self, config: TutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Id of the backing model, if any.
    pub fn model(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.id())
    }

    /// Ask for a new level whose name is not in `exclude_names`.
    ///
    /// Returns `None` on any failure.
    pub async fn generate_level(&self, exclude_names: &[String]) -> Option<Level> {
        let Some(backend) = self.backend.as_deref() else {
            warn!("No API key available, cannot generate a level");
            return None;
        };

        match self.try_generate(backend, exclude_names).await {
            Ok(level) => {
                info!(level = %level.name, difficulty = %level.difficulty, "Generated level");
                Some(level)
            }
            Err(e) => {
                warn!(error = %e, "Failed to generate level");
                None
            }
        }
    }

    /// Ask for a short hint about `level` at its current coefficients.
    ///
    /// Always returns displayable text.
    pub async fn get_hint(&self, level: &Level) -> String {
        let Some(backend) = self.backend.as_deref() else {
            return NO_CREDENTIAL_HINT.to_string();
        };

        let request = CompletionRequest::user(hint_prompt(level))
            .with_max_tokens(self.config.hint_max_tokens);

        match backend.complete(request).await {
            Ok(response) => {
                let text = response.content.trim();
                if text.is_empty() {
                    EMPTY_HINT_FALLBACK.to_string()
                } else {
                    truncate_chars(text, self.config.max_hint_chars)
                }
            }
            Err(LlmError::EmptyResponse) => EMPTY_HINT_FALLBACK.to_string(),
            Err(e) => {
                warn!(error = %e, "Hint request failed");
                ERROR_HINT_FALLBACK.to_string()
            }
        }
    }

    async fn try_generate(
        &self,
        backend: &dyn LlmBackend,
        exclude_names: &[String],
    ) -> Result<Level, TutorError> {
        let request = CompletionRequest::user(generation_prompt(exclude_names))
            .with_system(GENERATION_SYSTEM_PROMPT)
            .with_temperature(self.config.generation_temperature)
            .with_max_tokens(self.config.generation_max_tokens)
            .with_json_schema(level_response_schema());

        let response = backend.complete(request).await?;
        debug!(
            model = backend.id(),
            tokens = response.usage.total(),
            "Level generation answered"
        );

        let level = parse_generated_level(&response.content, Utc::now().timestamp_millis())?;
        if exclude_names
            .iter()
            .any(|n| n.trim().eq_ignore_ascii_case(&level.name))
        {
            return Err(TutorError::DuplicateName(level.name));
        }
        Ok(level)
    }
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}
