//! Game configuration

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tutor_agent::backend::gemini::{DEFAULT_GEMINI_MODEL, GEMINI_BASE_URL};
use tutor_agent::backend::openai::{DEFAULT_OPENAI_MODEL, OPENAI_BASE_URL};
use tutor_agent::backend::DEFAULT_TIMEOUT;
use tutor_agent::{GeminiBackend, LlmBackend, LlmError, OpenAiBackend, TutorConfig, TutorService};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub game: GameConfig,
}

/// Which service generates levels and hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    #[value(name = "openai")]
    OpenAi,
}

/// Generative model settings. The API key is never read from the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub provider: Provider,

    /// Model name, provider default when unset
    #[serde(default)]
    pub model: Option<String>,

    /// API endpoint, provider default when unset
    #[serde(default)]
    pub base_url: Option<String>,

    /// Sampling temperature for level generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Longest hint shown, in characters
    #[serde(default = "default_max_hint_chars")]
    pub max_hint_chars: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            base_url: None,
            temperature: default_temperature(),
            max_hint_chars: default_max_hint_chars(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Level to start on, counted from 1
    #[serde(default = "default_start_level")]
    pub start_level: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_level: default_start_level(),
        }
    }
}

fn default_temperature() -> f32 { 0.8 }
fn default_max_hint_chars() -> usize { 400 }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT.as_secs() }
fn default_start_level() -> usize { 1 }

impl Config {
    /// Load from `path`, or defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file not found, using defaults");
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn tutor_config(&self) -> TutorConfig {
        TutorConfig {
            generation_temperature: self.ai.temperature,
            max_hint_chars: self.ai.max_hint_chars,
            ..Default::default()
        }
    }

    fn backend(&self, api_key: Option<String>) -> Result<Option<Arc<dyn LlmBackend>>, LlmError> {
        let timeout = Duration::from_secs(self.ai.timeout_secs);
        let backend: Arc<dyn LlmBackend> = match self.ai.provider {
            Provider::Gemini => {
                let Some(key) = api_key else {
                    return Ok(None);
                };
                Arc::new(GeminiBackend::new(
                    self.ai.base_url.as_deref().unwrap_or(GEMINI_BASE_URL),
                    self.ai.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL),
                    key,
                    timeout,
                )?)
            }
            Provider::OpenAi => {
                // A local server needs no key; the public API does.
                if api_key.is_none() && self.ai.base_url.is_none() {
                    return Ok(None);
                }
                Arc::new(OpenAiBackend::new(
                    self.ai.base_url.as_deref().unwrap_or(OPENAI_BASE_URL),
                    self.ai.model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL),
                    api_key,
                    timeout,
                )?)
            }
        };
        Ok(Some(backend))
    }

    /// Build the tutor. Missing or unusable credentials disable AI features.
    pub fn tutor(&self, api_key: Option<String>) -> TutorService {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        match self.backend(api_key) {
            Ok(Some(backend)) => {
                info!(provider = ?self.ai.provider, model = backend.id(), "AI tutor enabled");
                TutorService::new(backend).with_config(self.tutor_config())
            }
            Ok(None) => {
                info!("No API key configured, AI features disabled");
                TutorService::disabled()
            }
            Err(e) => {
                warn!(error = %e, "Could not set up the AI backend, AI features disabled");
                TutorService::disabled()
            }
        }
    }
}
