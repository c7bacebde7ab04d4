//! Tutor Agent - AI level generation and hints
//!
//! Provides the generative side of the game:
//! - Trait-based LLM backends (Gemini, OpenAI-compatible, mock)
//! - Strict validation of generated levels before they reach the game
//! - A [`TutorService`] that never fails past its boundary: missing
//!   credentials, network errors and malformed replies all degrade to
//!   `None` or a canned hint
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             TutorService                │
//! │  generate_level()        get_hint()     │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┴───────────┐
//!      ▼                       ▼
//! ┌─────────────┐       ┌─────────────┐
//! │ LlmBackend  │       │   schema    │
//! │ (Gemini/    │       │ (validate + │
//! │  OpenAI)    │       │  convert)   │
//! └─────────────┘       └─────────────┘
//! ```

pub mod backend;
pub mod prompt;
pub mod schema;
pub mod service;

// Re-export main types for convenience
pub use backend::traits::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};
pub use backend::{GeminiBackend, MockBackend, OpenAiBackend};
pub use schema::{parse_generated_level, GeneratedLevel, SchemaError};
pub use service::{TutorConfig, TutorError, TutorService};
