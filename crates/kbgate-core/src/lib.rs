//! KBGate Core - Shared types, traits and configuration
//!
//! This crate defines the pieces shared by the gateway binary and the
//! generation client:
//! - Common error types
//! - The `AnswerGenerator` trait implemented by generation backends
//! - Request validation for RAG queries
//! - The instruction template sent with every query
//! - The expected answer shape (used by optional validation)
//! - Configuration management

pub mod answer;
pub mod config;
pub mod prompt;
pub mod query;

pub use answer::{AnswerEnvelope, Candidate, ItemRef};
pub use config::{
    AnswerConfig, AppConfig, BedrockConfig, ConfigError, LoggingConfig, ServerConfig,
};
pub use prompt::{compose_input, InstructionTemplate};
pub use query::{RagQuery, DEFAULT_TOP_K, MAX_TOP_K, MIN_TOP_K};

use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for KBGate operations
#[derive(Error, Debug)]
pub enum KbGateError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Validation(String),

    /// Failure reported by the generation service, message kept verbatim
    #[error("{0}")]
    Upstream(String),

    #[error("Malformed answer from generation service: {0}")]
    MalformedAnswer(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, KbGateError>;

// ============================================================================
// Traits
// ============================================================================

/// A knowledge-base grounded text generator.
///
/// Implementations issue exactly one upstream call per invocation and return
/// the generated text as-is. An absent answer is the empty string.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Generate an answer for `query`, prefixed by `instruction`
    async fn generate(&self, query: &str, instruction: &str) -> Result<String>;
}

// ============================================================================
// Tests
// ============================================================================
