//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and infrastructure.
//! Infrastructure implementations live in other crates.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during a completion call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider misconfigured (missing key, bad endpoint)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl CompletionError {
    /// Whether retrying the same call could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CompletionError::Communication(_) | CompletionError::RateLimitExceeded
        )
    }
}

/// Trait for text completion
///
/// Implemented by the infrastructure layer (docqa-llm). Calls may be slow
/// and may fail; the caller bounds them with a timeout and decides how to
/// degrade.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a text completion for the prompt
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Name of the model behind this provider
    fn model_name(&self) -> &str;
}
