//! Error types for the extractor

use docqa_domain::CompletionError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while sizing, extracting or loading documents
///
/// The pipeline never surfaces these to its caller; they are logged and the
/// failing unit contributes nothing.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Completion call exceeded its deadline
    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),

    /// LLM reply did not contain the expected structure
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Reading a document failed (missing file, bad encoding)
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

impl From<std::io::Error> for ExtractorError {
    fn from(e: std::io::Error) -> Self {
        ExtractorError::Io(e.to_string())
    }
}

impl From<CompletionError> for ExtractorError {
    fn from(e: CompletionError) -> Self {
        ExtractorError::Llm(e.to_string())
    }
}
