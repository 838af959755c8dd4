//! Error types for the CLI application.

use docqa_domain::CompletionError;
use docqa_extractor::ExtractorError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Provider could not be created
    #[error("Provider error: {0}")]
    Provider(#[from] CompletionError),

    /// Document discovery or pipeline setup failed
    #[error("Extractor error: {0}")]
    Extractor(#[from] ExtractorError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
