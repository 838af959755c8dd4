//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API for running local models.
//!
//! # Features
//!
//! - Async HTTP communication with Ollama API
//! - Configurable endpoint, model and sampling options
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use docqa_llm::OllamaProvider;
//! use docqa_domain::CompletionProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.2")?;
//! let reply = provider.complete("Say hello").await?;
//! # Ok(())
//! # }
//! ```

use crate::factory::{ModelConfig, ModelParameters};
use crate::http::{build_client, status_error};
use async_trait::async_trait;
use docqa_domain::{CompletionError, CompletionProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (local models can be slow on long sections)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
    parameters: ModelParameters,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    num_predict: u32,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.2", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, CompletionError> {
        let client = build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;
        let endpoint: String = endpoint.into();

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            parameters: ModelParameters::default(),
        })
    }

    /// Create a new Ollama provider against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, CompletionError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Create a provider from the `[model]` configuration
    pub fn from_config(config: &ModelConfig) -> Result<Self, CompletionError> {
        let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let mut provider = Self::new(endpoint, config.id.clone())?;
        provider.client = build_client(config.request_timeout())?;
        provider.parameters = config.parameters.clone();
        Ok(provider)
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the sampling options
    pub fn with_parameters(mut self, parameters: ModelParameters) -> Self {
        self.parameters = parameters;
        self
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> OllamaGenerateRequest<'a> {
        OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.parameters.temperature,
                top_p: self.parameters.top_p,
                top_k: self.parameters.top_k,
                num_predict: self.parameters.max_tokens,
            },
        }
    }

    /// Generate text using Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Network communication fails
    /// - Response format is invalid
    pub async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/api/generate", self.endpoint);
        let request_body = self.request_body(prompt);

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<OllamaGenerateResponse>()
                            .await
                            .map(|r| r.response)
                            .map_err(|e| {
                                CompletionError::InvalidResponse(format!(
                                    "Failed to parse response: {}",
                                    e
                                ))
                            });
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    let error = status_error(status, error_text, &self.model);
                    if !error.is_transient() {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(e) => {
                    last_error = Some(CompletionError::Communication(format!(
                        "Request failed: {}",
                        e
                    )));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Ollama call failed (attempt {}), retrying in {:?}", attempts, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| CompletionError::Communication("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        debug!("Ollama request to model '{}' ({} chars)", self.model, prompt.len());
        self.generate(prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ProviderKind;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llama2").unwrap();
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model, "llama2");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral").unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model, "mistral");
    }

    #[test]
    fn test_ollama_provider_with_max_retries() {
        let provider = OllamaProvider::default_endpoint("llama2")
            .unwrap()
            .with_max_retries(5);
        assert_eq!(provider.max_retries, 5);

        let provider = OllamaProvider::default_endpoint("llama2")
            .unwrap()
            .with_max_retries(0);
        assert_eq!(provider.max_retries, 1);
    }

    #[test]
    fn test_from_config_uses_endpoint_and_parameters() {
        let mut config = ModelConfig::new(ProviderKind::Ollama, "qwen2.5");
        config.endpoint = Some("http://gpu-box:11434".to_string());
        config.parameters.top_k = Some(40);

        let provider = OllamaProvider::from_config(&config).unwrap();
        assert_eq!(provider.endpoint, "http://gpu-box:11434");
        assert_eq!(provider.parameters.top_k, Some(40));
    }

    #[test]
    fn test_request_body_shape() {
        let provider = OllamaProvider::default_endpoint("llama2").unwrap();
        let body = serde_json::to_value(provider.request_body("hi")).unwrap();
        assert_eq!(body["model"], "llama2");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 2048);
        assert!(body["options"].get("top_k").is_none());
    }

    // Integration tests (requires running Ollama)
    #[tokio::test]
    #[ignore] // Only run when Ollama is available
    async fn test_ollama_generate_integration() {
        let provider = OllamaProvider::default_endpoint("llama2").unwrap();
        let result = provider.complete("Say 'hello' and nothing else").await;

        if let Ok(response) = result {
            assert!(!response.is_empty());
        }
    }

    #[tokio::test]
    async fn test_ollama_error_handling() {
        // Use invalid endpoint to trigger error
        let provider = OllamaProvider::new("http://localhost:99999", "llama2")
            .unwrap()
            .with_max_retries(1);

        let result = provider.complete("test").await;

        match result {
            Err(CompletionError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }
}
