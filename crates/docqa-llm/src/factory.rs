//! Provider selection
//!
//! The configured provider string is turned into a concrete client here and
//! nowhere else. Everything downstream holds an `Arc<dyn CompletionProvider>`.

use crate::{AnthropicProvider, GeminiProvider, MockProvider, OllamaProvider, OpenAiProvider};
use docqa_domain::{CompletionError, CompletionProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Supported completion backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Local Ollama server
    #[serde(rename = "ollama")]
    Ollama,
    /// OpenAI or any OpenAI-compatible endpoint
    #[serde(rename = "openai")]
    OpenAi,
    /// Anthropic messages API
    #[serde(rename = "anthropic")]
    Anthropic,
    /// Google Generative Language API
    #[serde(rename = "google-genai")]
    GoogleGenai,
    /// Canned responses, no network
    #[serde(rename = "mock")]
    Mock,
}

/// Generation parameters passed through to the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModelParameters {
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling mass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Top-k sampling cutoff (ignored by providers that lack it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Maximum tokens to generate per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: None,
            top_k: None,
            max_tokens: default_max_tokens(),
        }
    }
}

impl ModelParameters {
    /// Validate the parameters
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        if let Some(top_p) = self.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(format!("top-p must be between 0.0 and 1.0, got {}", top_p));
            }
        }
        if self.max_tokens == 0 {
            return Err("max-tokens must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// The `[model]` section of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Backend to use
    pub provider: ProviderKind,

    /// Model identifier (e.g. "gpt-4o-mini", "llama3.2")
    pub id: String,

    /// Override the provider's default endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// API key; read from the provider's environment variable when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Generation parameters
    #[serde(default, alias = "model-parameters")]
    pub parameters: ModelParameters,
}

impl ModelConfig {
    /// Create a config for the given provider and model with default parameters
    pub fn new(provider: ProviderKind, id: impl Into<String>) -> Self {
        Self {
            provider,
            id: id.into(),
            endpoint: None,
            api_key: None,
            request_timeout_secs: default_request_timeout(),
            parameters: ModelParameters::default(),
        }
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("model id cannot be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        self.parameters.validate()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(ProviderKind::Ollama, "llama3.2")
    }
}

/// Construct the provider described by `config`
///
/// # Errors
///
/// Returns `CompletionError::Configuration` when the config is invalid or a
/// required API key is missing.
pub fn build_provider(config: &ModelConfig) -> Result<Arc<dyn CompletionProvider>, CompletionError> {
    config.validate().map_err(CompletionError::Configuration)?;

    let provider: Arc<dyn CompletionProvider> = match config.provider {
        ProviderKind::Ollama => Arc::new(OllamaProvider::from_config(config)?),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::from_config(config)?),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::from_config(config)?),
        ProviderKind::GoogleGenai => Arc::new(GeminiProvider::from_config(config)?),
        ProviderKind::Mock => Arc::new(MockProvider::new("[]").with_model_name(config.id.clone())),
    };

    tracing::debug!("Built {:?} provider for model '{}'", config.provider, config.id);
    Ok(provider)
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_request_timeout() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_section() {
        let config: ModelConfig = toml::from_str(
            r#"
            provider = "google-genai"
            id = "gemini-1.5-flash"

            [parameters]
            temperature = 0.1
            top-p = 0.9
            top-k = 50
            max-tokens = 4096
            "#,
        )
        .unwrap();

        assert_eq!(config.provider, ProviderKind::GoogleGenai);
        assert_eq!(config.id, "gemini-1.5-flash");
        assert_eq!(config.parameters.top_k, Some(50));
        assert_eq!(config.parameters.max_tokens, 4096);
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_parameters_default_when_absent() {
        let config: ModelConfig = toml::from_str(
            r#"
            provider = "openai"
            id = "gpt-4o-mini"
            "#,
        )
        .unwrap();
        assert_eq!(config.parameters, ModelParameters::default());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result: Result<ModelConfig, _> = toml::from_str(
            r#"
            provider = "carrier-pigeon"
            id = "coo"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        assert!(ModelConfig::default().validate().is_ok());

        let mut config = ModelConfig::default();
        config.id = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = ModelConfig::default();
        config.parameters.top_p = Some(1.5);
        assert!(config.validate().is_err());

        let mut config = ModelConfig::default();
        config.parameters.max_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_build_mock_provider() {
        let config = ModelConfig::new(ProviderKind::Mock, "offline");
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "offline");
        assert_eq!(provider.complete("anything").await.unwrap(), "[]");
    }

    #[test]
    fn test_build_ollama_provider() {
        let config = ModelConfig::new(ProviderKind::Ollama, "mistral");
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "mistral");
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = ModelConfig::new(ProviderKind::Mock, "m");
        config.request_timeout_secs = 0;
        assert!(matches!(
            build_provider(&config),
            Err(CompletionError::Configuration(_))
        ));
    }

    #[test]
    fn test_build_openai_with_explicit_key() {
        let mut config = ModelConfig::new(ProviderKind::OpenAi, "gpt-4o-mini");
        config.api_key = Some("sk-test".to_string());
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "gpt-4o-mini");
    }
}
