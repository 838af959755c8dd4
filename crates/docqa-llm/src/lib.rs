//! docqa LLM Provider Layer
//!
//! Pluggable completion provider implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `CompletionProvider` trait from
//! `docqa-domain`. Provider selection happens once, at the boundary, through
//! [`build_provider`]; the pipeline only ever sees `Arc<dyn CompletionProvider>`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic scripted provider for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `OpenAiProvider`: OpenAI-compatible chat completions
//! - `AnthropicProvider`: Anthropic messages API
//! - `GeminiProvider`: Google Generative Language API
//!
//! # Examples
//!
//! ```
//! use docqa_llm::MockProvider;
//! use docqa_domain::CompletionProvider;
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.complete("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod factory;
pub mod gemini;
mod http;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use docqa_domain::{CompletionError, CompletionProvider};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use anthropic::AnthropicProvider;
pub use factory::{build_provider, ModelConfig, ModelParameters, ProviderKind};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Scripted reply of a [`MockProvider`]
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Replies are looked up in this order: an exact prompt match, then the first
/// registered substring rule the prompt contains, then the default response.
///
/// # Examples
///
/// ```
/// use docqa_llm::MockProvider;
/// use docqa_domain::CompletionProvider;
///
/// # tokio_test::block_on(async {
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.complete("any prompt").await.unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response_containing("Number of questions", "4");
/// assert_eq!(provider.complete("prompt1").await.unwrap(), "response1");
/// assert_eq!(provider.complete("...\nNumber of questions:").await.unwrap(), "4");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Option<String>,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    rules: Arc<Mutex<Vec<(String, MockReply)>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
    model_name: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Some(response.into()),
            responses: Arc::new(Mutex::new(HashMap::new())),
            rules: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            model_name: "mock".to_string(),
        }
    }

    /// Create a MockProvider that fails every call it has no rule for
    pub fn failing() -> Self {
        Self {
            default_response: None,
            ..Self::new("")
        }
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Report a specific model name
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Answer any prompt containing `needle` with `response`
    pub fn add_response_containing(
        &mut self,
        needle: impl Into<String>,
        response: impl Into<String>,
    ) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.into(), MockReply::Text(response.into())));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), MockReply::Error);
    }

    /// Return an error for any prompt containing `needle`
    pub fn add_error_containing(&mut self, needle: impl Into<String>) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.into(), MockReply::Error));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.prompts.lock().unwrap().clear();
    }

    fn reply_for(&self, prompt: &str) -> Option<MockReply> {
        if let Some(reply) = self.responses.lock().unwrap().get(prompt) {
            return Some(reply.clone());
        }
        let rules = self.rules.lock().unwrap();
        if let Some((_, reply)) = rules.iter().find(|(needle, _)| prompt.contains(needle.as_str())) {
            return Some(reply.clone());
        }
        self.default_response.clone().map(MockReply::Text)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.reply_for(prompt) {
            Some(MockReply::Text(response)) => Ok(response),
            Some(MockReply::Error) | None => Err(CompletionError::Other("Mock error".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
