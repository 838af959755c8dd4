//! OpenAI-compatible chat completions provider
//!
//! Works against api.openai.com or any server exposing
//! `POST {endpoint}/v1/chat/completions` (vLLM, LM Studio, llama.cpp server).

use crate::factory::{ModelConfig, ModelParameters};
use crate::http::{build_client, resolve_api_key, send_json};
use async_trait::async_trait;
use docqa_domain::{CompletionError, CompletionProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default OpenAI API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Chat completions provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    parameters: ModelParameters,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider from the `[model]` configuration
    pub fn from_config(config: &ModelConfig) -> Result<Self, CompletionError> {
        let api_key = resolve_api_key(config.api_key.clone(), API_KEY_ENV)?;
        let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: config.id.clone(),
            api_key,
            client: build_client(config.request_timeout())?,
            parameters: config.parameters.clone(),
        })
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.parameters.temperature,
            top_p: self.parameters.top_p,
            max_tokens: self.parameters.max_tokens,
        }
    }
}

fn first_choice_text(response: ChatResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| CompletionError::InvalidResponse("No choices in response".to_string()))
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        debug!("OpenAI request to model '{}' ({} chars)", self.model, prompt.len());

        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt));

        let response: ChatResponse = send_json(request, &self.model).await?;
        first_choice_text(response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
