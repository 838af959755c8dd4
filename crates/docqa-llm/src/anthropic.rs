//! Anthropic messages API provider

use crate::factory::{ModelConfig, ModelParameters};
use crate::http::{build_client, resolve_api_key, send_json};
use async_trait::async_trait;
use docqa_domain::{CompletionError, CompletionProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default Anthropic API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// API version header value
pub const API_VERSION: &str = "2023-06-01";

/// Anthropic provider
pub struct AnthropicProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    parameters: ModelParameters,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
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

    fn request_body<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.parameters.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.parameters.temperature,
            top_p: self.parameters.top_p,
            top_k: self.parameters.top_k,
        }
    }
}

/// Concatenate the text blocks of a reply
fn reply_text(response: MessagesResponse) -> Result<String, CompletionError> {
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if text.is_empty() {
        return Err(CompletionError::InvalidResponse(
            "No text content in response".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/v1/messages", self.endpoint);
        debug!("Anthropic request to model '{}' ({} chars)", self.model, prompt.len());

        let request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(prompt));

        let response: MessagesResponse = send_json(request, &self.model).await?;
        reply_text(response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ProviderKind;

    fn provider() -> AnthropicProvider {
        let mut config = ModelConfig::new(ProviderKind::Anthropic, "claude-3-5-haiku-latest");
        config.api_key = Some("test-key".to_string());
        config.parameters.top_k = Some(50);
        AnthropicProvider::from_config(&config).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let provider = provider();
        let body = serde_json::to_value(provider.request_body("hello")).unwrap();
        assert_eq!(body["model"], "claude-3-5-haiku-latest");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["top_k"], 50);
        assert_eq!(body["max_tokens"], 2048);
    }

    #[test]
    fn test_reply_joins_text_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"[{\"question\":"},{"type":"text","text":"\"Q\"}]"}]}"#,
        )
        .unwrap();
        assert_eq!(reply_text(response).unwrap(), r#"[{"question":"Q"}]"#);
    }

    #[test]
    fn test_reply_without_text() {
        let response: MessagesResponse =
            serde_json::from_str(r#"{"content":[{"type":"tool_use","id":"x"}]}"#).unwrap();
        assert!(reply_text(response).is_err());
    }

    #[test]
    fn test_default_endpoint() {
        assert_eq!(provider().endpoint, DEFAULT_ENDPOINT);
    }
}
