//! Google Generative Language API provider

use crate::factory::{ModelConfig, ModelParameters};
use crate::http::{build_client, resolve_api_key, send_json};
use async_trait::async_trait;
use docqa_domain::{CompletionError, CompletionProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Gemini provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    parameters: ModelParameters,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiProvider {
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

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.parameters.temperature,
                top_p: self.parameters.top_p,
                top_k: self.parameters.top_k,
                max_output_tokens: self.parameters.max_tokens,
            },
        }
    }
}

fn candidate_text(response: GenerateResponse) -> Result<String, CompletionError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(CompletionError::InvalidResponse(
            "No candidate text in response".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );
        debug!("Gemini request to model '{}' ({} chars)", self.model, prompt.len());

        let request = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.request_body(prompt));

        let response: GenerateResponse = send_json(request, &self.model).await?;
        candidate_text(response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
