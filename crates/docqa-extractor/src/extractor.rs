//! QA extraction: one prompt, one completion call, one parsed reply

use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::types::GenerationRequest;
use docqa_domain::{CompletionProvider, QaRecord};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error};

/// Turns a piece of documentation into QA records with a single completion call
#[derive(Clone)]
pub struct QaExtractor {
    provider: Arc<dyn CompletionProvider>,
    call_timeout: Duration,
}

impl QaExtractor {
    /// Create a new extractor
    pub fn new(provider: Arc<dyn CompletionProvider>, call_timeout: Duration) -> Self {
        Self {
            provider,
            call_timeout,
        }
    }

    /// Name of the underlying model
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Generate records for the request, never failing
    ///
    /// Call errors, timeouts and unusable replies are logged and yield an
    /// empty list.
    pub async fn extract(&self, request: GenerationRequest<'_>) -> Vec<QaRecord> {
        match self.try_extract(request).await {
            Ok(records) => records,
            Err(e) => {
                error!("Extraction failed for {}: {}", request.label(), e);
                Vec::new()
            }
        }
    }

    /// Generate records for the request, surfacing the failure
    pub async fn try_extract(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<Vec<QaRecord>, ExtractorError> {
        let prompt = request.prompt();
        match request.count {
            Some(count) => debug!("Prompt length: {} chars, requesting {} pairs", prompt.len(), count),
            None => debug!("Prompt length: {} chars, model chooses the count", prompt.len()),
        }

        let reply = complete_with_timeout(self.provider.as_ref(), &prompt, self.call_timeout).await?;
        debug!("LLM response length: {} chars", reply.len());

        let records = parse_llm_response(&reply)?;
        debug!("Parsed {} records", records.len());
        Ok(records)
    }
}

/// Run one completion call bounded by `limit`
pub(crate) async fn complete_with_timeout(
    provider: &dyn CompletionProvider,
    prompt: &str,
    limit: Duration,
) -> Result<String, ExtractorError> {
    let reply = timeout(limit, provider.complete(prompt))
        .await
        .map_err(|_| ExtractorError::Timeout(limit))??;
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_llm::MockProvider;

    fn extractor(provider: MockProvider) -> QaExtractor {
        QaExtractor::new(Arc::new(provider), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_extract_parses_reply() {
        let qa = extractor(MockProvider::new(
            "```json\n[{\"question\":\"Q1?\",\"answer\":\"A1\"}]\n```",
        ));
        let records = qa.extract(GenerationRequest::section("Intro", "Some text.", Some(3))).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "Q1?");
    }

    #[tokio::test]
    async fn test_extract_sends_rendered_prompt() {
        let provider = MockProvider::new("[]");
        let qa = extractor(provider.clone());
        qa.extract(GenerationRequest::section("Install", "Run make.", Some(7)))
            .await;

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("## Section heading\nInstall\n"));
        assert!(prompts[0].contains("Run make."));
        assert!(prompts[0].contains("Write 7 question-answer pairs"));
    }

    #[tokio::test]
    async fn test_provider_error_yields_empty() {
        let qa = extractor(MockProvider::failing());
        assert!(qa.extract(GenerationRequest::section("A", "text", Some(3))).await.is_empty());
        assert!(matches!(
            qa.try_extract(GenerationRequest::section("A", "text", Some(3))).await,
            Err(ExtractorError::Llm(_))
        ));
    }

    #[tokio::test]
    async fn test_non_array_reply_yields_empty() {
        let qa = extractor(MockProvider::new("Sorry, I can't help with that."));
        assert!(qa.extract(GenerationRequest::document("text", Some(3))).await.is_empty());

        let qa = extractor(MockProvider::new(r#"{"question":"Q","answer":"A"}"#));
        assert!(qa.extract(GenerationRequest::document("text", Some(3))).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_yields_empty() {
        let provider = MockProvider::new("[]").with_delay(Duration::from_secs(60));
        let qa = QaExtractor::new(Arc::new(provider), Duration::from_secs(1));

        let result = qa.try_extract(GenerationRequest::section("A", "text", Some(3))).await;
        assert!(matches!(result, Err(ExtractorError::Timeout(_))));
        assert!(qa.extract(GenerationRequest::section("A", "text", Some(3))).await.is_empty());
    }

    #[tokio::test]
    async fn test_implicit_count_prompt_sent() {
        let provider = MockProvider::new(r#"[{"question":"Q?","answer":"A."}]"#);
        let qa = extractor(provider.clone());

        let records = qa.extract(GenerationRequest::document("All of it.", None)).await;
        assert_eq!(records.len(), 1);
        assert!(provider.prompts()[0].contains("as many question-answer pairs"));
    }

    #[test]
    fn test_model_name() {
        let qa = extractor(MockProvider::default().with_model_name("llama3.2"));
        assert_eq!(qa.model_name(), "llama3.2");
    }
}
