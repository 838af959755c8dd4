//! Work sizing: how many QA pairs a unit of text should get

use crate::config::{SizingConfig, SizingStrategy};
use crate::error::ExtractorError;
use crate::extractor::complete_with_timeout;
use crate::prompt::PromptBuilder;
use docqa_domain::CompletionProvider;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, warn};

fn integer_regex() -> &'static Regex {
    static INTEGER: OnceLock<Regex> = OnceLock::new();
    INTEGER.get_or_init(|| Regex::new(r"[0-9]+").expect("integer regex is valid"))
}

/// Decides how many pairs to request for a section or document
#[derive(Clone)]
pub struct WorkSizer {
    provider: Arc<dyn CompletionProvider>,
    config: SizingConfig,
    call_timeout: Duration,
}

impl WorkSizer {
    /// Create a new sizer
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        config: SizingConfig,
        call_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            config,
            call_timeout,
        }
    }

    /// Number of pairs to request; never fails
    ///
    /// `None` under the implicit strategy, where the prompt carries no count.
    pub async fn size(&self, heading: Option<&str>, content: &str) -> Option<usize> {
        match self.config.strategy {
            SizingStrategy::Heuristic => Some(self.heuristic(content)),
            SizingStrategy::Delegated => Some(self.delegated(heading, content).await),
            SizingStrategy::Implicit => None,
        }
    }

    /// One pair per `chars_per_question` characters, clamped
    pub fn heuristic(&self, content: &str) -> usize {
        let chars = content.chars().count();
        (chars / self.config.chars_per_question)
            .clamp(self.config.heuristic_min, self.config.heuristic_max)
    }

    async fn delegated(&self, heading: Option<&str>, content: &str) -> usize {
        match self.ask_model(heading, content).await {
            Ok(count) => {
                debug!("Model asked for {} pairs", count);
                count
            }
            Err(e) => {
                warn!(
                    "Could not size {}: {}; using {}",
                    heading.unwrap_or("<document>"),
                    e,
                    self.config.fallback
                );
                self.config.fallback
            }
        }
    }

    async fn ask_model(&self, heading: Option<&str>, content: &str) -> Result<usize, ExtractorError> {
        let prompt = PromptBuilder::new(content)
            .with_heading(heading)
            .build_sizing();
        let reply = complete_with_timeout(self.provider.as_ref(), &prompt, self.call_timeout).await?;

        let count = parse_count(&reply).ok_or_else(|| {
            ExtractorError::InvalidFormat(format!("No integer in sizing reply {:?}", reply.trim()))
        })?;
        Ok(count.clamp(self.config.delegated_min, self.config.delegated_max))
    }
}

/// First run of ASCII digits anywhere in the reply
///
/// Digits from other scripts are not numbers here.
///
/// Numbers too large for `usize` saturate to `usize::MAX`.
pub fn parse_count(reply: &str) -> Option<usize> {
    let digits = integer_regex().find(reply)?.as_str();
    Some(digits.parse().unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_llm::MockProvider;

    fn sizer(provider: MockProvider, strategy: SizingStrategy) -> WorkSizer {
        WorkSizer::new(
            Arc::new(provider),
            SizingConfig::with_strategy(strategy),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_heuristic_bounds() {
        let sizer = sizer(MockProvider::default(), SizingStrategy::Heuristic);
        assert_eq!(sizer.heuristic(""), 3);
        assert_eq!(sizer.heuristic(&"a".repeat(199)), 3);
        assert_eq!(sizer.heuristic(&"a".repeat(200)), 3);
        assert_eq!(sizer.heuristic(&"a".repeat(401)), 3);
        assert_eq!(sizer.heuristic(&"a".repeat(800)), 4);
        assert_eq!(sizer.heuristic(&"a".repeat(100_000)), 20);
    }

    #[test]
    fn test_heuristic_counts_characters_not_bytes() {
        let sizer = sizer(MockProvider::default(), SizingStrategy::Heuristic);
        assert_eq!(sizer.heuristic(&"é".repeat(999)), 4);
    }

    #[tokio::test]
    async fn test_heuristic_makes_no_calls() {
        let provider = MockProvider::new("7");
        let sizer = sizer(provider.clone(), SizingStrategy::Heuristic);

        let first = sizer.size(Some("A"), &"x".repeat(1000)).await;
        let second = sizer.size(Some("A"), &"x".repeat(1000)).await;
        assert_eq!(first, Some(5));
        assert_eq!(first, second);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_delegated_uses_model_answer() {
        let provider = MockProvider::new("I think 6 pairs would cover it.");
        let sizer = sizer(provider.clone(), SizingStrategy::Delegated);

        assert_eq!(sizer.size(Some("A"), "text").await, Some(6));
        assert_eq!(provider.call_count(), 1);
        assert!(provider.prompts()[0].contains("Number of pairs:"));
    }

    #[tokio::test]
    async fn test_delegated_clamps() {
        let low = sizer(MockProvider::new("0"), SizingStrategy::Delegated);
        assert_eq!(low.size(Some("A"), "text").await, Some(1));

        let high = sizer(MockProvider::new("42"), SizingStrategy::Delegated);
        assert_eq!(high.size(Some("A"), "text").await, Some(10));

        let huge = sizer(
            MockProvider::new("99999999999999999999999999"),
            SizingStrategy::Delegated,
        );
        assert_eq!(huge.size(Some("A"), "text").await, Some(10));
    }

    #[tokio::test]
    async fn test_delegated_fallbacks() {
        let no_number = sizer(MockProvider::new("several"), SizingStrategy::Delegated);
        assert_eq!(no_number.size(Some("A"), "text").await, Some(3));

        let failing = sizer(MockProvider::failing(), SizingStrategy::Delegated);
        assert_eq!(failing.size(Some("A"), "text").await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delegated_timeout_falls_back() {
        let provider = MockProvider::new("8").with_delay(Duration::from_secs(30));
        let sizer = WorkSizer::new(
            Arc::new(provider),
            SizingConfig::with_strategy(SizingStrategy::Delegated),
            Duration::from_secs(1),
        );
        assert_eq!(sizer.size(None, "text").await, Some(3));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("5"), Some(5));
        assert_eq!(parse_count("Number: 12, maybe 13"), Some(12));
        assert_eq!(parse_count("no digits"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn test_parse_count_ignores_non_ascii_digits() {
        assert_eq!(parse_count("\u{0663}"), None);
        assert_eq!(parse_count("\u{0663} or 4"), Some(4));
    }

    #[tokio::test]
    async fn test_non_ascii_digit_reply_falls_back() {
        let sizer = sizer(MockProvider::new("\u{0663}"), SizingStrategy::Delegated);
        assert_eq!(sizer.size(Some("A"), "text").await, Some(3));
    }

    #[tokio::test]
    async fn test_implicit_makes_no_calls() {
        let provider = MockProvider::new("7");
        let sizer = sizer(provider.clone(), SizingStrategy::Implicit);

        assert_eq!(sizer.size(Some("A"), &"x".repeat(1000)).await, None);
        assert_eq!(provider.call_count(), 0);
    }
}
