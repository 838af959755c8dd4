//! Question/answer records produced by the extractor

use serde::{Deserialize, Serialize};

/// One generated question/answer pair
///
/// Records are created from a parsed model reply and enriched with a
/// provenance `source` by the pipeline. `question` and `answer` are never
/// empty once a record leaves the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    /// The question text
    pub question: String,

    /// The answer text
    pub answer: String,

    /// Heading or topic label reported by the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Provenance string (`<document>/<section path or topic>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl QaRecord {
    /// Create a record with no topic or source
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            topic: None,
            source: None,
        }
    }

    /// Set the topic
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Set the provenance source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Validate that both question and answer carry text
    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question is empty".to_string());
        }
        if self.answer.trim().is_empty() {
            return Err("answer is empty".to_string());
        }
        Ok(())
    }
}
