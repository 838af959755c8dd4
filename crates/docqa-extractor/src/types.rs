//! Request and summary types for generation runs

use crate::prompt::PromptBuilder;

/// One prompt's worth of generation work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest<'a> {
    /// Section title; `None` for whole-document generation
    pub heading: Option<&'a str>,

    /// Text to cover
    pub content: &'a str,

    /// Number of pairs to request; `None` lets the model decide
    pub count: Option<usize>,
}

impl<'a> GenerationRequest<'a> {
    /// Request for a single section
    pub fn section(title: &'a str, content: &'a str, count: Option<usize>) -> Self {
        Self {
            heading: Some(title),
            content,
            count,
        }
    }

    /// Request for a whole document
    pub fn document(content: &'a str, count: Option<usize>) -> Self {
        Self {
            heading: None,
            content,
            count,
        }
    }

    /// Name used in log lines
    pub fn label(&self) -> &'a str {
        self.heading.unwrap_or("<document>")
    }

    /// Render the request into a prompt
    pub fn prompt(&self) -> String {
        PromptBuilder::new(self.content)
            .with_heading(self.heading)
            .with_count(self.count)
            .build()
    }
}

/// Counters collected over a pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Documents handed to the pipeline
    pub documents_seen: usize,

    /// Documents skipped because they could not be read
    pub documents_skipped: usize,

    /// Units that were sized and sent for extraction
    pub sections_processed: usize,

    /// Sections skipped because their body was empty
    pub sections_skipped: usize,

    /// Units abandoned because the run deadline expired
    pub units_abandoned: usize,

    /// Records produced
    pub records: usize,
}
