//! Prompt construction for QA generation and work sizing

/// Builds prompts for the completion capability
///
/// With a heading the section template is used; without one the
/// whole-document template is used, which also asks for a `topic` field.
/// Without a count the model decides how many pairs to write.
pub struct PromptBuilder<'a> {
    content: &'a str,
    heading: Option<&'a str>,
    count: Option<usize>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for the given content
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            heading: None,
            count: None,
        }
    }

    /// Set the section title
    pub fn with_heading(mut self, heading: Option<&'a str>) -> Self {
        self.heading = heading;
        self
    }

    /// Set the number of pairs to request; `None` leaves it to the model
    pub fn with_count(mut self, count: Option<usize>) -> Self {
        self.count = count;
        self
    }

    /// Build the generation prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        match self.heading {
            Some(heading) => {
                prompt.push_str(SECTION_INSTRUCTIONS);
                prompt.push_str("\n\n## Section heading\n");
                prompt.push_str(heading);
                prompt.push_str("\n\n## Section content\n");
            }
            None => {
                prompt.push_str(DOCUMENT_INSTRUCTIONS);
                prompt.push_str("\n\n## Document content\n");
            }
        }
        prompt.push_str("---\n");
        prompt.push_str(self.content);
        prompt.push_str("\n---\n\n");

        match self.count {
            Some(count) => prompt.push_str(&format!(
                "Write {} question-answer pairs covering the content above.\n\n",
                count
            )),
            None => {
                prompt.push_str(IMPLICIT_COUNT_INSTRUCTIONS);
                prompt.push_str("\n\n");
            }
        }

        if self.heading.is_some() {
            prompt.push_str(SECTION_OUTPUT_FORMAT);
        } else {
            prompt.push_str(DOCUMENT_OUTPUT_FORMAT);
        }

        prompt
    }

    /// Build the prompt asking how many pairs the content needs
    pub fn build_sizing(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str(SIZING_INSTRUCTIONS);
        prompt.push_str("\n\n");
        if let Some(heading) = self.heading {
            prompt.push_str("## Section heading\n");
            prompt.push_str(heading);
            prompt.push_str("\n\n");
        }
        prompt.push_str("## Content\n---\n");
        prompt.push_str(self.content);
        prompt.push_str("\n---\n\n");
        prompt.push_str(SIZING_REPLY_FORMAT);
        prompt
    }
}

const SECTION_INSTRUCTIONS: &str = r#"You turn technical documentation into question-answer pairs.
Read the section below and write pairs that together cover everything it says.

Rules:
- Each question asks about a different fact, step or concept
- Questions must be answerable from the section alone
- Answers are complete and accurate, using only what the section states
- Never add information that is not in the section"#;

const DOCUMENT_INSTRUCTIONS: &str = r#"You turn an entire documentation file into question-answer pairs.
Work out the main topics of the file first, then write pairs for each of them so that
together the pairs cover all important information.

Rules:
- Spread the pairs across topics in proportion to how much each topic covers
- Questions must be answerable from the file alone
- Answers are complete and accurate, using only what the file states
- Never add information that is not in the file
- Name the topic (preferably a heading of the file) each pair belongs to"#;

const SECTION_OUTPUT_FORMAT: &str = r#"Output format (JSON array only, no additional text):
```json
[
  {"question": "First question?", "answer": "First answer."},
  {"question": "Second question?", "answer": "Second answer."}
]
```"#;

const DOCUMENT_OUTPUT_FORMAT: &str = r#"Output format (JSON array only, no additional text):
```json
[
  {"question": "First question?", "answer": "First answer.", "topic": "Topic of the pair"}
]
```"#;

const IMPLICIT_COUNT_INSTRUCTIONS: &str = r#"Write as many question-answer pairs as it takes to cover every piece of the content above.
Each question must be understandable without the content at hand: name the feature, screen or
concept it asks about instead of saying "this section"."#;

const SIZING_INSTRUCTIONS: &str = r#"Decide how many question-answer pairs are needed to cover all information in the
content below. Take into account its length, how many distinct points it makes and how
complex they are."#;

const SIZING_REPLY_FORMAT: &str = "Reply with a single whole number from 1 to 10 and nothing else.\n\nNumber of pairs:";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_prompt() {
        let prompt = PromptBuilder::new("Run `make install`.")
            .with_heading(Some("Install"))
            .with_count(Some(4))
            .build();

        assert!(prompt.contains("## Section heading\nInstall\n"));
        assert!(prompt.contains("Run `make install`."));
        assert!(prompt.contains("Write 4 question-answer pairs"));
        assert!(!prompt.contains("\"topic\""));
    }

    #[test]
    fn test_whole_document_prompt_asks_for_topic() {
        let prompt = PromptBuilder::new("Whole file").with_count(Some(12)).build();

        assert!(prompt.contains("entire documentation file"));
        assert!(prompt.contains("Write 12 question-answer pairs"));
        assert!(prompt.contains("\"topic\""));
        assert!(!prompt.contains("Section heading"));
    }

    #[test]
    fn test_implicit_count_prompt() {
        let prompt = PromptBuilder::new("Whole file").build();

        assert!(prompt.contains("as many question-answer pairs as it takes"));
        assert!(!prompt.contains("Write 1 question-answer pairs"));
        assert!(prompt.contains("\"topic\""));

        let section = PromptBuilder::new("Text")
            .with_heading(Some("Install"))
            .with_count(None)
            .build();
        assert!(section.contains("as many question-answer pairs as it takes"));
    }

    #[test]
    fn test_sizing_prompt() {
        let prompt = PromptBuilder::new("Some content")
            .with_heading(Some("Setup"))
            .build_sizing();

        assert!(prompt.contains("## Section heading\nSetup\n"));
        assert!(prompt.contains("Some content"));
        assert!(prompt.ends_with("Number of pairs:"));
    }

    #[test]
    fn test_sizing_prompt_without_heading() {
        let prompt = PromptBuilder::new("Some content").build_sizing();
        assert!(!prompt.contains("Section heading"));
    }
}
