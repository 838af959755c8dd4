//! Section module - one markdown heading and the text it governs

/// A headed span of a markdown document
///
/// Sections are produced in document order by the splitter in
/// `docqa-extractor`. Concatenating every section's `heading` and `content`
/// (after any preamble) reproduces the source text exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text, trimmed
    pub title: String,

    /// Heading depth (1-6)
    pub level: u8,

    /// Titles of the open ancestor headings, ending with `title`
    pub path: Vec<String>,

    /// The heading line exactly as written, without its line terminator
    pub heading: String,

    /// Everything between the end of the heading line and the next heading line
    pub content: String,
}

impl Section {
    /// Create a new section
    pub fn new(
        title: impl Into<String>,
        level: u8,
        path: Vec<String>,
        heading: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            level,
            path,
            heading: heading.into(),
            content: content.into(),
        }
    }

    /// The section text with surrounding whitespace removed
    ///
    /// # Examples
    ///
    /// ```
    /// use docqa_domain::Section;
    ///
    /// let section = Section::new("Intro", 1, vec!["Intro".into()], "# Intro", "\nSome text.\n");
    /// assert_eq!(section.body(), "Some text.");
    /// ```
    pub fn body(&self) -> &str {
        self.content.trim()
    }

    /// Whether the section has no text beyond whitespace
    pub fn is_empty(&self) -> bool {
        self.body().is_empty()
    }

    /// The heading path joined with `/`
    pub fn path_string(&self) -> String {
        self.path.join("/")
    }

    /// Number of ancestors above this section
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> Section {
        Section::new(
            "Install",
            2,
            vec!["Setup".to_string(), "Install".to_string()],
            "## Install",
            "\n\nRun the installer.\n\n",
        )
    }

    #[test]
    fn test_body_is_trimmed() {
        assert_eq!(nested().body(), "Run the installer.");
    }

    #[test]
    fn test_path_string() {
        assert_eq!(nested().path_string(), "Setup/Install");
    }

    #[test]
    fn test_depth() {
        assert_eq!(nested().depth(), 1);
    }

    #[test]
    fn test_whitespace_only_section_is_empty() {
        let section = Section::new("Blank", 1, vec!["Blank".to_string()], "# Blank", "\n   \n");
        assert!(section.is_empty());
        assert!(!nested().is_empty());
    }
}
