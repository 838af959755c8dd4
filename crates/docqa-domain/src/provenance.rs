//! Provenance tracking for generated records

use std::fmt;

/// Source of a generated record: a document plus a position inside it
///
/// Renders as `<document>/<segment>/<segment>...`, always with `/`
/// separators so output files are identical across platforms.
///
/// # Examples
///
/// ```
/// use docqa_domain::Provenance;
///
/// let source = Provenance::new("docs/guide.md")
///     .with_segments(["Setup", "Install"]);
/// assert_eq!(source.to_string(), "docs/guide.md/Setup/Install");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Document path relative to the provenance root
    pub document: String,

    /// Heading path or topic inside the document
    pub segments: Vec<String>,
}

impl Provenance {
    /// Create a provenance entry pointing at a whole document
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: normalize_separators(&document.into()),
            segments: Vec::new(),
        }
    }

    /// Append position segments (heading titles or a topic)
    pub fn with_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments.extend(segments.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.document)?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}
