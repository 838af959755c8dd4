//! Markdown section splitting
//!
//! Turns flat markdown text into an ordered list of [`Section`]s. Each
//! section carries its heading path, so `## Install` under `# Setup` is
//! addressable as `Setup/Install`.

use docqa_domain::Section;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// A document split into its preamble and headed sections
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitDocument {
    /// Text before the first heading line (possibly empty)
    pub preamble: String,

    /// Sections in document order
    pub sections: Vec<Section>,
}

impl SplitDocument {
    /// Reassemble the source text
    pub fn reconstruct(&self) -> String {
        let mut text = self.preamble.clone();
        for section in &self.sections {
            text.push_str(&section.heading);
            text.push_str(&section.content);
        }
        text
    }
}

/// Splits markdown text on ATX headings (`#` through `######`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionSplitter {
    fence_aware: bool,
}

struct HeadingMatch {
    span: Range<usize>,
    level: u8,
    title: String,
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        Regex::new(r"(?mR)^(#{1,6})[ \t]+(.+?)[ \t]*$").expect("heading regex is valid")
    })
}

impl SectionSplitter {
    /// Create a splitter that treats every heading-like line as a heading
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore heading-like lines inside ``` and ~~~ fenced blocks
    pub fn fence_aware(mut self, enabled: bool) -> Self {
        self.fence_aware = enabled;
        self
    }

    /// Split text into sections, discarding the preamble
    pub fn split(&self, text: &str) -> Vec<Section> {
        self.split_document(text).sections
    }

    /// Split text into a preamble and sections
    ///
    /// Never fails. Text with no headings yields an empty section list and
    /// the whole text as preamble.
    pub fn split_document(&self, text: &str) -> SplitDocument {
        let headings = self.find_headings(text);

        let Some(first) = headings.first() else {
            return SplitDocument {
                preamble: text.to_string(),
                sections: Vec::new(),
            };
        };

        let preamble = text[..first.span.start].to_string();
        let mut stack: Vec<(u8, String)> = Vec::new();
        let mut sections = Vec::with_capacity(headings.len());

        for (idx, heading) in headings.iter().enumerate() {
            while stack.last().is_some_and(|(level, _)| *level >= heading.level) {
                stack.pop();
            }
            stack.push((heading.level, heading.title.clone()));

            let content_end = headings
                .get(idx + 1)
                .map_or(text.len(), |next| next.span.start);

            sections.push(Section::new(
                heading.title.clone(),
                heading.level,
                stack.iter().map(|(_, title)| title.clone()).collect(),
                &text[heading.span.clone()],
                &text[heading.span.end..content_end],
            ));
        }

        SplitDocument { preamble, sections }
    }

    fn find_headings(&self, text: &str) -> Vec<HeadingMatch> {
        let fenced = if self.fence_aware {
            fenced_ranges(text)
        } else {
            Vec::new()
        };

        heading_regex()
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if fenced.iter().any(|range| range.contains(&whole.start())) {
                    return None;
                }
                let title = caps.get(2)?.as_str().trim();
                if title.is_empty() {
                    return None;
                }
                Some(HeadingMatch {
                    span: whole.range(),
                    level: caps.get(1)?.as_str().len() as u8,
                    title: title.to_string(),
                })
            })
            .collect()
    }
}

/// Byte ranges covered by fenced code blocks, fence lines included
///
/// A block opened with backticks only closes on backticks, likewise for
/// tildes. An unclosed block runs to the end of the text.
fn fenced_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut open: Option<(char, usize)> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let marker = fence_marker(line);
        match (open, marker) {
            (None, Some(ch)) => open = Some((ch, offset)),
            (Some((ch, start)), Some(closing)) if ch == closing => {
                ranges.push(start..offset + line.len());
                open = None;
            }
            _ => {}
        }
        offset += line.len();
    }

    if let Some((_, start)) = open {
        ranges.push(start..text.len());
    }
    ranges
}

fn fence_marker(line: &str) -> Option<char> {
    let trimmed = line.trim_start_matches([' ', '\t']);
    if trimmed.starts_with("```") {
        Some('`')
    } else if trimmed.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}
