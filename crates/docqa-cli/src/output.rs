//! Output formatting for the CLI.

use colored::*;
use docqa_domain::Section;
use docqa_extractor::RunStats;
use std::path::Path;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Summarize a generation run.
    pub fn run_summary(&self, stats: &RunStats, output: &Path) -> String {
        let mut lines = vec![self.success(&format!(
            "Wrote {} record(s) to {}",
            stats.records,
            output.display()
        ))];
        lines.push(self.info(&format!(
            "{} document(s), {} unit(s) processed, {} empty section(s) skipped",
            stats.documents_seen, stats.sections_processed, stats.sections_skipped
        )));
        if stats.documents_skipped > 0 {
            lines.push(self.warning(&format!(
                "{} document(s) could not be read",
                stats.documents_skipped
            )));
        }
        if stats.units_abandoned > 0 {
            lines.push(self.warning(&format!(
                "{} unit(s) abandoned at the run deadline",
                stats.units_abandoned
            )));
        }
        lines.join("\n")
    }

    /// One line per section: indented title, heading path and body size.
    pub fn sections_text(&self, sections: &[Section]) -> String {
        if sections.is_empty() {
            return self.warning("No headings found.");
        }

        sections
            .iter()
            .map(|section| {
                let indent = "  ".repeat(section.depth());
                let path = self.colorize(&section.path_string(), "cyan");
                format!(
                    "{}{} [{}] ({} chars)",
                    indent,
                    section.title,
                    path,
                    section.body().chars().count()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
