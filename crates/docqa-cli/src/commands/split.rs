//! Split command implementation.

use crate::cli::{SplitArgs, SplitFormat};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use docqa_domain::Section;
use docqa_extractor::SectionSplitter;
use serde_json::{json, Value};
use std::fs;

/// Execute the split command.
pub async fn execute_split(args: SplitArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = fs::read_to_string(&args.file)?;
    let fence_aware = args.fence_aware || config.generation.fence_aware;
    let sections = SectionSplitter::new().fence_aware(fence_aware).split(&text);

    match args.format {
        SplitFormat::Text => println!("{}", formatter.sections_text(&sections)),
        SplitFormat::Json => println!("{}", serde_json::to_string_pretty(&sections_json(&sections))?),
    }

    Ok(())
}

fn sections_json(sections: &[Section]) -> Value {
    Value::Array(
        sections
            .iter()
            .map(|section| {
                json!({
                    "title": section.title,
                    "level": section.level,
                    "path": section.path,
                    "heading": section.heading,
                    "body": section.body(),
                })
            })
            .collect(),
    )
}
