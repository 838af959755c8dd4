//! docqa Extractor
//!
//! Turns markdown documentation into question-answer records using an LLM.
//!
//! # Overview
//!
//! The extractor is the core of docqa. It splits documents into headed
//! sections, decides how many pairs each section deserves, asks the model
//! for those pairs, parses whatever the model replies and tags every record
//! with the section it came from.
//!
//! # Architecture
//!
//! ```text
//! SourceDocument → SectionSplitter → WorkSizer → QaExtractor → tagged QaRecords
//! ```
//!
//! # Key Features
//!
//! - **Heading hierarchy**: every section knows its ancestor headings
//! - **Work sizing**: length heuristic or a model judgment, clamped and with a fallback
//! - **Tolerant parsing**: JSON arrays bare or inside fenced blocks, bad elements dropped
//! - **Failure isolation**: a failing section or unreadable file only loses its own records
//! - **Bounded concurrency**: optional worker pool with deterministic output order
//!
//! # Example Usage
//!
//! ```no_run
//! use docqa_extractor::{Pipeline, PipelineConfig, SourceDocument};
//! use docqa_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(MockProvider::new(r#"[{"question":"Q?","answer":"A."}]"#));
//! let pipeline = Pipeline::new(PipelineConfig::default(), provider)?;
//!
//! let documents = vec![SourceDocument::from_text(
//!     "docs/guide.md",
//!     "# Setup\nInstall the tool.\n",
//! )];
//! let records = pipeline.run(documents).await;
//!
//! for record in records {
//!     println!("{} -> {}", record.question, record.source.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod document;
mod error;
mod extractor;
mod parser;
mod pipeline;
mod prompt;
mod sizing;
mod splitter;
mod types;


pub use config::{GenerationMode, PipelineConfig, SizingConfig, SizingStrategy};
pub use document::{discover_documents, load_documents, SourceDocument};
pub use error::ExtractorError;
pub use extractor::QaExtractor;
pub use parser::{extract_json, parse_llm_response};
pub use pipeline::Pipeline;
pub use prompt::PromptBuilder;
pub use sizing::{parse_count, WorkSizer};
pub use splitter::{SectionSplitter, SplitDocument};
pub use types::{GenerationRequest, RunStats};
