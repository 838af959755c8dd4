//! docqa Domain Layer
//!
//! Value types and boundary traits shared by every other docqa crate.
//!
//! ## Key Concepts
//!
//! - **Section**: a span of markdown text governed by one heading
//! - **Heading path**: the ancestor titles that locate a section in the document
//! - **QaRecord**: one generated question/answer pair plus its provenance
//! - **Provenance**: the `<document>/<section path>` string tying a record to its origin
//! - **CompletionProvider**: the prompt-in, text-out boundary to a language model
//!
//! ## Architecture
//!
//! This crate holds no I/O. Provider implementations live in `docqa-llm`,
//! the sectioning and extraction pipeline lives in `docqa-extractor`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod provenance;
pub mod record;
pub mod section;
pub mod traits;

// Re-exports for convenience
pub use provenance::Provenance;
pub use record::QaRecord;
pub use section::Section;
pub use traits::{CompletionError, CompletionProvider};
