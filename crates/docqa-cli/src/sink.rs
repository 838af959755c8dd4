//! CSV result sink.

use crate::error::Result;
use docqa_domain::QaRecord;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Writes QA records as CSV with a `question,answer[,source]` header
#[derive(Debug, Clone, Copy)]
pub struct CsvSink {
    include_source: bool,
}

impl CsvSink {
    /// Create a sink; `include_source` controls the third column
    pub fn new(include_source: bool) -> Self {
        Self { include_source }
    }

    /// Column names in output order
    pub fn header(&self) -> &'static [&'static str] {
        if self.include_source {
            &["question", "answer", "source"]
        } else {
            &["question", "answer"]
        }
    }

    /// Write `records` to `path`, creating parent directories.
    ///
    /// With no records nothing is written and `Ok(false)` is returned.
    pub fn write(&self, path: &Path, records: &[QaRecord]) -> Result<bool> {
        if records.is_empty() {
            warn!("No QA pairs to write, leaving {} untouched", path.display());
            return Ok(false);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.write_to(File::create(path)?, records)?;
        info!("Saved {} QA pairs to {}", records.len(), path.display());
        Ok(true)
    }

    /// Write the header and one row per record to `writer`.
    pub fn write_to<W: Write>(&self, writer: W, records: &[QaRecord]) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.header())?;

        for record in records {
            if self.include_source {
                csv_writer.write_record([
                    record.question.as_str(),
                    record.answer.as_str(),
                    record.source.as_deref().unwrap_or_default(),
                ])?;
            } else {
                csv_writer.write_record([record.question.as_str(), record.answer.as_str()])?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}
