//! Pipeline runner: documents in, tagged QA records out
//!
//! Every document is broken into units (one per non-empty section, or one
//! per document in whole-document mode). Each unit is sized, extracted and
//! tagged with its provenance independently, so a failing unit only loses
//! its own records. Output order is document order, then unit order, no
//! matter how many units run at once.

use crate::config::{GenerationMode, PipelineConfig};
use crate::document::SourceDocument;
use crate::error::ExtractorError;
use crate::extractor::QaExtractor;
use crate::sizing::WorkSizer;
use crate::splitter::SectionSplitter;
use crate::types::{GenerationRequest, RunStats};
use docqa_domain::{CompletionProvider, Provenance, QaRecord};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, warn};

/// Position of a unit: (document index, unit index within the document)
type UnitKey = (usize, usize);

/// One independently processed piece of work
struct WorkUnit {
    key: UnitKey,
    heading: Option<String>,
    content: String,
    source: Provenance,
    topic_fallback: Option<String>,
}

impl WorkUnit {
    fn label(&self) -> String {
        self.source.to_string()
    }
}

/// Records collected so far, keyed for deterministic ordering
struct Collected {
    records: BTreeMap<UnitKey, Vec<QaRecord>>,
    abandoned: usize,
}

/// Runs sizing and extraction over a set of documents
#[derive(Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    splitter: SectionSplitter,
    sizer: WorkSizer,
    extractor: QaExtractor,
}

impl Pipeline {
    /// Create a new pipeline
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Config` if the configuration is invalid.
    pub fn new(
        config: PipelineConfig,
        provider: Arc<dyn CompletionProvider>,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let call_timeout = config.call_timeout();
        Ok(Self {
            splitter: SectionSplitter::new().fence_aware(config.fence_aware),
            sizer: WorkSizer::new(Arc::clone(&provider), config.sizing.clone(), call_timeout),
            extractor: QaExtractor::new(provider, call_timeout),
            config,
        })
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Generate records for all documents
    pub async fn run(&self, documents: Vec<SourceDocument>) -> Vec<QaRecord> {
        self.run_with_stats(documents).await.0
    }

    /// Generate records for all documents and report what happened
    pub async fn run_with_stats(&self, documents: Vec<SourceDocument>) -> (Vec<QaRecord>, RunStats) {
        let mut stats = RunStats::default();
        let units = self.prepare(documents, &mut stats);
        let unit_count = units.len();

        info!(
            "Processing {} units from {} documents with model '{}'",
            unit_count,
            stats.documents_seen - stats.documents_skipped,
            self.extractor.model_name()
        );

        let collected = if self.config.concurrency == 1 {
            self.execute_sequential(units).await
        } else {
            self.execute_concurrent(units).await
        };

        stats.units_abandoned = collected.abandoned;
        stats.sections_processed = unit_count - collected.abandoned;

        let records: Vec<QaRecord> = collected.records.into_values().flatten().collect();
        stats.records = records.len();

        info!(
            "Run complete: {} records from {} units ({} skipped, {} abandoned)",
            stats.records, stats.sections_processed, stats.sections_skipped, stats.units_abandoned
        );
        (records, stats)
    }

    /// Turn documents into work units, skipping unreadable documents and empty sections
    fn prepare(&self, documents: Vec<SourceDocument>, stats: &mut RunStats) -> Vec<WorkUnit> {
        let mut units = Vec::new();

        for (doc_idx, document) in documents.into_iter().enumerate() {
            stats.documents_seen += 1;

            let text = match document.contents {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping {}: {}", document.relative_path, e);
                    stats.documents_skipped += 1;
                    continue;
                }
            };
            debug!("Preparing {}", document.relative_path);

            match self.config.mode {
                GenerationMode::Sections => {
                    let sections = self.splitter.split(&text);
                    if sections.is_empty() {
                        info!("No headings in {}", document.relative_path);
                    }
                    for (section_idx, section) in sections.into_iter().enumerate() {
                        if section.is_empty() {
                            info!(
                                "Skipping empty section: {}/{}",
                                document.relative_path,
                                section.path_string()
                            );
                            stats.sections_skipped += 1;
                            continue;
                        }
                        units.push(WorkUnit {
                            key: (doc_idx, section_idx),
                            content: section.body().to_string(),
                            source: Provenance::new(document.relative_path.as_str())
                                .with_segments(section.path),
                            heading: Some(section.title),
                            topic_fallback: None,
                        });
                    }
                }
                GenerationMode::WholeDocument => {
                    let body = text.trim();
                    if body.is_empty() {
                        info!("Skipping empty document: {}", document.relative_path);
                        stats.sections_skipped += 1;
                        continue;
                    }
                    units.push(WorkUnit {
                        key: (doc_idx, 0),
                        heading: None,
                        content: body.to_string(),
                        source: Provenance::new(document.relative_path.as_str()),
                        topic_fallback: Some(document.name),
                    });
                }
            }
        }

        units
    }

    /// Instant the run must finish by; a budget past the clock's range means none
    fn deadline(&self) -> Option<Instant> {
        self.config
            .deadline()
            .and_then(|budget| Instant::now().checked_add(budget))
    }

    async fn execute_sequential(&self, units: Vec<WorkUnit>) -> Collected {
        let deadline = self.deadline();
        let total = units.len();
        let mut records = BTreeMap::new();

        for (done, unit) in units.into_iter().enumerate() {
            let work = process_unit(&self.sizer, &self.extractor, &unit);
            let output = match deadline {
                Some(at) => match timeout_at(at, work).await {
                    Ok(output) => output,
                    Err(_) => {
                        let abandoned = total - done;
                        warn!("Run deadline reached, abandoning {} units", abandoned);
                        return Collected { records, abandoned };
                    }
                },
                None => work.await,
            };
            records.insert(unit.key, output);
        }

        Collected {
            records,
            abandoned: 0,
        }
    }

    async fn execute_concurrent(&self, units: Vec<WorkUnit>) -> Collected {
        let deadline = self.deadline();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut join_set = JoinSet::new();

        for unit in units {
            let permit = Arc::clone(&semaphore);
            let sizer = self.sizer.clone();
            let extractor = self.extractor.clone();

            join_set.spawn(async move {
                let Ok(_permit) = permit.acquire().await else {
                    return (unit.key, Vec::new());
                };
                let records = process_unit(&sizer, &extractor, &unit).await;
                (unit.key, records)
            });
        }

        let mut records = BTreeMap::new();
        loop {
            let next = match deadline {
                Some(at) => match timeout_at(at, join_set.join_next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        let abandoned = join_set.len();
                        warn!("Run deadline reached, abandoning {} units", abandoned);
                        join_set.abort_all();
                        return Collected { records, abandoned };
                    }
                },
                None => join_set.join_next().await,
            };

            let Some(joined) = next else { break };
            match joined {
                Ok((key, output)) => {
                    records.insert(key, output);
                }
                Err(e) => error!("Generation task failed: {}", e),
            }
        }

        Collected {
            records,
            abandoned: 0,
        }
    }
}

/// Size, extract and tag a single unit
async fn process_unit(sizer: &WorkSizer, extractor: &QaExtractor, unit: &WorkUnit) -> Vec<QaRecord> {
    let label = unit.label();
    info!("Generating QA pairs for {}", label);

    let heading = unit.heading.as_deref();
    let count = sizer.size(heading, &unit.content).await;
    let request = match heading {
        Some(title) => GenerationRequest::section(title, &unit.content, count),
        None => GenerationRequest::document(&unit.content, count),
    };
    let records = extractor.extract(request).await;
    debug!("{} records (requested {:?}) for {}", records.len(), count, label);

    records
        .into_iter()
        .map(|record| tag_record(record, unit))
        .collect()
}

/// Attach provenance; whole-document units also fill a missing topic
fn tag_record(mut record: QaRecord, unit: &WorkUnit) -> QaRecord {
    match &unit.topic_fallback {
        Some(fallback) => {
            let topic = record.topic.get_or_insert_with(|| fallback.clone()).clone();
            let source = unit.source.clone().with_segments([topic]);
            record.with_source(source.to_string())
        }
        None => record.with_source(unit.source.to_string()),
    }
}
