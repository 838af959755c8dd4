//! Generate command implementation.

use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::sink::CsvSink;
use docqa_domain::{CompletionProvider, QaRecord};
use docqa_extractor::{load_documents, Pipeline, RunStats};
use docqa_llm::build_provider;
use std::sync::Arc;
use tracing::{info, warn};

/// Execute the generate command.
pub async fn execute_generate(
    args: GenerateArgs,
    mut config: Config,
    formatter: &Formatter,
) -> Result<()> {
    config.apply_overrides(&args);
    config.validate()?;

    let provider = build_provider(&config.model)?;
    let (records, stats) = run_generation(&config, provider).await?;

    if stats.documents_seen == 0 {
        println!(
            "{}",
            formatter.warning(&format!(
                "No markdown files found in {}",
                config.docs.dir.display()
            ))
        );
        return Ok(());
    }

    let sink = CsvSink::new(config.output.include_source);
    if !sink.write(&config.output.path, &records)? {
        println!("{}", formatter.warning("No QA pairs were generated"));
        return Ok(());
    }

    println!("{}", formatter.run_summary(&stats, &config.output.path));
    Ok(())
}

/// Discover documents and run the pipeline over them.
pub async fn run_generation(
    config: &Config,
    provider: Arc<dyn CompletionProvider>,
) -> Result<(Vec<QaRecord>, RunStats)> {
    let root = config.provenance_root();
    let documents = load_documents(&config.docs.dir, &root, config.docs.recursive)?;
    if documents.is_empty() {
        warn!("No markdown files found in {}", config.docs.dir.display());
        return Ok((Vec::new(), RunStats::default()));
    }

    info!(
        "Found {} markdown files in {}",
        documents.len(),
        config.docs.dir.display()
    );

    let pipeline = Pipeline::new(config.pipeline_config(), provider)?;
    let (records, stats) = pipeline.run_with_stats(documents).await;
    if records.is_empty() {
        warn!("No QA pairs were generated");
    }
    Ok((records, stats))
}
