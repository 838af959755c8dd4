//! Convert command implementation.

use crate::cli::{ConvertAction, ConvertArgs};
use crate::config::Config;
use crate::convert::{csv_to_jsonl, jsonl_to_csv, load_mappings, FieldMappings};
use crate::error::Result;
use crate::output::Formatter;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

/// Execute the convert command.
pub async fn execute_convert(
    args: ConvertArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let (rows, output) = match args.action {
        ConvertAction::CsvToJsonl {
            csv,
            jsonl,
            mappings,
        } => {
            let mappings = resolve_mappings(mappings.as_deref(), config)?;
            let input = BufReader::new(File::open(&csv)?);
            let rows = csv_to_jsonl(input, BufWriter::new(create_output(&jsonl)?), &mappings)?;
            (rows, jsonl)
        }
        ConvertAction::JsonlToCsv {
            jsonl,
            csv,
            mappings,
        } => {
            let mappings = resolve_mappings(mappings.as_deref(), config)?;
            let input = BufReader::new(File::open(&jsonl)?);
            let rows = jsonl_to_csv(input, BufWriter::new(create_output(&csv)?), &mappings)?;
            (rows, csv)
        }
    };

    info!("Converted {} row(s) into {}", rows, output.display());
    println!(
        "{}",
        formatter.success(&format!("Converted {} row(s) to {}", rows, output.display()))
    );
    Ok(())
}

fn resolve_mappings(path: Option<&Path>, config: &Config) -> Result<FieldMappings> {
    match path {
        Some(path) => load_mappings(path),
        None => Ok(config.field_mappings.clone()),
    }
}

fn create_output(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_convert_uses_config_mappings() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("qa.csv");
        let jsonl = dir.path().join("out").join("qa.jsonl");
        fs::write(&csv, "question,answer\nQ,A\n").unwrap();

        let mut config = Config::default();
        config
            .field_mappings
            .insert("question".to_string(), "prompt".to_string());

        let args = ConvertArgs {
            action: ConvertAction::CsvToJsonl {
                csv,
                jsonl: jsonl.clone(),
                mappings: None,
            },
        };
        execute_convert(args, &config, &Formatter::new(false))
            .await
            .unwrap();

        assert_eq!(
            fs::read_to_string(&jsonl).unwrap(),
            "{\"prompt\":\"Q\",\"answer\":\"A\"}\n"
        );
    }

    #[tokio::test]
    async fn test_convert_mapping_file_overrides_config() {
        let dir = TempDir::new().unwrap();
        let jsonl = dir.path().join("qa.jsonl");
        let csv = dir.path().join("qa.csv");
        let mappings = dir.path().join("mappings.toml");
        fs::write(&jsonl, "{\"input\":\"Q\",\"output\":\"A\"}\n").unwrap();
        fs::write(
            &mappings,
            "[field_mappings]\nquestion = \"input\"\nanswer = \"output\"\n",
        )
        .unwrap();

        let args = ConvertArgs {
            action: ConvertAction::JsonlToCsv {
                jsonl,
                csv: csv.clone(),
                mappings: Some(mappings),
            },
        };
        execute_convert(args, &Config::default(), &Formatter::new(false))
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(&csv).unwrap(), "question,answer\nQ,A\n");
    }

    #[tokio::test]
    async fn test_convert_missing_input() {
        let dir = TempDir::new().unwrap();
        let args = ConvertArgs {
            action: ConvertAction::CsvToJsonl {
                csv: dir.path().join("missing.csv"),
                jsonl: dir.path().join("out.jsonl"),
                mappings: None,
            },
        };
        assert!(execute_convert(args, &Config::default(), &Formatter::new(false))
            .await
            .is_err());
    }
}
