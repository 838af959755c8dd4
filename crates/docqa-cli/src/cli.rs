//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand, ValueEnum};
use docqa_extractor::{GenerationMode, SizingStrategy};
use std::path::PathBuf;

/// docqa - Generate question-answer datasets from markdown documentation.
#[derive(Debug, Parser)]
#[command(name = "docqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "DOCQA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate QA pairs for every markdown file in the docs directory
    Generate(GenerateArgs),

    /// Show how a markdown file is split into sections
    Split(SplitArgs),

    /// Convert between CSV and JSONL datasets
    Convert(ConvertArgs),
}

/// Generation mode option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// One prompt per markdown section
    Sections,
    /// One prompt per file
    WholeDocument,
}

impl From<ModeArg> for GenerationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sections => GenerationMode::Sections,
            ModeArg::WholeDocument => GenerationMode::WholeDocument,
        }
    }
}

/// Sizing strategy option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SizingArg {
    /// Count from content length
    Heuristic,
    /// Ask the model for the count
    Delegated,
    /// Let the model write as many pairs as it sees fit
    Implicit,
}

impl From<SizingArg> for SizingStrategy {
    fn from(sizing: SizingArg) -> Self {
        match sizing {
            SizingArg::Heuristic => SizingStrategy::Heuristic,
            SizingArg::Delegated => SizingStrategy::Delegated,
            SizingArg::Implicit => SizingStrategy::Implicit,
        }
    }
}

/// Arguments for the generate command.
#[derive(Debug, Default, Parser)]
pub struct GenerateArgs {
    /// Directory containing markdown files (overrides docs.dir)
    #[arg(short, long)]
    pub docs_dir: Option<PathBuf>,

    /// Output CSV file (overrides output.path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Generation mode (overrides generation.mode)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Sizing strategy (overrides generation.sizing.strategy)
    #[arg(short, long, value_enum)]
    pub sizing: Option<SizingArg>,

    /// Units processed at once (overrides generation.concurrency)
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Also scan subdirectories (overrides docs.recursive)
    #[arg(short, long)]
    pub recursive: bool,
}

/// Output format for the split command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SplitFormat {
    /// One line per section
    #[default]
    Text,
    /// JSON array of sections
    Json,
}

/// Arguments for the split command.
#[derive(Debug, Parser)]
pub struct SplitArgs {
    /// Markdown file to split
    pub file: PathBuf,

    /// Ignore headings inside fenced code blocks
    #[arg(long)]
    pub fence_aware: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: SplitFormat,
}

/// Arguments for the convert command.
#[derive(Debug, Parser)]
pub struct ConvertArgs {
    #[command(subcommand)]
    pub action: ConvertAction,
}

/// Conversion directions.
#[derive(Debug, Subcommand)]
pub enum ConvertAction {
    /// Turn each CSV row into a JSON object
    CsvToJsonl {
        /// Input CSV file
        #[arg(long)]
        csv: PathBuf,

        /// Output JSONL file
        #[arg(long)]
        jsonl: PathBuf,

        /// TOML file with a [field_mappings] table (defaults to the loaded config's)
        #[arg(long)]
        mappings: Option<PathBuf>,
    },

    /// Turn each JSON line into a CSV row
    JsonlToCsv {
        /// Input JSONL file
        #[arg(long)]
        jsonl: PathBuf,

        /// Output CSV file
        #[arg(long)]
        csv: PathBuf,

        /// TOML file with a [field_mappings] table (defaults to the loaded config's)
        #[arg(long)]
        mappings: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_overrides() {
        let cli = Cli::parse_from([
            "docqa",
            "generate",
            "--docs-dir",
            "docs/guides",
            "--mode",
            "whole-document",
            "--sizing",
            "heuristic",
            "-j",
            "4",
        ]);

        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.docs_dir, Some(PathBuf::from("docs/guides")));
                assert_eq!(args.mode, Some(ModeArg::WholeDocument));
                assert_eq!(args.sizing, Some(SizingArg::Heuristic));
                assert_eq!(args.concurrency, Some(4));
                assert!(!args.recursive);
            }
            other => panic!("Expected generate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_implicit_sizing() {
        let cli = Cli::parse_from(["docqa", "generate", "-s", "implicit"]);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.sizing, Some(SizingArg::Implicit));
                assert_eq!(
                    SizingStrategy::from(SizingArg::Implicit),
                    SizingStrategy::Implicit
                );
            }
            other => panic!("Expected generate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from([
            "docqa", "convert", "csv-to-jsonl", "--csv", "in.csv", "--jsonl", "out.jsonl",
        ]);
        match cli.command {
            Command::Convert(ConvertArgs {
                action: ConvertAction::CsvToJsonl { csv, mappings, .. },
            }) => {
                assert_eq!(csv, PathBuf::from("in.csv"));
                assert!(mappings.is_none());
            }
            other => panic!("Expected convert, got {:?}", other),
        }
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["docqa", "-v", "-q", "split", "a.md"]).is_err());
    }
}
