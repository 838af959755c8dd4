//! Configuration management for the CLI.
//!
//! The configuration is a TOML file with `[docs]`, `[model]`,
//! `[generation]`, `[output]` and `[field_mappings]` tables. Every table and
//! field is optional; command-line flags override what the file says.

use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use docqa_extractor::{GenerationMode, PipelineConfig, SizingConfig};
use docqa_llm::ModelConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "docqa.toml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the documents are
    #[serde(default)]
    pub docs: DocsConfig,

    /// Which model to use
    #[serde(default)]
    pub model: ModelConfig,

    /// How to generate
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Where to write the results
    #[serde(default)]
    pub output: OutputConfig,

    /// Column renames used by `convert` (csv name -> jsonl name)
    #[serde(default)]
    pub field_mappings: BTreeMap<String, String>,
}

/// The `[docs]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Directory containing markdown files
    #[serde(default = "default_docs_dir")]
    pub dir: PathBuf,

    /// Also scan subdirectories
    #[serde(default)]
    pub recursive: bool,

    /// Provenance paths are relative to this; defaults to the parent of `dir`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

/// The `[generation]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Section-by-section or whole-document
    #[serde(default)]
    pub mode: GenerationMode,

    /// Units processed at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-call timeout (seconds)
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,

    /// Overall run budget (seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,

    /// Ignore headings inside fenced code blocks
    #[serde(default)]
    pub fence_aware: bool,

    /// The `[generation.sizing]` table: strategy and its bounds
    #[serde(default)]
    pub sizing: SizingConfig,
}

/// The `[output]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// CSV file to write
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Write the `source` column
    #[serde(default = "default_true")]
    pub include_source: bool,
}

impl Config {
    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Candidate config locations, most specific first.
    pub fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
        if let Some(path) = explicit {
            return vec![path.to_path_buf()];
        }
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("docqa").join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `./docqa.toml` and then the
    /// user config directory are tried, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Config file {} not found",
                    path.display()
                )));
            }
        }

        for path in Self::search_paths(explicit) {
            if path.exists() {
                debug!("Loading configuration from {}", path.display());
                let contents = fs::read_to_string(&path)?;
                return Self::from_toml(&contents);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Apply command-line overrides from `generate`.
    pub fn apply_overrides(&mut self, args: &GenerateArgs) {
        if let Some(dir) = &args.docs_dir {
            self.docs.dir = dir.clone();
        }
        if let Some(path) = &args.output {
            self.output.path = path.clone();
        }
        if let Some(mode) = args.mode {
            self.generation.mode = mode.into();
        }
        if let Some(sizing) = args.sizing {
            self.generation.sizing.strategy = sizing.into();
        }
        if let Some(concurrency) = args.concurrency {
            self.generation.concurrency = concurrency;
        }
        if args.recursive {
            self.docs.recursive = true;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.model.validate().map_err(CliError::Config)?;
        self.pipeline_config().validate().map_err(CliError::Config)?;
        if self.output.path.as_os_str().is_empty() {
            return Err(CliError::Config("output.path cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Build the pipeline configuration from the `[generation]` table.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let generation = &self.generation;
        PipelineConfig {
            mode: generation.mode,
            call_timeout_secs: generation.call_timeout_secs,
            concurrency: generation.concurrency,
            deadline_secs: generation.deadline_secs,
            fence_aware: generation.fence_aware,
            sizing: generation.sizing.clone(),
        }
    }

    /// Directory provenance paths are computed against.
    pub fn provenance_root(&self) -> PathBuf {
        match &self.docs.root {
            Some(root) => root.clone(),
            None => self
                .docs
                .dir
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: default_docs_dir(),
            recursive: false,
            root: None,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            mode: GenerationMode::default(),
            concurrency: default_concurrency(),
            call_timeout_secs: default_call_timeout(),
            deadline_secs: None,
            fence_aware: false,
            sizing: SizingConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            include_source: true,
        }
    }
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("qa_results.csv")
}

fn default_concurrency() -> usize {
    1
}

fn default_call_timeout() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ModeArg, SizingArg};
    use docqa_extractor::SizingStrategy;
    use docqa_llm::ProviderKind;
    use tempfile::TempDir;

    const FULL: &str = r#"
[docs]
dir = "docs/guides"
recursive = true
root = "docs"

[model]
provider = "openai"
id = "gpt-4o-mini"

[model.parameters]
temperature = 0.2
top-p = 0.9
max-tokens = 1024

[generation]
mode = "whole-document"
concurrency = 4
call_timeout_secs = 60
deadline_secs = 3600
fence_aware = true

[generation.sizing]
strategy = "heuristic"
chars_per_question = 300
heuristic_max = 12

[output]
path = "out/qa.csv"
include_source = false

[field_mappings]
question = "prompt"
answer = "completion"
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.docs.dir, PathBuf::from("docs"));
        assert_eq!(config.output.path, PathBuf::from("qa_results.csv"));
        assert!(config.output.include_source);
        assert_eq!(config.generation.mode, GenerationMode::Sections);
        assert_eq!(config.generation.sizing.strategy, SizingStrategy::Delegated);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(FULL).unwrap();

        assert!(config.docs.recursive);
        assert_eq!(config.provenance_root(), PathBuf::from("docs"));
        assert_eq!(config.model.provider, ProviderKind::OpenAi);
        assert_eq!(config.model.parameters.top_p, Some(0.9));
        assert_eq!(config.model.parameters.max_tokens, 1024);
        assert_eq!(config.field_mappings["question"], "prompt");
        assert!(!config.output.include_source);

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.mode, GenerationMode::WholeDocument);
        assert_eq!(pipeline.sizing.strategy, SizingStrategy::Heuristic);
        assert_eq!(pipeline.sizing.chars_per_question, 300);
        assert_eq!(pipeline.sizing.heuristic_min, 3);
        assert_eq!(pipeline.sizing.heuristic_max, 12);
        assert_eq!(pipeline.concurrency, 4);
        assert_eq!(pipeline.deadline_secs, Some(3600));
        assert!(pipeline.fence_aware);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result = Config::from_toml("[model]\nprovider = \"watson\"\nid = \"x\"\n");
        assert!(matches!(result, Err(CliError::Toml(_))));
    }

    #[test]
    fn test_provenance_root_defaults_to_parent() {
        let mut config = Config::default();
        config.docs.dir = PathBuf::from("site/docs/guides");
        assert_eq!(config.provenance_root(), PathBuf::from("site/docs"));

        config.docs.dir = PathBuf::from("guides");
        assert_eq!(config.provenance_root(), PathBuf::from(""));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::from_toml(FULL).unwrap();
        config.apply_overrides(&GenerateArgs {
            docs_dir: Some(PathBuf::from("other")),
            output: Some(PathBuf::from("x.csv")),
            mode: Some(ModeArg::Sections),
            sizing: Some(SizingArg::Delegated),
            concurrency: Some(2),
            recursive: false,
        });

        assert_eq!(config.docs.dir, PathBuf::from("other"));
        assert_eq!(config.output.path, PathBuf::from("x.csv"));
        assert_eq!(config.generation.mode, GenerationMode::Sections);
        assert_eq!(config.generation.sizing.strategy, SizingStrategy::Delegated);
        assert_eq!(config.generation.concurrency, 2);
        assert!(config.docs.recursive);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.generation.concurrency = 0;
        assert!(matches!(config.validate(), Err(CliError::Config(_))));

        let mut config = Config::default();
        config.model.parameters.temperature = 5.0;
        assert!(config.validate().is_err());

        let config = Config::from_toml(
            "[generation.sizing]\nheuristic_min = 30\nheuristic_max = 5\n",
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::from_toml(FULL).unwrap();
        let parsed = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.field_mappings, config.field_mappings);
        assert_eq!(parsed.generation.deadline_secs, Some(3600));
        assert_eq!(parsed.generation.sizing, config.generation.sizing);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, FULL).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.model.id, "gpt-4o-mini");

        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
