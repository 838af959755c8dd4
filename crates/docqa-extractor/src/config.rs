//! Configuration for the generation pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a single generation unit covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// One unit per markdown heading
    Sections,
    /// One unit per document, no sectioning
    WholeDocument,
}

impl Default for GenerationMode {
    fn default() -> Self {
        GenerationMode::Sections
    }
}

/// How the number of requested pairs is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizingStrategy {
    /// Derive the count from content length, no model call
    Heuristic,
    /// Ask the model how many pairs the content needs
    Delegated,
    /// Request no count; the model writes as many pairs as the content needs
    Implicit,
}

impl Default for SizingStrategy {
    fn default() -> Self {
        SizingStrategy::Delegated
    }
}

/// Bounds and constants used by the work sizer
///
/// `Implicit` ignores every bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Strategy in use
    #[serde(default)]
    pub strategy: SizingStrategy,

    /// Heuristic: characters of content per requested pair
    #[serde(default = "default_chars_per_question")]
    pub chars_per_question: usize,

    /// Heuristic: lower bound
    #[serde(default = "default_heuristic_min")]
    pub heuristic_min: usize,

    /// Heuristic: upper bound
    #[serde(default = "default_heuristic_max")]
    pub heuristic_max: usize,

    /// Delegated: lower bound applied to the model's answer
    #[serde(default = "default_delegated_min")]
    pub delegated_min: usize,

    /// Delegated: upper bound applied to the model's answer
    #[serde(default = "default_delegated_max")]
    pub delegated_max: usize,

    /// Delegated: count used when the model's answer is unusable
    #[serde(default = "default_fallback")]
    pub fallback: usize,
}

impl SizingConfig {
    /// Sizing config with the given strategy and default bounds
    pub fn with_strategy(strategy: SizingStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Validate the bounds
    pub fn validate(&self) -> Result<(), String> {
        if self.chars_per_question == 0 {
            return Err("chars_per_question must be greater than 0".to_string());
        }
        if self.heuristic_min > self.heuristic_max {
            return Err("heuristic_min cannot exceed heuristic_max".to_string());
        }
        if self.delegated_min == 0 {
            return Err("delegated_min must be greater than 0".to_string());
        }
        if self.delegated_min > self.delegated_max {
            return Err("delegated_min cannot exceed delegated_max".to_string());
        }
        Ok(())
    }
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            strategy: SizingStrategy::default(),
            chars_per_question: default_chars_per_question(),
            heuristic_min: default_heuristic_min(),
            heuristic_max: default_heuristic_max(),
            delegated_min: default_delegated_min(),
            delegated_max: default_delegated_max(),
            fallback: default_fallback(),
        }
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Section-by-section or whole-document generation
    #[serde(default)]
    pub mode: GenerationMode,

    /// Maximum time for a single completion call (seconds)
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,

    /// Units (sections or documents) in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Overall budget for a run (seconds); unfinished units are abandoned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,

    /// Ignore heading-like lines inside fenced code blocks
    #[serde(default)]
    pub fence_aware: bool,

    /// Work sizing
    #[serde(default)]
    pub sizing: SizingConfig,
}

impl PipelineConfig {
    /// Get the per-call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Get the run deadline as a Duration, if one is set
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        if self.deadline_secs == Some(0) {
            return Err("deadline_secs must be greater than 0".to_string());
        }
        self.sizing.validate()
    }
}

impl Default for PipelineConfig {
    /// Section mode with model-judged counts, one unit at a time
    fn default() -> Self {
        Self::sections()
    }
}

impl PipelineConfig {
    /// Section preset: split on headings, ask the model for each count
    pub fn sections() -> Self {
        Self {
            mode: GenerationMode::Sections,
            sizing: SizingConfig::with_strategy(SizingStrategy::Delegated),
            call_timeout_secs: default_call_timeout(),
            concurrency: default_concurrency(),
            deadline_secs: None,
            fence_aware: false,
        }
    }

    /// Whole-document preset: one call per file, count from content length
    pub fn whole_document() -> Self {
        Self {
            mode: GenerationMode::WholeDocument,
            sizing: SizingConfig::with_strategy(SizingStrategy::Heuristic),
            call_timeout_secs: 300,
            ..Self::sections()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

fn default_chars_per_question() -> usize {
    200
}

fn default_heuristic_min() -> usize {
    3
}

fn default_heuristic_max() -> usize {
    20
}

fn default_delegated_min() -> usize {
    1
}

fn default_delegated_max() -> usize {
    10
}

fn default_fallback() -> usize {
    3
}

fn default_call_timeout() -> u64 {
    120
}

fn default_concurrency() -> usize {
    1
}
