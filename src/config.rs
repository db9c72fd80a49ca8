//! Configuration for briefwright
//!
//! Loaded from YAML with a fallback chain: explicit `--config` path,
//! `./.briefwright.yml`, `~/.config/briefwright/briefwright.yml`, then
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::generation::RetryPolicy;
use crate::llm::LlmError;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider settings
    pub llm: LlmConfig,

    /// Stage sequencing settings
    pub pipeline: PipelineConfig,

    /// Historical dataset settings
    pub data: DataConfig,

    /// Section classifier settings
    pub classifier: ClassifierConfig,

    /// Prompt template settings
    pub prompts: PromptsConfig,
}

impl Config {
    /// Check everything a pipeline run needs before any stage executes
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.validate_llm()?;
        self.validate_data()
    }

    /// Check the LLM provider is usable
    pub fn validate_llm(&self) -> Result<(), PipelineError> {
        if !matches!(self.llm.provider.as_str(), "anthropic" | "openai" | "azure") {
            return Err(PipelineError::Configuration(format!(
                "unknown LLM provider '{}'",
                self.llm.provider
            )));
        }
        if self.llm.get_api_key().is_err() {
            return Err(PipelineError::Configuration(format!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            )));
        }
        if self.llm.provider == "azure" && self.llm.base_url.contains("api.anthropic.com") {
            return Err(PipelineError::Configuration(
                "azure provider needs llm.base-url set to the resource endpoint".to_string(),
            ));
        }
        Ok(())
    }

    /// Check the historical dataset is reachable
    pub fn validate_data(&self) -> Result<(), PipelineError> {
        if !self.data.dataset.exists() {
            return Err(PipelineError::Configuration(format!(
                "dataset not found at {} (generate one with `cs sample`)",
                self.data.dataset.display()
            )));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .briefwright.yml
        let local_config = PathBuf::from(".briefwright.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/briefwright/briefwright.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("briefwright").join("briefwright.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "anthropic", "openai" or "azure"
    pub provider: String,

    /// Model identifier (deployment name for azure)
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Azure API version
    #[serde(rename = "api-version")]
    pub api_version: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// HTTP request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// HTTP-level retries for 5xx/network failures inside the client
    #[serde(rename = "transport-retries")]
    pub transport_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            api_version: None,
            max_tokens: 4096,
            timeout_ms: 300_000,
            temperature: Some(0.7),
            transport_retries: 0,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String, LlmError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(self.api_key_env.clone()))
    }
}

/// Stage sequencing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Extra attempts the strategy stage makes after a transient failure
    #[serde(rename = "strategy-retries")]
    pub strategy_retries: u32,

    /// Deadline for a single generation call in milliseconds
    #[serde(rename = "generation-timeout-ms")]
    pub generation_timeout_ms: u64,

    /// Delay before the first strategy retry, doubled each attempt
    #[serde(rename = "retry-backoff-ms")]
    pub retry_backoff_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strategy_retries: 3,
            generation_timeout_ms: 120_000,
            retry_backoff_ms: 1000,
        }
    }
}

impl PipelineConfig {
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_timeout_ms)
    }

    pub fn strategy_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.strategy_retries,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

/// Historical dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSONL dataset of campaign records
    pub dataset: PathBuf,

    /// Top performers pulled from the dataset
    #[serde(rename = "top-performer-limit")]
    pub top_performer_limit: usize,

    /// Top performers written into the analyst prompt
    #[serde(rename = "prompt-campaigns")]
    pub prompt_campaigns: usize,

    /// Industries written into the analyst prompt
    #[serde(rename = "prompt-industries")]
    pub prompt_industries: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset: campaignstore::config::default_dataset_path(),
            top_performer_limit: campaignstore::DEFAULT_TOP_LIMIT,
            prompt_campaigns: 10,
            prompt_industries: 5,
        }
    }
}

/// Section classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Ask the model first; keyword matching only on failure
    #[serde(rename = "use-model")]
    pub use_model: bool,

    /// Characters of the current brief shown to the classifier
    #[serde(rename = "brief-excerpt-chars")]
    pub brief_excerpt_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            use_model: true,
            brief_excerpt_chars: 500,
        }
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory of `.pmt` overrides for the embedded templates
    pub dir: Option<PathBuf>,
}
