//! Configuration file support
//!
//! A single TOML file drives every command. All sections are optional and
//! fall back to the library defaults.

use anyhow::{Context, Result};
use quill_core::DEFAULT_TERMINATORS;
use quill_engine::{
    ConfigError, ExecutionMode, OpenAiConfig, ProjectCatalog, PromptSet, RetryPolicy,
    RewriteConfig, DEFAULT_MAX_CHUNK_SIZE,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// CLI configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuillConfig {
    /// Chunking configuration
    pub chunking: ChunkingConfig,

    /// Generation backend configuration
    pub generation: OpenAiConfig,

    /// Retry configuration
    pub retry: RetryConfig,

    /// Pipeline configuration
    pub rewrite: PipelineConfig,

    /// Custom prompt templates
    pub prompts: PromptsConfig,

    /// Project profiles for the coach
    pub projects: ProjectCatalog,
}

/// Chunking-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Chunk budget in characters
    pub max_chunk_size: usize,

    /// Sentence terminator characters
    pub terminators: Vec<char>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            terminators: DEFAULT_TERMINATORS.to_vec(),
        }
    }
}

/// Retry-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per chunk call
    pub max_attempts: u32,

    /// Delay before the second attempt (milliseconds)
    pub base_delay_ms: u64,

    /// Cap for any single delay (milliseconds)
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts(),
            base_delay_ms: policy.base_delay().as_millis() as u64,
            max_delay_ms: policy.max_delay().as_millis() as u64,
        }
    }
}

impl RetryConfig {
    /// Build the retry policy
    pub fn policy(&self) -> Result<RetryPolicy, ConfigError> {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

/// Pipeline-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Run the polish pass over multi-chunk output
    pub polish: bool,

    /// Chunk scheduling
    pub execution_mode: ExecutionMode,

    /// Concurrent chunk calls in parallel mode (0 = auto)
    pub max_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            polish: true,
            execution_mode: ExecutionMode::Sequential,
            max_concurrency: 0,
        }
    }
}

/// Prompt template overrides; each must contain `{text}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Per-chunk rewrite prompt
    pub chunk: Option<String>,

    /// Polish prompt
    pub polish: Option<String>,
}

impl QuillConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load `path` if given, else use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                log::debug!("loading configuration from {}", path.display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Pipeline configuration described by this file
    pub fn rewrite_config(&self) -> Result<RewriteConfig, ConfigError> {
        let max_concurrency = match self.rewrite.max_concurrency {
            0 => None,
            n => Some(n),
        };

        RewriteConfig::builder()
            .max_chunk_size(self.chunking.max_chunk_size)
            .terminators(self.chunking.terminators.clone())
            .retry(self.retry.policy()?)
            .polish(self.rewrite.polish)
            .execution_mode(self.rewrite.execution_mode)
            .max_concurrency(max_concurrency)
            .build()
    }

    /// Rewrite prompts, with defaults for anything not overridden
    pub fn prompt_set(&self) -> Result<PromptSet, ConfigError> {
        if self.prompts.chunk.is_none() && self.prompts.polish.is_none() {
            return Ok(PromptSet::default());
        }

        let defaults = PromptSet::default();
        PromptSet::custom(
            self.prompts
                .chunk
                .as_deref()
                .unwrap_or(defaults.chunk.as_str()),
            self.prompts
                .polish
                .as_deref()
                .unwrap_or(defaults.polish.as_str()),
        )
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rewrite_config()?;
        self.prompt_set()?;
        self.generation.validate()
    }
}

/// Commented configuration template written by `generate-config`
pub const CONFIG_TEMPLATE: &str = r#"# Quill configuration

[chunking]
# Chunk budget in characters (Unicode scalar values, not bytes)
max_chunk_size = 2000
# Characters that end a sentence when a paragraph must be split
terminators = [".", "!", "?", "。", "！", "？"]

[generation]
# Any OpenAI-compatible chat completions endpoint
api_base = "https://api.openai.com/v1"
model = "gpt-3.5-turbo"
temperature = 0.7
# The key is read from this environment variable unless `api_key` is set
api_key_env = "OPENAI_API_KEY"
timeout_secs = 120
# max_tokens = 2048

[retry]
max_attempts = 3
base_delay_ms = 4000
max_delay_ms = 10000

[rewrite]
polish = true
# "sequential" or "parallel"
execution_mode = "sequential"
# Concurrent chunk calls in parallel mode (0 = one per CPU)
max_concurrency = 0

[prompts]
# Templates must contain the {text} placeholder
# chunk = "Rewrite the following text as a travel blog:\n\n{text}"
# polish = "Polish this travel blog:\n\n{text}"

# Project profiles used by `quill coach next --project <key>`
[projects.example]
purpose = "Describe what the project is for"
personality = "How the founder likes to work"
preferences = "Skills, constraints and preferences"
event_logs = "What happened recently"
stage = "Where the project stands"
current_focus = []
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_and_validates() {
        let config = QuillConfig::from_toml(CONFIG_TEMPLATE).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking, ChunkingConfig::default());
        assert_eq!(config.retry, RetryConfig::default());
        assert!(config.projects.get("example").is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = QuillConfig::from_toml("").unwrap();
        assert_eq!(config, QuillConfig::default());

        let rewrite = config.rewrite_config().unwrap();
        assert_eq!(rewrite.max_chunk_size, 2000);
        assert!(rewrite.polish);
        assert_eq!(rewrite.max_concurrency, None);
    }

    #[test]
    fn test_sections_map_onto_pipeline_config() {
        let config = QuillConfig::from_toml(
            r#"
[chunking]
max_chunk_size = 500

[retry]
max_attempts = 5
base_delay_ms = 0
max_delay_ms = 0

[rewrite]
polish = false
execution_mode = "parallel"
max_concurrency = 4
"#,
        )
        .unwrap();

        let rewrite = config.rewrite_config().unwrap();
        assert_eq!(rewrite.max_chunk_size, 500);
        assert_eq!(rewrite.retry.max_attempts(), 5);
        assert!(!rewrite.polish);
        assert_eq!(rewrite.execution_mode, ExecutionMode::Parallel);
        assert_eq!(rewrite.max_concurrency, Some(4));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let zero_budget = QuillConfig::from_toml("[chunking]\nmax_chunk_size = 0\n").unwrap();
        assert!(zero_budget.validate().is_err());

        let zero_attempts = QuillConfig::from_toml("[retry]\nmax_attempts = 0\n").unwrap();
        assert_eq!(zero_attempts.validate(), Err(ConfigError::ZeroAttempts));

        let bad_prompt = QuillConfig::from_toml("[prompts]\nchunk = \"no placeholder\"\n").unwrap();
        assert!(matches!(
            bad_prompt.validate(),
            Err(ConfigError::MissingPlaceholder { .. })
        ));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert!(QuillConfig::from_toml("[procesing]\nx = 1\n").is_err());
    }

    #[test]
    fn test_partial_prompt_override() {
        let config =
            QuillConfig::from_toml("[prompts]\nchunk = \"Summarise:\\n{text}\"\n").unwrap();
        let prompts = config.prompt_set().unwrap();
        assert_eq!(prompts.render_chunk("abc"), "Summarise:\nabc");
        assert_eq!(prompts.polish, PromptSet::default().polish);
    }
}
