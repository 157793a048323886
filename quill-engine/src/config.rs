//! Configuration types for the rewrite pipeline

use crate::{error::ConfigError, executor::ExecutionMode, retry::RetryPolicy};
use quill_core::{ChunkPacker, SentenceSegmenter, DEFAULT_TERMINATORS};

/// Default chunk budget in characters
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 2000;

/// Rewrite pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    /// Chunk budget in characters
    pub max_chunk_size: usize,
    /// Retry policy for per-chunk generation calls
    pub retry: RetryPolicy,
    /// Run the polish pass over multi-chunk output
    pub polish: bool,
    /// How chunk calls are scheduled
    pub execution_mode: ExecutionMode,
    /// Upper bound on concurrent chunk calls in parallel mode (None = rayon default)
    pub max_concurrency: Option<usize>,
    /// Sentence terminators used for oversized paragraphs
    pub terminators: Vec<char>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            retry: RetryPolicy::default(),
            polish: true,
            execution_mode: ExecutionMode::default(),
            max_concurrency: None,
            terminators: DEFAULT_TERMINATORS.to_vec(),
        }
    }
}

impl RewriteConfig {
    /// Create a builder
    pub fn builder() -> RewriteConfigBuilder {
        RewriteConfigBuilder::default()
    }

    /// Build the chunk packer described by this configuration
    pub fn packer(&self) -> Result<ChunkPacker, ConfigError> {
        let segmenter = SentenceSegmenter::with_terminators(&self.terminators)?;
        Ok(ChunkPacker::with_segmenter(self.max_chunk_size, segmenter)?)
    }

    /// Check every setting without building anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.packer()?;
        if self.retry.max_attempts() == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.max_concurrency == Some(0) {
            return Err(ConfigError::Invalid(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration builder
#[derive(Debug, Default)]
pub struct RewriteConfigBuilder {
    config: RewriteConfig,
}

impl RewriteConfigBuilder {
    /// Set the chunk budget in characters
    pub fn max_chunk_size(mut self, size: usize) -> Self {
        self.config.max_chunk_size = size;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Enable or disable the polish pass
    pub fn polish(mut self, polish: bool) -> Self {
        self.config.polish = polish;
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }

    /// Limit concurrent chunk calls in parallel mode
    pub fn max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.config.max_concurrency = limit;
        self
    }

    /// Set custom sentence terminators
    pub fn terminators(mut self, terminators: impl Into<Vec<char>>) -> Self {
        self.config.terminators = terminators.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<RewriteConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
