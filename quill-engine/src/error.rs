//! Layered error types
//!
//! Configuration problems, backend failures and pipeline failures are kept
//! apart so callers can react to each by variant rather than by message.

use crate::generator::GenerationError;
use quill_core::CoreError;
use thiserror::Error;

/// Invalid pipeline or backend configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Chunking configuration rejected by the core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A retry policy must allow at least one attempt
    #[error("max_attempts must be greater than 0")]
    ZeroAttempts,

    /// A prompt template lacks a placeholder the pipeline fills in
    #[error("prompt template '{template}' is missing the {{{placeholder}}} placeholder")]
    MissingPlaceholder {
        /// Name of the offending template
        template: String,
        /// Placeholder that must appear in it
        placeholder: String,
    },

    /// The backend API key could not be found
    #[error("no API key configured: set `api_key` or the {env_var} environment variable")]
    MissingApiKey {
        /// Environment variable that was consulted
        env_var: String,
    },

    /// Any other invalid setting
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failures of a rewrite or translation run
///
/// No variant carries partial output: a run either yields the complete text
/// or one of these errors.
#[derive(Error, Debug)]
pub enum RewriteError {
    /// The input produced no chunks; the backend was never called
    #[error("no text to rewrite: input is empty or whitespace only")]
    EmptyInput,

    /// A chunk kept failing transiently until the retry budget ran out
    #[error("chunk {} failed after {attempts} attempts: {source}", .chunk + 1)]
    GenerationExhausted {
        /// Zero-based index of the failing chunk
        chunk: usize,
        /// Attempts made before giving up
        attempts: u32,
        /// Last error returned by the backend
        source: GenerationError,
    },

    /// A chunk failed with an error that retrying cannot fix
    #[error("chunk {} was rejected by the backend: {source}", .chunk + 1)]
    GenerationRejected {
        /// Zero-based index of the failing chunk
        chunk: usize,
        /// Error returned by the backend
        source: GenerationError,
    },

    /// The final polish call failed
    #[error("polish pass failed: {0}")]
    Polish(#[source] GenerationError),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<CoreError> for RewriteError {
    fn from(err: CoreError) -> Self {
        RewriteError::Config(ConfigError::Core(err))
    }
}

/// Result type for rewrite operations
pub type Result<T> = std::result::Result<T, RewriteError>;
