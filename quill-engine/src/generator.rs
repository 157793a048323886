//! Text generation backend abstraction

use std::sync::Arc;
use thiserror::Error;

/// Failure of a single generation call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Worth retrying: rate limiting, timeouts, overloaded upstream
    #[error("transient generation failure: {0}")]
    Transient(String),

    /// Retrying will not help: bad request, auth failure, malformed reply
    #[error("generation failed: {0}")]
    Permanent(String),
}

impl GenerationError {
    /// Whether the retry policy should try again
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::Transient(_))
    }
}

/// Pluggable text generation backend
///
/// Implementations receive the rendered prompt and a short context note
/// (empty when there is none) and return the generated text. Timeouts are
/// the implementation's responsibility.
pub trait Generator: Send + Sync {
    /// Generate text for `prompt`, guided by `context`
    fn generate(&self, prompt: &str, context: &str) -> Result<String, GenerationError>;

    /// Human-readable backend name for logs
    fn name(&self) -> &str {
        "generator"
    }
}

impl<G: Generator + ?Sized> Generator for &G {
    fn generate(&self, prompt: &str, context: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt, context)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&self, prompt: &str, context: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt, context)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<G: Generator + ?Sized> Generator for Arc<G> {
    fn generate(&self, prompt: &str, context: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt, context)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
