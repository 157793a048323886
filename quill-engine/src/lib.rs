//! Rewrite orchestration over a text generation backend
//!
//! This crate drives the chunked-rewrite pipeline: chunks produced by
//! `quill-core` are sent one by one to a [`Generator`], each call wrapped in
//! a [`RetryPolicy`]; results are joined in chunk order and, for multi-chunk
//! inputs, smoothed by a single polish call.
//!
//! The same machinery backs the [`Translator`] and the project [`Coach`].

#![warn(missing_docs)]

pub mod coach;
pub mod config;
pub mod error;
pub mod executor;
pub mod generator;
pub mod openai;
pub mod prompt;
pub mod retry;
pub mod rewriter;
pub mod translate;

// Re-export key types
pub use coach::{Coach, CoachError, ProjectCatalog, ProjectProfile, StageAnalysis};
pub use config::{RewriteConfig, RewriteConfigBuilder, DEFAULT_MAX_CHUNK_SIZE};
pub use error::{ConfigError, RewriteError, Result};
pub use executor::ExecutionMode;
pub use generator::{GenerationError, Generator};
pub use openai::{OpenAiConfig, OpenAiGenerator};
pub use prompt::{PromptSet, PromptTemplate};
pub use retry::{RetryError, RetryPolicy};
pub use rewriter::{rewrite, RewriteMetadata, RewriteOutput, Rewriter};
pub use translate::Translator;

// Re-export from core for convenience
pub use quill_core::{chunk_context, split_by_sentences, split_text, Chunk, ChunkContext};
