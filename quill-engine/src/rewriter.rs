//! Chunk-by-chunk rewriting
//!
//! A [`Rewriter`] packs the input into chunks, sends each chunk through the
//! generator under the retry policy, joins the trimmed results in chunk
//! order and, when more than one chunk was processed, runs one polish call
//! over the joined text.

use crate::{
    config::RewriteConfig,
    error::{ConfigError, Result, RewriteError},
    executor::{map_ordered, ExecutionMode},
    generator::Generator,
    prompt::PromptSet,
    retry::RetryError,
};
use quill_core::{chunk_context, Chunk, ChunkPacker, PARAGRAPH_SEPARATOR};
use serde::Serialize;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Instant,
};

/// Rewritten text plus facts about the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteOutput {
    /// Final trimmed text
    pub text: String,
    /// Details of how the text was produced
    pub metadata: RewriteMetadata,
}

/// Facts about a completed rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteMetadata {
    /// Number of chunks the input was split into
    pub chunk_count: usize,
    /// Generator calls made, retries and polish included
    pub generation_calls: usize,
    /// Whether the polish pass ran
    pub polished: bool,
    /// How chunk calls were scheduled
    pub execution_mode: ExecutionMode,
    /// Wall-clock duration of the run
    pub processing_time_ms: u64,
}

/// Drives a generator over chunked text
#[derive(Debug)]
pub struct Rewriter<G> {
    generator: G,
    packer: ChunkPacker,
    prompts: PromptSet,
    config: RewriteConfig,
}

impl<G: Generator> Rewriter<G> {
    /// Create a rewriter with the default configuration and prompts
    pub fn new(generator: G) -> std::result::Result<Self, ConfigError> {
        Self::with_config(generator, RewriteConfig::default())
    }

    /// Create a rewriter with a custom configuration
    pub fn with_config(
        generator: G,
        config: RewriteConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let packer = config.packer()?;

        Ok(Self {
            generator,
            packer,
            prompts: PromptSet::default(),
            config,
        })
    }

    /// Replace the prompt templates
    pub fn with_prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Active prompt templates
    pub fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    /// Chunks that `text` would be split into
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        self.packer.split(text)
    }

    /// Rewrite `text`, returning only the final text
    pub fn rewrite(&self, text: &str) -> Result<String> {
        self.process(text).map(|output| output.text)
    }

    /// Rewrite `text`, returning the final text and run metadata
    pub fn process(&self, text: &str) -> Result<RewriteOutput> {
        let started = Instant::now();
        let chunks = self.packer.split(text);
        if chunks.is_empty() {
            return Err(RewriteError::EmptyInput);
        }

        let total = chunks.len();
        let calls = AtomicUsize::new(0);
        log::info!(
            "rewriting {total} chunk(s) with {} ({} mode)",
            self.generator.name(),
            self.config.execution_mode.as_str()
        );

        let (text, polished) = if total == 1 {
            (self.transform_chunk(0, &chunks[0], "", &calls)?, false)
        } else {
            let parts = map_ordered(
                self.config.execution_mode,
                self.config.max_concurrency,
                &chunks,
                |index, chunk| {
                    let context = chunk_context(index, total);
                    self.transform_chunk(index, chunk, &context, &calls)
                },
            )?;
            let joined = parts.join(PARAGRAPH_SEPARATOR);

            if self.config.polish {
                (self.polish(&joined, &calls)?, true)
            } else {
                (joined, false)
            }
        };

        let metadata = RewriteMetadata {
            chunk_count: total,
            generation_calls: calls.into_inner(),
            polished,
            execution_mode: self.config.execution_mode,
            processing_time_ms: started.elapsed().as_millis() as u64,
        };
        log::info!(
            "rewrite finished: {} chunk(s), {} call(s), {} ms",
            metadata.chunk_count,
            metadata.generation_calls,
            metadata.processing_time_ms
        );

        Ok(RewriteOutput {
            text: text.trim().to_string(),
            metadata,
        })
    }

    fn transform_chunk(
        &self,
        index: usize,
        chunk: &Chunk,
        context: &str,
        calls: &AtomicUsize,
    ) -> Result<String> {
        log::debug!("chunk {} ({} chars)", index + 1, chunk.char_count());
        let prompt = self.prompts.render_chunk(chunk.text());

        self.config
            .retry
            .run(|_| {
                calls.fetch_add(1, Ordering::Relaxed);
                self.generator.generate(&prompt, context)
            })
            .map(|generated| generated.trim().to_string())
            .map_err(|err| match err {
                RetryError::Exhausted { attempts, last } => RewriteError::GenerationExhausted {
                    chunk: index,
                    attempts,
                    source: last,
                },
                RetryError::Rejected(source) => RewriteError::GenerationRejected {
                    chunk: index,
                    source,
                },
            })
    }

    fn polish(&self, joined: &str, calls: &AtomicUsize) -> Result<String> {
        log::debug!("polishing {} chars", quill_core::char_len(joined));
        let prompt = self.prompts.render_polish(joined);

        calls.fetch_add(1, Ordering::Relaxed);
        self.generator
            .generate(&prompt, "")
            .map_err(RewriteError::Polish)
    }
}

/// Rewrite `text` with the default prompts, retry policy and polish pass
pub fn rewrite<G: Generator>(generator: G, text: &str, max_chunk_size: usize) -> Result<String> {
    let config = RewriteConfig::builder()
        .max_chunk_size(max_chunk_size)
        .build()?;
    Rewriter::with_config(generator, config)?.rewrite(text)
}
