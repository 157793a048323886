//! Output formatting module

use anyhow::{Context, Result};
use quill_core::Chunk;
use quill_engine::RewriteOutput;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format one chunk of a split document
    fn format_chunk(&mut self, source: &str, index: usize, chunk: &Chunk) -> Result<()>;

    /// Format the result of a rewrite or translation
    fn format_result(&mut self, source: &str, output: &RewriteOutput) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text, items separated by `---` lines
    Text,
    /// JSON array with metadata
    Json,
    /// Markdown sections
    Markdown,
}

/// Boxed writer used by every formatter
pub type Sink = Box<dyn Write + Send + Sync>;

/// Open the output destination (stdout when `path` is None)
pub fn open_sink(path: Option<&Path>) -> Result<Sink> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Build a formatter for `format` writing to `sink`
pub fn formatter(format: OutputFormat, sink: Sink) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(sink)),
        OutputFormat::Json => Box::new(JsonFormatter::new(sink)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(sink)),
    }
}
