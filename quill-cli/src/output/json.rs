//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use quill_core::Chunk;
use quill_engine::{RewriteMetadata, RewriteOutput};
use serde::Serialize;
use std::io::Write;

/// JSON formatter - outputs all items as one JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    records: Vec<Record>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Record {
    /// One chunk of a split document
    Chunk {
        /// Input name
        source: String,
        /// Zero-based chunk index
        index: usize,
        /// Chunk text
        text: String,
        /// Length in characters
        char_count: usize,
    },
    /// Result of a rewrite or translation
    Result {
        /// Input name
        source: String,
        /// Final text
        text: String,
        /// Run details
        metadata: RewriteMetadata,
    },
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_chunk(&mut self, source: &str, index: usize, chunk: &Chunk) -> Result<()> {
        self.records.push(Record::Chunk {
            source: source.to_string(),
            index,
            text: chunk.text().to_string(),
            char_count: chunk.char_count(),
        });
        Ok(())
    }

    fn format_result(&mut self, source: &str, output: &RewriteOutput) -> Result<()> {
        self.records.push(Record::Result {
            source: source.to_string(),
            text: output.text.clone(),
            metadata: output.metadata.clone(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.records)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
