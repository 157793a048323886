//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use quill_core::Chunk;
use quill_engine::RewriteOutput;
use std::io::Write;

/// Plain text formatter - items separated by a `---` line
pub struct TextFormatter<W: Write> {
    writer: W,
    items: usize,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer, items: 0 }
    }

    fn write_item(&mut self, text: &str) -> Result<()> {
        if self.items > 0 {
            writeln!(self.writer, "---")?;
        }
        writeln!(self.writer, "{text}")?;
        self.items += 1;
        Ok(())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_chunk(&mut self, _source: &str, _index: usize, chunk: &Chunk) -> Result<()> {
        self.write_item(chunk.text())
    }

    fn format_result(&mut self, _source: &str, output: &RewriteOutput) -> Result<()> {
        self.write_item(&output.text)
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
