//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use quill_core::Chunk;
use quill_engine::RewriteOutput;
use std::io::Write;

/// Markdown formatter - one section per item
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    item_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            item_count: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_chunk(&mut self, source: &str, index: usize, chunk: &Chunk) -> Result<()> {
        self.item_count += 1;
        writeln!(self.writer, "## {source} - chunk {}", index + 1)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "*{} characters*", chunk.char_count())?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", chunk.text())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn format_result(&mut self, source: &str, output: &RewriteOutput) -> Result<()> {
        self.item_count += 1;
        writeln!(self.writer, "## {source}")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", output.text)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "*{} chunks, {} generation calls, polished: {}*",
            output.metadata.chunk_count,
            output.metadata.generation_calls,
            if output.metadata.polished { "yes" } else { "no" }
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total sections: {}*", self.item_count)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_output;
    use quill_core::split_text;

    #[test]
    fn test_chunk_sections() {
        let mut buffer = Vec::new();
        {
            let mut formatter = MarkdownFormatter::new(&mut buffer);
            for (i, chunk) in split_text("First.\n\nSecond.", 8).unwrap().iter().enumerate() {
                formatter.format_chunk("trip.txt", i, chunk).unwrap();
            }
            formatter.finish().unwrap();
        }

        let out = String::from_utf8(buffer).unwrap();
        assert!(out.contains("## trip.txt - chunk 1\n\n*6 characters*\n\nFirst."));
        assert!(out.contains("## trip.txt - chunk 2"));
        assert!(out.ends_with("*Total sections: 2*\n"));
    }

    #[test]
    fn test_result_section() {
        let mut buffer = Vec::new();
        {
            let mut formatter = MarkdownFormatter::new(&mut buffer);
            formatter
                .format_result("trip.txt", &sample_output("A calm lake."))
                .unwrap();
            formatter.finish().unwrap();
        }

        let out = String::from_utf8(buffer).unwrap();
        assert!(out.starts_with("## trip.txt\n\nA calm lake.\n"));
        assert!(out.contains("*2 chunks, 3 generation calls, polished: yes*"));
    }
}
