//! Paragraph-first greedy chunk packing
//!
//! Paragraphs are packed into chunks while the running length stays under
//! the budget. A paragraph that is too large on its own is broken into
//! sentences, which are packed the same way; the last partial group of
//! sentences is carried forward so it can still absorb the next paragraph.
//! A single sentence longer than the budget becomes its own chunk.

use crate::{
    char_len,
    error::{CoreError, Result},
    segmenter::{trim_span, SentenceSegmenter},
};
use std::ops::Range;

/// Separator placed between paragraphs merged into one chunk
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// A bounded slice of source text handed to the generation backend
///
/// The character count is derived from the text on construction, so the two
/// can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Chunk {
    text: String,
    char_count: usize,
}

impl Chunk {
    /// Wrap `text` as a chunk, counting its characters
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_count = char_len(&text);
        Self { text, char_count }
    }

    /// The chunk content, trimmed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the content in characters
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Take ownership of the content
    pub fn into_text(self) -> String {
        self.text
    }

    /// Whether this chunk is over the given budget
    pub fn exceeds(&self, max_chunk_size: usize) -> bool {
        self.char_count > max_chunk_size
    }
}

/// Packs text into chunks of at most `max_chunk_size` characters
#[derive(Debug, Clone)]
pub struct ChunkPacker {
    max_chunk_size: usize,
    segmenter: SentenceSegmenter,
}

impl ChunkPacker {
    /// Create a packer with the default sentence segmenter
    pub fn new(max_chunk_size: usize) -> Result<Self> {
        Self::with_segmenter(max_chunk_size, SentenceSegmenter::default())
    }

    /// Create a packer that falls back to a custom segmenter
    pub fn with_segmenter(max_chunk_size: usize, segmenter: SentenceSegmenter) -> Result<Self> {
        if max_chunk_size == 0 {
            return Err(CoreError::InvalidChunkSize);
        }

        Ok(Self {
            max_chunk_size,
            segmenter,
        })
    }

    /// Configured chunk budget in characters
    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Split `text` into ordered chunks
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut buffer = Buffer::default();

        for span in paragraph_spans(text) {
            let paragraph = &text[span];
            let paragraph_len = char_len(paragraph);

            if paragraph_len > self.max_chunk_size {
                buffer.flush_into(&mut chunks);
                buffer = self.pack_sentences(paragraph, &mut chunks);
            } else if buffer.len_with(paragraph_len) < self.max_chunk_size {
                buffer.push_paragraph(paragraph, paragraph_len);
            } else {
                buffer.flush_into(&mut chunks);
                buffer.push_paragraph(paragraph, paragraph_len);
            }
        }

        buffer.flush_into(&mut chunks);
        chunks
    }

    /// Pack the sentences of one oversized paragraph. Completed groups go to
    /// `chunks`; the trailing partial group is returned as the new buffer.
    fn pack_sentences(&self, paragraph: &str, chunks: &mut Vec<Chunk>) -> Buffer {
        let mut group: Option<(Range<usize>, usize)> = None;

        for sentence in self.segmenter.spans(paragraph) {
            let sentence_len = char_len(&paragraph[sentence.clone()]);

            group = match group {
                Some((current, current_len)) => {
                    // Keep the original spacing between adjacent sentences
                    let gap_len = char_len(&paragraph[current.end..sentence.start]);
                    let candidate = current_len + gap_len + sentence_len;

                    if candidate < self.max_chunk_size {
                        Some((current.start..sentence.end, candidate))
                    } else {
                        chunks.push(Chunk::new(paragraph[current].to_string()));
                        Some((sentence, sentence_len))
                    }
                }
                None => Some((sentence, sentence_len)),
            };
        }

        match group {
            Some((span, len)) => Buffer {
                text: paragraph[span].to_string(),
                len,
            },
            None => Buffer::default(),
        }
    }
}

/// Accumulates paragraphs until the budget is reached
#[derive(Debug, Default)]
struct Buffer {
    text: String,
    len: usize,
}

impl Buffer {
    fn separator_len(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            PARAGRAPH_SEPARATOR.len()
        }
    }

    /// Length after appending a paragraph of `paragraph_len` characters
    fn len_with(&self, paragraph_len: usize) -> usize {
        self.len + self.separator_len() + paragraph_len
    }

    fn push_paragraph(&mut self, paragraph: &str, paragraph_len: usize) {
        self.len = self.len_with(paragraph_len);
        if !self.text.is_empty() {
            self.text.push_str(PARAGRAPH_SEPARATOR);
        }
        self.text.push_str(paragraph);
    }

    fn flush_into(&mut self, chunks: &mut Vec<Chunk>) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        self.len = 0;
        chunks.push(Chunk::new(text));
    }
}

/// Split text into chunks with the default segmenter
pub fn split_text(text: &str, max_chunk_size: usize) -> Result<Vec<Chunk>> {
    Ok(ChunkPacker::new(max_chunk_size)?.split(text))
}

/// Byte ranges of the trimmed, non-blank paragraphs in `text`
///
/// Paragraphs are separated by one or more blank lines; a line holding only
/// spaces or tabs counts as blank and `\r\n` line endings are accepted.
pub fn paragraph_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut current: Option<Range<usize>> = None;
    let mut blank_since_content = false;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if line.trim().is_empty() {
            blank_since_content = current.is_some();
            continue;
        }

        current = match current {
            Some(paragraph) if blank_since_content => {
                spans.extend(trim_span(text, paragraph));
                Some(line_start..offset)
            }
            Some(paragraph) => Some(paragraph.start..offset),
            None => Some(line_start..offset),
        };
        blank_since_content = false;
    }

    if let Some(paragraph) = current {
        spans.extend(trim_span(text, paragraph));
    }

    spans
}
