//! Text segmentation for chunked rewriting
//!
//! This crate holds the deterministic half of the rewrite pipeline: it
//! splits text into sentences, packs paragraphs and sentences into chunks
//! bounded by a maximum character count, and produces the continuity note
//! that travels with each chunk to the generation backend.
//!
//! All lengths are measured in characters (Unicode scalar values), so
//! Chinese or Japanese text is budgeted the same way as English.
//!
//! # Example
//!
//! ```rust
//! use quill_core::{chunk_context, split_text};
//!
//! let text = "First paragraph. It has two sentences.\n\nSecond paragraph.";
//! let chunks = split_text(text, 2000).unwrap();
//! assert_eq!(chunks.len(), 1);
//!
//! let note = chunk_context(0, 3);
//! assert!(note.starts_with("This is part 1 of 3."));
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod packer;
pub mod segmenter;

pub use context::{chunk_context, ChunkContext};
pub use error::{CoreError, Result};
pub use packer::{paragraph_spans, split_text, Chunk, ChunkPacker, PARAGRAPH_SEPARATOR};
pub use segmenter::{sentence_spans, split_by_sentences, SentenceSegmenter, DEFAULT_TERMINATORS};

/// Count characters the way chunk budgets are measured.
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_scalars_not_bytes() {
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("旅行。"), 3);
        assert_eq!("旅行。".len(), 9);
        assert_eq!(char_len(""), 0);
    }

    #[test]
    fn test_module_exports() {
        let segmenter = SentenceSegmenter::default();
        assert_eq!(segmenter.split("One. Two.").len(), 2);

        let packer = ChunkPacker::new(10).unwrap();
        assert_eq!(packer.max_chunk_size(), 10);

        let context = ChunkContext::new(0, 1);
        assert_eq!(context.to_string(), "This is part 1 of 1.");
    }
}
