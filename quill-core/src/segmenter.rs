//! Sentence segmentation on terminal punctuation
//!
//! A sentence ends at a run of one or more terminator characters; the run
//! stays attached to the sentence it closes. Text after the last run is an
//! incomplete sentence and is still emitted. Sentences are trimmed and empty
//! ones are dropped.

use crate::error::{CoreError, Result};
use std::ops::Range;

/// Terminators used when no custom set is configured: ASCII and full-width CJK.
pub const DEFAULT_TERMINATORS: &[char] = &['.', '!', '?', '。', '！', '？'];

/// Splits text into sentences using a configurable terminator set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceSegmenter {
    terminators: Vec<char>,
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self {
            terminators: DEFAULT_TERMINATORS.to_vec(),
        }
    }
}

impl SentenceSegmenter {
    /// Create a segmenter with the default terminator set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a segmenter for a custom terminator set
    pub fn with_terminators(terminators: &[char]) -> Result<Self> {
        if terminators.is_empty() {
            return Err(CoreError::EmptyTerminatorSet);
        }

        let mut terminators = terminators.to_vec();
        terminators.sort_unstable();
        terminators.dedup();

        Ok(Self { terminators })
    }

    /// Terminator characters recognized by this segmenter
    pub fn terminators(&self) -> &[char] {
        &self.terminators
    }

    /// Check whether a character closes a sentence
    #[inline]
    pub fn is_terminator(&self, ch: char) -> bool {
        self.terminators.contains(&ch)
    }

    /// Byte ranges of the trimmed sentences in `text`, in order
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut fragment_start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((_, ch)) = chars.next() {
            if !self.is_terminator(ch) {
                continue;
            }

            // Swallow the rest of the terminator run ("?!", "...", "。。")
            let mut end = text.len();
            while let Some(&(pos, next)) = chars.peek() {
                if self.is_terminator(next) {
                    chars.next();
                } else {
                    end = pos;
                    break;
                }
            }

            if let Some(span) = trim_span(text, fragment_start..end) {
                spans.push(span);
            }
            fragment_start = end;
        }

        if fragment_start < text.len() {
            if let Some(span) = trim_span(text, fragment_start..text.len()) {
                spans.push(span);
            }
        }

        spans
    }

    /// Split `text` into trimmed sentences, punctuation retained
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.spans(text)
            .into_iter()
            .map(|span| &text[span])
            .collect()
    }
}

/// Split text into sentences with the default terminator set
pub fn split_by_sentences(text: &str) -> Vec<&str> {
    SentenceSegmenter::default().split(text)
}

/// Byte ranges of sentences with the default terminator set
pub fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    SentenceSegmenter::default().spans(text)
}

/// Shrink a byte range to exclude surrounding whitespace; `None` when blank
pub(crate) fn trim_span(text: &str, span: Range<usize>) -> Option<Range<usize>> {
    let slice = &text[span.clone()];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();

    if leading == slice.len() {
        return None;
    }

    Some(span.start + leading..span.end - trailing)
}
