//! Continuity notes for chunks sent to the generation backend

use std::fmt;

/// Position of a chunk within a multi-chunk rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkContext {
    /// Zero-based chunk index
    pub index: usize,
    /// Total number of chunks
    pub total: usize,
}

impl ChunkContext {
    /// Create a context for chunk `index` of `total`
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    /// Whether earlier parts precede this one
    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Whether more parts follow this one
    pub fn has_next(&self) -> bool {
        self.index.saturating_add(1) < self.total
    }
}

impl fmt::Display for ChunkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "This is part {} of {}.",
            self.index.saturating_add(1),
            self.total.max(1)
        )?;
        if self.has_previous() {
            f.write_str(" Continue the narrative from the previous part.")?;
        }
        if self.has_next() {
            f.write_str(" The text continues in the next part.")?;
        }
        Ok(())
    }
}

/// Continuity note for chunk `index` (zero-based) of `total`
pub fn chunk_context(index: usize, total: usize) -> String {
    ChunkContext::new(index, total).to_string()
}
