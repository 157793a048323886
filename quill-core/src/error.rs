//! Core error types (deterministic only)

use thiserror::Error;

/// Errors raised while configuring segmentation or packing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The chunk budget must allow at least one character
    #[error("max_chunk_size must be greater than 0")]
    InvalidChunkSize,

    /// A segmenter needs at least one terminator character
    #[error("terminator set must not be empty")]
    EmptyTerminatorSet,
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
