use thiserror::Error;

/// Contract violations reported by [`RingBuf`](crate::ring_buf::RingBuf).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingBufError {
    #[error("ring buffer capacity must be positive, got {0}")]
    InvalidCapacity(usize),
    #[error("insert depth {depth} out of range (len {len}, capacity {capacity})")]
    InvalidDepth { depth: usize, len: usize, capacity: usize },
}

/// Failure to read a buffer back from its `{ a, b, ... }` rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListifyError {
    #[error("rendering is not wrapped in braces: {0:?}")]
    Unbracketed(String),
    #[error("entry {index} is not an integer: {entry:?}")]
    BadEntry { index: usize, entry: String },
}

/// Harness failures that are not plain content mismatches.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StressError {
    #[error("insert depth {depth} must be below size {size}")]
    Precondition { depth: usize, size: usize },
    #[error(transparent)]
    RingBuf(#[from] RingBufError),
    #[error("could not read buffer back: {0}")]
    Listify(#[from] ListifyError),
}
