//! Error types for huffman_text

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::min_heap::HeapErr;

/// Result type alias using our error
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Error, Debug)]
pub enum HuffmanError {
    /// Priority queue misuse while building a tree
    #[error("heap error: {0}")]
    Heap(#[from] HeapErr),

    /// Malformed frequency header
    #[error("malformed header: {0}")]
    HeaderFormat(String),

    /// Bit source ran dry before the end-of-text symbol was decoded
    #[error("bit stream ended before the end-of-text symbol")]
    TruncatedStream,

    /// Counts whose sum does not fit in a `usize`
    #[error("symbol counts overflow the tree weight")]
    WeightOverflow,

    /// Byte handed to an encoder whose table never counted it
    #[error("byte {0} is not in the frequency table")]
    UnknownSymbol(u8),

    /// Named input does not exist
    #[error("input not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// A bit string contained something other than '0' or '1'
    #[error("invalid bit character {0:?}")]
    InvalidBit(char),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl HuffmanError {
    pub fn header(msg: impl Into<String>) -> Self {
        HuffmanError::HeaderFormat(msg.into())
    }
}
