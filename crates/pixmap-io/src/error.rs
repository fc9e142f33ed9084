//! Error types for I/O operations.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed header.
    #[error("format error: {0}")]
    Format(String),

    /// Pixel payload shorter than the header promises.
    #[error("truncated pixel data: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the header.
        expected: usize,
        /// Bytes present.
        actual: usize,
    },

    /// Decoded pixels violate the buffer invariants.
    #[error("invalid pixel data: {0}")]
    Buffer(#[from] pixmap_core::Error),
}

impl IoError {
    /// Returns `true` if the input bytes, not the file system, are at fault.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
