//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Source or destination buffer violates its invariants.
    #[error("invalid buffer: {0}")]
    Buffer(#[from] pixmap_core::Error),

    /// A parallel sub-computation panicked.
    #[error("parallel task failed: {0}")]
    TaskFailure(String),

    /// Worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

impl OpsError {
    /// Returns `true` for errors caused by caller-supplied values.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter(_) | Self::Buffer(_))
    }
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
