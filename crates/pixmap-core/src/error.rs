//! Error types for pixmap-core operations.
//!
//! Every failure while constructing or addressing a [`crate::PixelBuffer`]
//! is reported through [`Error`]. Higher crates wrap it: `pixmap-ops` as an
//! invalid-parameter error, `pixmap-io` as a format error.
//!
//! # Usage
//!
//! ```rust
//! use pixmap_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(3, 0, 2, 2).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by pixel buffer construction and access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Width times height does not fit in memory-addressable size.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Why the dimensions were rejected
        reason: String,
    },

    /// Pixel storage length does not equal `width * height`.
    #[error("pixel count mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// `width * height`
        expected: usize,
        /// Length actually supplied
        got: usize,
    },

    /// A channel value exceeds the buffer's channel maximum.
    #[error("channel value {value} at pixel {index} exceeds maximum {max}")]
    ChannelOutOfRange {
        /// Linear pixel index
        index: usize,
        /// Offending channel value
        value: u8,
        /// Channel maximum of the buffer
        max: u8,
    },

    /// Channel maximum outside `1..=255`.
    #[error("invalid channel maximum {0} (expected 1..=255)")]
    InvalidMaxValue(u32),

    /// Pixel coordinates outside the buffer.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// Column
        x: u32,
        /// Row
        y: u32,
        /// Buffer width
        width: u32,
        /// Buffer height
        height: u32,
    },
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::LengthMismatch`] error.
    #[inline]
    pub fn length_mismatch(expected: usize, got: usize) -> Self {
        Self::LengthMismatch { expected, got }
    }

    /// Returns `true` if the pixel data disagrees with the declared metadata.
    #[inline]
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. } | Self::ChannelOutOfRange { .. }
        )
    }
}
