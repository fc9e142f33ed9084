//! # pixmap-core
//!
//! Core types for pixmap image processing.
//!
//! - [`Rgb`] - 8-bit RGB pixel
//! - [`PixelBuffer`] - immutable row-major image with a channel maximum
//! - [`Error`] - construction and addressing errors
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. The rest of the workspace
//! builds on it:
//!
//! ```text
//! pixmap-core (this crate)
//!    ^
//!    |
//!    +-- pixmap-ops (fork/join engine, transforms, kernels)
//!    +-- pixmap-io  (PPM codec)
//!    +-- pixmap-cli (the `pixmap` binary)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Enable serialization for [`Rgb`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod pixel;

pub use buffer::{pixel_count, PixelBuffer, DEFAULT_MAX_VALUE};
pub use error::{Error, Result};
pub use pixel::{luma_rec601, Rgb, REC601_LUMA, REC601_LUMA_B, REC601_LUMA_G, REC601_LUMA_R};

/// Prelude module for convenient imports.
///
/// ```
/// use pixmap_core::prelude::*;
/// let img = PixelBuffer::filled(1, 1, 255, Rgb::BLACK);
/// assert_eq!(img.len(), 1);
/// ```
pub mod prelude {
    pub use crate::buffer::PixelBuffer;
    pub use crate::error::{Error, Result};
    pub use crate::pixel::Rgb;
}
