//! # pixmap-io
//!
//! Reading and writing of binary PPM (`P6`) images.
//!
//! ```rust
//! use pixmap_core::{PixelBuffer, Rgb};
//!
//! let img = PixelBuffer::filled(3, 2, 255, Rgb::new(1, 2, 3));
//! let bytes = pixmap_io::ppm::encode(&img);
//! assert!(bytes.starts_with(b"P6\n3 2\n255\n"));
//! assert_eq!(pixmap_io::ppm::decode(&bytes).unwrap(), img);
//! ```
//!
//! File helpers [`read`] and [`write`] go through the [`Ppm`] codec.

#![warn(missing_docs)]

mod error;
pub mod ppm;
pub mod traits;

use std::path::Path;

use pixmap_core::PixelBuffer;

pub use error::{IoError, IoResult};
pub use ppm::{Header, Ppm};
pub use traits::{ImageReader, ImageWriter};

/// Reads an image file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    Ppm.read(path)
}

/// Writes an image file.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    Ppm.write(path, image)
}
