//! Owned RGB pixel buffer.
//!
//! [`PixelBuffer`] is the single image container used across the
//! workspace. Once constructed it is never mutated: every transform reads
//! a buffer and returns a new one, which is what lets parallel tasks share
//! the source without synchronization.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom:
//!
//! ```text
//! index = row * width + col
//!
//! [p(0,0) p(0,1) ... p(0,w-1)]  <- row 0
//! [p(1,0) p(1,1) ... p(1,w-1)]  <- row 1
//! ...
//! ```
//!
//! # Usage
//!
//! ```rust
//! use pixmap_core::{PixelBuffer, Rgb};
//!
//! let img = PixelBuffer::from_fn(4, 2, 255, |x, y| Rgb::new(x as u8, y as u8, 0));
//! assert_eq!(img.len(), 8);
//! assert_eq!(img.pixel(3, 1), Rgb::new(3, 1, 0));
//! ```

use crate::error::{Error, Result};
use crate::pixel::Rgb;

/// Default channel maximum for 8-bit images.
pub const DEFAULT_MAX_VALUE: u8 = 255;

/// An immutable RGB image with a channel maximum.
///
/// # Invariants
///
/// - `pixels.len() == width * height`
/// - every channel value is `<= max_value`
/// - `max_value >= 1`
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    max_value: u8,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    /// Creates a buffer from row-major pixels, validating every invariant.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidMaxValue`] if `max_value == 0`
    /// - [`Error::InvalidDimensions`] if `width * height` overflows
    /// - [`Error::LengthMismatch`] if `pixels.len() != width * height`
    /// - [`Error::ChannelOutOfRange`] if any channel exceeds `max_value`
    pub fn new(width: u32, height: u32, max_value: u8, pixels: Vec<Rgb>) -> Result<Self> {
        if max_value == 0 {
            return Err(Error::InvalidMaxValue(0));
        }
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(Error::length_mismatch(expected, pixels.len()));
        }
        if max_value < DEFAULT_MAX_VALUE {
            if let Some((index, px)) = pixels
                .iter()
                .enumerate()
                .find(|(_, px)| px.max_channel() > max_value)
            {
                return Err(Error::ChannelOutOfRange {
                    index,
                    value: px.max_channel(),
                    max: max_value,
                });
            }
        }
        Ok(Self {
            width,
            height,
            max_value,
            pixels,
        })
    }

    /// Creates a buffer filled with a single pixel.
    ///
    /// Channels above `max_value` are clamped. Panics if the dimensions
    /// overflow `usize`.
    pub fn filled(width: u32, height: u32, max_value: u8, pixel: Rgb) -> Self {
        Self::from_fn(width, height, max_value, |_, _| pixel)
    }

    /// Creates a buffer by evaluating `f(x, y)` for every pixel.
    ///
    /// Channels above `max_value` are clamped and a zero `max_value` is
    /// treated as 1. Panics if the dimensions overflow `usize`.
    pub fn from_fn<F>(width: u32, height: u32, max_value: u8, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Rgb,
    {
        let max_value = max_value.max(1);
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y).map(|c| c.min(max_value)));
            }
        }
        Self {
            width,
            height,
            max_value,
            pixels,
        }
    }

    /// Creates a buffer with the same dimensions and channel maximum as
    /// `self` but different pixels.
    ///
    /// Transforms use this to wrap their output.
    pub fn with_pixels(&self, pixels: Vec<Rgb>) -> Result<Self> {
        Self::new(self.width, self.height, self.max_value, pixels)
    }

    /// Image width (columns).
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height (rows).
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Channel maximum (`M`).
    #[inline]
    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Returns `true` if the buffer has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Row-major pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Consumes the buffer, returning its pixels.
    #[inline]
    pub fn into_pixels(self) -> Vec<Rgb> {
        self.pixels
    }

    /// Linear index of `(x, y)`.
    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[self.index_of(x, y)]
    }

    /// Pixel at `(x, y)`, or an [`Error::OutOfBounds`].
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Rgb> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        Ok(self.pixels[self.index_of(x, y)])
    }

    /// Row `y` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[Rgb] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    /// Iterates `(x, y, pixel)` in row-major order.
    pub fn enumerate_pixels(&self) -> impl Iterator<Item = (u32, u32, Rgb)> + '_ {
        let w = self.width;
        self.pixels.iter().enumerate().map(move |(i, &px)| {
            let (x, y) = coords_of(i, w);
            (x, y, px)
        })
    }
}

/// `(x, y)` of flat index `i` in rows of `width` pixels.
///
/// Computed in `usize`; both results fit in `u32` for any index of a valid
/// buffer.
#[inline]
fn coords_of(i: usize, width: u32) -> (u32, u32) {
    let w = (width as usize).max(1);
    ((i % w) as u32, (i / w) as u32)
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("max_value", &self.max_value)
            .field("pixels", &self.pixels.len())
            .finish()
    }
}

/// `width * height` as `usize`, or [`Error::InvalidDimensions`] on overflow.
pub fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows usize"))
}
