//! RGB pixel type and luma constants.
//!
//! [`Rgb`] is a plain `Copy` triple of 8-bit channels. Pixels carry no
//! channel maximum of their own; the owning [`crate::PixelBuffer`] does.
//!
//! # Example
//!
//! ```
//! use pixmap_core::Rgb;
//!
//! let px = Rgb::new(255, 128, 0);
//! assert_eq!(px.to_array(), [255, 128, 0]);
//! assert_eq!(px.to_string(), "(255,128,0)");
//! ```

use std::fmt;

// ============================================================================
// Rec.601 Luma Constants
// ============================================================================

/// Rec.601 luma coefficient for the red channel.
///
/// Used in the greyscale formula: `Y = 0.299*R + 0.587*G + 0.114*B`
pub const REC601_LUMA_R: f64 = 0.299;

/// Rec.601 luma coefficient for the green channel.
pub const REC601_LUMA_G: f64 = 0.587;

/// Rec.601 luma coefficient for the blue channel.
pub const REC601_LUMA_B: f64 = 0.114;

/// Rec.601 luma coefficients as an array [R, G, B].
pub const REC601_LUMA: [f64; 3] = [REC601_LUMA_R, REC601_LUMA_G, REC601_LUMA_B];

/// Weighted Rec.601 luma of an RGB triple, unrounded.
///
/// # Example
/// ```
/// use pixmap_core::pixel::luma_rec601;
/// let y = luma_rec601([255.0, 255.0, 255.0]);
/// assert!((y - 255.0).abs() < 1e-9);
/// ```
#[inline]
pub fn luma_rec601(rgb: [f64; 3]) -> f64 {
    rgb[0] * REC601_LUMA_R + rgb[1] * REC601_LUMA_G + rgb[2] * REC601_LUMA_B
}

/// An RGB triple with 8-bit channels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::splat(0);

    /// Creates a pixel from its three channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a pixel with all three channels set to `v`.
    #[inline]
    pub const fn splat(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Channels as `[r, g, b]`.
    #[inline]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Pixel from `[r, g, b]`.
    #[inline]
    pub const fn from_array(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    /// Channels widened to `f64`, in `[r, g, b]` order.
    #[inline]
    pub fn to_f64(self) -> [f64; 3] {
        [f64::from(self.r), f64::from(self.g), f64::from(self.b)]
    }

    /// Largest of the three channels.
    #[inline]
    pub fn max_channel(self) -> u8 {
        self.r.max(self.g).max(self.b)
    }

    /// Applies `f` to each channel.
    #[inline]
    pub fn map(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Returns `true` if all three channels are equal.
    #[inline]
    pub fn is_grey(self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::from_array(c)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(px: Rgb) -> Self {
        px.to_array()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.r, self.g, self.b)
    }
}
