//! Pointwise color operations: negate and greyscale.
//!
//! Both map each pixel independently, so they run through
//! [`ForkJoin::fill`] on the flat pixel index.

use pixmap_core::{luma_rec601, PixelBuffer, Rgb};
use tracing::trace;

use crate::parallel::ForkJoin;
use crate::OpsResult;

/// Rounds to the nearest integer, ties away from zero, and clamps to
/// `[0, max]`.
#[inline]
pub(crate) fn quantize(v: f64, max: u8) -> u8 {
    v.round().clamp(0.0, f64::from(max)) as u8
}

/// `max - c` for each channel.
#[inline]
pub fn negate_pixel(px: Rgb, max: u8) -> Rgb {
    px.map(|c| max.saturating_sub(c))
}

/// Rec.601 luma, rounded, replicated to all three channels.
#[inline]
pub fn greyscale_pixel(px: Rgb, max: u8) -> Rgb {
    Rgb::splat(quantize(luma_rec601(px.to_f64()), max))
}

/// Inverts every channel against the buffer's channel maximum.
///
/// # Example
///
/// ```rust
/// use pixmap_core::{PixelBuffer, Rgb};
/// use pixmap_ops::color::negate;
/// use pixmap_ops::parallel::ForkJoin;
///
/// let img = PixelBuffer::filled(2, 2, 255, Rgb::new(0, 100, 255));
/// let neg = negate(&img, &ForkJoin::default()).unwrap();
/// assert_eq!(neg.pixel(0, 0), Rgb::new(255, 155, 0));
/// ```
pub fn negate(src: &PixelBuffer, engine: &ForkJoin) -> OpsResult<PixelBuffer> {
    trace!(width = src.width(), height = src.height(), cutoff = engine.cutoff(), "negate");
    let max = src.max_value();
    let pixels = src.pixels();
    let out = engine.map(pixels.len(), |i| negate_pixel(pixels[i], max))?;
    Ok(src.with_pixels(out)?)
}

/// Converts to grey using `round(0.299*R + 0.587*G + 0.114*B)`.
pub fn greyscale(src: &PixelBuffer, engine: &ForkJoin) -> OpsResult<PixelBuffer> {
    trace!(width = src.width(), height = src.height(), cutoff = engine.cutoff(), "greyscale");
    let max = src.max_value();
    let pixels = src.pixels();
    let out = engine.map(pixels.len(), |i| greyscale_pixel(pixels[i], max))?;
    Ok(src.with_pixels(out)?)
}
