//! Geometric transforms.
//!
//! - [`mirror`] - left-right mirror, row-partitioned
//! - [`mirror_indexed`] - same result, computed per flat index
//! - [`mirror_index`] - source index of a mirrored pixel
//!
//! # Example
//!
//! ```rust
//! use pixmap_core::{PixelBuffer, Rgb};
//! use pixmap_ops::parallel::ForkJoin;
//! use pixmap_ops::transform::mirror;
//!
//! let a = Rgb::splat(1);
//! let b = Rgb::splat(2);
//! let c = Rgb::splat(3);
//! let img = PixelBuffer::new(3, 1, 255, vec![a, b, c]).unwrap();
//! let out = mirror(&img, &ForkJoin::default()).unwrap();
//! assert_eq!(out.pixels(), &[c, b, a]);
//! ```

use pixmap_core::{PixelBuffer, Rgb};
use tracing::trace;

use crate::parallel::ForkJoin;
use crate::OpsResult;

/// Flat index of the pixel that lands at `i` after a left-right mirror.
///
/// For column `c = i % width` this is `i + width - 1 - 2*c`, i.e. column
/// `width - 1 - c` of the same row.
///
/// # Panics
///
/// Panics if `width == 0`.
#[inline]
pub fn mirror_index(i: usize, width: usize) -> usize {
    i + (width - 1) - 2 * (i % width)
}

/// Mirrors the image left-right, one task per row range.
pub fn mirror(src: &PixelBuffer, engine: &ForkJoin) -> OpsResult<PixelBuffer> {
    trace!(width = src.width(), height = src.height(), cutoff = engine.cutoff(), "mirror");
    let width = src.width() as usize;
    let mut dst = vec![Rgb::BLACK; src.len()];
    engine.fill_rows(&mut dst, width, |row, out| {
        out.copy_from_slice(src.row(row as u32));
        out.reverse();
    })?;
    Ok(src.with_pixels(dst)?)
}

/// Mirrors the image left-right by mapping each flat index through
/// [`mirror_index`].
///
/// Produces exactly the same pixels as [`mirror`].
pub fn mirror_indexed(src: &PixelBuffer, engine: &ForkJoin) -> OpsResult<PixelBuffer> {
    trace!(width = src.width(), height = src.height(), cutoff = engine.cutoff(), "mirror_indexed");
    if src.is_empty() {
        return Ok(src.clone());
    }
    let width = src.width() as usize;
    let pixels = src.pixels();
    let out = engine.map(pixels.len(), |i| pixels[mirror_index(i, width)])?;
    Ok(src.with_pixels(out)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, 255, |x, y| {
            let i = y * width + x;
            Rgb::new((i % 256) as u8, (i / 256 % 256) as u8, (x % 256) as u8)
        })
    }

    #[test]
    fn test_mirror_index() {
        // width 4: row 0 -> 3 2 1 0, row 1 -> 7 6 5 4
        let got: Vec<_> = (0..8).map(|i| mirror_index(i, 4)).collect();
        assert_eq!(got, vec![3, 2, 1, 0, 7, 6, 5, 4]);
        assert_eq!(mirror_index(5, 1), 5);
    }

    #[test]
    fn test_mirror_three_wide() {
        let img = PixelBuffer::new(
            3,
            1,
            255,
            vec![Rgb::new(1, 0, 0), Rgb::new(0, 2, 0), Rgb::new(0, 0, 3)],
        )
        .unwrap();
        let engine = ForkJoin::new(1).unwrap();
        for out in [mirror(&img, &engine).unwrap(), mirror_indexed(&img, &engine).unwrap()] {
            assert_eq!(
                out.pixels(),
                &[Rgb::new(0, 0, 3), Rgb::new(0, 2, 0), Rgb::new(1, 0, 0)]
            );
        }
    }

    #[test]
    fn test_mirror_is_involution() {
        let engine = ForkJoin::new(7).unwrap();
        for (w, h) in [(1, 1), (2, 3), (8, 5), (9, 4), (64, 3)] {
            let img = numbered(w, h);
            let twice = mirror(&mirror(&img, &engine).unwrap(), &engine).unwrap();
            assert_eq!(twice, img, "{w}x{h}");
        }
    }

    #[test]
    fn test_odd_width_center_column_fixed() {
        let img = numbered(5, 4);
        let out = mirror(&img, &ForkJoin::default()).unwrap();
        for y in 0..4 {
            assert_eq!(out.pixel(2, y), img.pixel(2, y));
            assert_eq!(out.pixel(0, y), img.pixel(4, y));
        }
    }

    #[test]
    fn test_both_variants_agree() {
        let img = numbered(37, 29);
        for cutoff in [1, 16, 500, 10_000] {
            let engine = ForkJoin::new(cutoff).unwrap();
            let rows = mirror(&img, &engine).unwrap();
            let flat = mirror_indexed(&img, &engine).unwrap();
            assert_eq!(rows, flat, "cutoff {cutoff}");
        }
    }

    #[test]
    fn test_mirror_empty() {
        let engine = ForkJoin::default();
        for (w, h) in [(0, 0), (0, 3), (3, 0)] {
            let img = PixelBuffer::new(w, h, 255, Vec::new()).unwrap();
            assert!(mirror(&img, &engine).unwrap().is_empty());
            assert!(mirror_indexed(&img, &engine).unwrap().is_empty());
        }
    }
}
