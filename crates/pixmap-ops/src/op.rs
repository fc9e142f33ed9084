//! Transform selector.
//!
//! [`Operation`] names one transform and its parameters so drivers can pick
//! a transform at runtime and apply it uniformly.

use std::fmt;

use pixmap_core::PixelBuffer;

use crate::parallel::ForkJoin;
use crate::{color, filter, transform, OpsResult};

/// A transform with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Invert channels against the channel maximum.
    Negate,
    /// Rec.601 luma on all channels.
    Greyscale,
    /// Left-right mirror, row-partitioned.
    Mirror,
    /// Left-right mirror, per-index mapping.
    MirrorIndexed,
    /// Gaussian blur.
    GaussianBlur {
        /// Kernel radius.
        radius: usize,
        /// Standard deviation, must be > 0.
        sigma: f64,
    },
    /// Uniform box blur.
    BoxBlur {
        /// Kernel radius.
        radius: usize,
    },
}

impl Operation {
    /// Runs the transform, returning a new buffer.
    pub fn apply(&self, src: &PixelBuffer, engine: &ForkJoin) -> OpsResult<PixelBuffer> {
        match *self {
            Self::Negate => color::negate(src, engine),
            Self::Greyscale => color::greyscale(src, engine),
            Self::Mirror => transform::mirror(src, engine),
            Self::MirrorIndexed => transform::mirror_indexed(src, engine),
            Self::GaussianBlur { radius, sigma } => filter::gaussian_blur(src, radius, sigma, engine),
            Self::BoxBlur { radius } => filter::box_blur(src, radius, engine),
        }
    }

    /// Short stable name, used in logs and output file names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Negate => "negate",
            Self::Greyscale => "greyscale",
            Self::Mirror => "mirror",
            Self::MirrorIndexed => "mirror-indexed",
            Self::GaussianBlur { .. } => "blur",
            Self::BoxBlur { .. } => "box-blur",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GaussianBlur { radius, sigma } => {
                write!(f, "{} (radius={radius}, sigma={sigma})", self.name())
            }
            Self::BoxBlur { radius } => write!(f, "{} (radius={radius})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmap_core::Rgb;

    const ALL: [Operation; 6] = [
        Operation::Negate,
        Operation::Greyscale,
        Operation::Mirror,
        Operation::MirrorIndexed,
        Operation::GaussianBlur { radius: 2, sigma: 1.2 },
        Operation::BoxBlur { radius: 1 },
    ];

    #[test]
    fn test_apply_preserves_metadata() {
        let img = PixelBuffer::from_fn(9, 4, 200, |x, y| Rgb::new(x as u8 * 20, y as u8 * 40, 7));
        for op in ALL {
            let out = op.apply(&img, &ForkJoin::new(3).unwrap()).unwrap();
            assert_eq!(out.dimensions(), img.dimensions(), "{op}");
            assert_eq!(out.max_value(), 200, "{op}");
        }
    }

    #[test]
    fn test_apply_does_not_touch_source() {
        let img = PixelBuffer::from_fn(6, 6, 255, |x, y| Rgb::new(x as u8, y as u8, 0));
        let copy = img.clone();
        for op in ALL {
            let _ = op.apply(&img, &ForkJoin::new(1).unwrap()).unwrap();
        }
        assert_eq!(img, copy);
    }

    #[test]
    fn test_display() {
        assert_eq!(Operation::Negate.to_string(), "negate");
        assert_eq!(
            Operation::GaussianBlur { radius: 3, sigma: 2.0 }.to_string(),
            "blur (radius=3, sigma=2)"
        );
    }

    #[test]
    fn test_invalid_blur_parameters_surface() {
        let img = PixelBuffer::filled(2, 2, 255, Rgb::BLACK);
        let op = Operation::GaussianBlur { radius: 1, sigma: 0.0 };
        let err = op.apply(&img, &ForkJoin::default()).unwrap_err();
        assert!(err.is_invalid_parameter());
    }
}
