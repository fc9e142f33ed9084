//! Convolution kernels and blurs.
//!
//! # Kernels
//!
//! - [`Kernel::gaussian`] - separable Gaussian, normalized to sum 1
//! - [`Kernel::box_blur`] - uniform average
//! - [`Kernel::new`] - caller-supplied weights, normalized
//!
//! # Boundary policy
//!
//! Neighbours that fall outside the image are clamped to the nearest edge
//! pixel (replicate-edge). Rows clamp to `[0, height-1]`, columns to
//! `[0, width-1]`.
//!
//! # Example
//!
//! ```rust
//! use pixmap_core::{PixelBuffer, Rgb};
//! use pixmap_ops::filter::gaussian_blur;
//! use pixmap_ops::parallel::ForkJoin;
//!
//! let img = PixelBuffer::filled(16, 16, 255, Rgb::new(10, 20, 30));
//! let blurred = gaussian_blur(&img, 2, 1.5, &ForkJoin::default()).unwrap();
//! assert_eq!(blurred, img);
//! ```

use pixmap_core::{PixelBuffer, Rgb};
use tracing::{debug, trace};

use crate::color::quantize;
use crate::parallel::ForkJoin;
use crate::{OpsError, OpsResult};

/// Unnormalized Gaussian weight `exp(-((x - center) / sigma)^2 / 2)`.
#[inline]
pub fn gaussian(x: f64, center: f64, sigma: f64) -> f64 {
    (-((x - center) / sigma).powi(2) / 2.0).exp()
}

/// Square convolution kernel with odd side length and weights summing to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f64>,
    size: usize,
}

impl Kernel {
    /// Creates a kernel from row-major weights and normalizes it.
    ///
    /// Size must be odd, `data` must hold `size * size` finite non-negative
    /// weights with a positive sum.
    pub fn new(mut data: Vec<f64>, size: usize) -> OpsResult<Self> {
        if size % 2 == 0 {
            return Err(OpsError::InvalidParameter(
                "kernel size must be odd".into(),
            ));
        }
        if data.len() != size * size {
            return Err(OpsError::InvalidParameter(format!(
                "kernel data size {} doesn't match {}x{}",
                data.len(),
                size,
                size
            )));
        }
        if data.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(OpsError::InvalidParameter(
                "kernel weights must be finite and non-negative".into(),
            ));
        }
        let sum: f64 = data.iter().sum();
        if sum <= 0.0 {
            return Err(OpsError::InvalidParameter(
                "kernel weights sum to zero".into(),
            ));
        }
        for w in &mut data {
            *w /= sum;
        }
        Ok(Self { data, size })
    }

    /// Single-tap kernel that leaves images unchanged.
    pub fn identity() -> Self {
        Self {
            data: vec![1.0],
            size: 1,
        }
    }

    /// Samples `gaussian(i, radius, sigma)` for `i` in `0..=2*radius`.
    ///
    /// The result is not normalized.
    pub fn gaussian_1d(radius: usize, sigma: f64) -> OpsResult<Vec<f64>> {
        validate_sigma(sigma)?;
        let size = side_length(radius)?;
        let center = radius as f64;
        let mut k1 = reserve_weights(size, radius)?;
        k1.extend((0..size).map(|i| gaussian(i as f64, center, sigma)));
        Ok(k1)
    }

    /// Creates a normalized `(2*radius+1)^2` Gaussian kernel.
    ///
    /// The 2D weights are the outer product of [`gaussian_1d`](Self::gaussian_1d)
    /// with itself, divided by their total.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if `sigma` is zero, negative or not
    /// finite, or if the kernel would not fit in memory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pixmap_ops::filter::Kernel;
    ///
    /// let k = Kernel::gaussian(2, 1.0).unwrap();
    /// assert_eq!(k.size(), 5);
    /// assert!((k.sum() - 1.0).abs() < 1e-9);
    /// ```
    pub fn gaussian(radius: usize, sigma: f64) -> OpsResult<Self> {
        validate_sigma(sigma)?;
        let size = side_length(radius)?;
        // 2D storage first: it is the larger of the two
        let mut data = reserve_weights(size * size, radius)?;
        let k1 = Self::gaussian_1d(radius, sigma)?;
        for &wi in &k1 {
            for &wj in &k1 {
                data.push(wi * wj);
            }
        }
        let total: f64 = data.iter().sum();
        for w in &mut data {
            *w /= total;
        }
        Ok(Self { data, size })
    }

    /// Creates a uniform `(2*radius+1)^2` averaging kernel.
    pub fn box_blur(radius: usize) -> OpsResult<Self> {
        let size = side_length(radius)?;
        let count = size * size;
        let mut data = reserve_weights(count, radius)?;
        data.resize(count, 1.0 / count as f64);
        Ok(Self { data, size })
    }

    /// Side length (`2*radius+1`).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Kernel radius.
    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at `(row, col)`, both in `0..size`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    /// Row-major weights.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

fn validate_sigma(sigma: f64) -> OpsResult<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(OpsError::InvalidParameter(format!(
            "sigma must be finite and > 0, got {sigma}"
        )));
    }
    Ok(())
}

/// `2*radius+1`, provided a square kernel of that side fits in `isize::MAX`
/// bytes.
fn side_length(radius: usize) -> OpsResult<usize> {
    radius
        .checked_mul(2)
        .and_then(|v| v.checked_add(1))
        .filter(|s| {
            s.checked_mul(*s)
                .and_then(|n| n.checked_mul(size_of::<f64>()))
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or_else(|| OpsError::InvalidParameter(format!("radius {radius} too large")))
}

fn reserve_weights(count: usize, radius: usize) -> OpsResult<Vec<f64>> {
    let mut data = Vec::new();
    data.try_reserve_exact(count).map_err(|e| {
        OpsError::InvalidParameter(format!("radius {radius} kernel cannot be allocated: {e}"))
    })?;
    Ok(data)
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Convolves the neighbourhood of `(row, col)` with `kernel`.
///
/// Accumulates `kernel[dr+r][dc+r] * src[row-dr][col-dc]` per channel in
/// `f64`, clamping source coordinates to the image, then rounds to the
/// nearest integer (ties away from zero) within `[0, max_value]`.
///
/// # Panics
///
/// Panics if `(row, col)` lies outside `src`.
pub fn convolve_at(src: &PixelBuffer, kernel: &Kernel, row: usize, col: usize) -> Rgb {
    let (height, width) = (src.height() as usize, src.width() as usize);
    assert!(row < height && col < width, "({row}, {col}) outside {height}x{width}");
    let pixels = src.pixels();
    let r = kernel.radius() as isize;
    let mut acc = [0.0f64; 3];

    for dr in -r..=r {
        let sr = clamp_index(row as isize - dr, height);
        let kr = (dr + r) as usize;
        for dc in -r..=r {
            let sc = clamp_index(col as isize - dc, width);
            let w = kernel.at(kr, (dc + r) as usize);
            let px = pixels[sr * width + sc];
            acc[0] += w * f64::from(px.r);
            acc[1] += w * f64::from(px.g);
            acc[2] += w * f64::from(px.b);
        }
    }

    let max = src.max_value();
    Rgb::new(quantize(acc[0], max), quantize(acc[1], max), quantize(acc[2], max))
}

/// Applies `kernel` to every pixel, partitioning the output by rows.
///
/// # Example
///
/// ```rust
/// use pixmap_core::{PixelBuffer, Rgb};
/// use pixmap_ops::filter::{convolve, Kernel};
/// use pixmap_ops::parallel::ForkJoin;
///
/// let img = PixelBuffer::filled(8, 8, 255, Rgb::splat(128));
/// let out = convolve(&img, &Kernel::box_blur(1).unwrap(), &ForkJoin::default()).unwrap();
/// assert_eq!(out.len(), 64);
/// ```
pub fn convolve(src: &PixelBuffer, kernel: &Kernel, engine: &ForkJoin) -> OpsResult<PixelBuffer> {
    trace!(
        width = src.width(),
        height = src.height(),
        kernel_size = kernel.size(),
        cutoff = engine.cutoff(),
        "convolve"
    );
    let width = src.width() as usize;
    let mut dst = vec![Rgb::BLACK; src.len()];
    engine.fill_rows(&mut dst, width, |row, out| {
        for (col, slot) in out.iter_mut().enumerate() {
            *slot = convolve_at(src, kernel, row, col);
        }
    })?;
    Ok(src.with_pixels(dst)?)
}

/// Gaussian blur with a `(2*radius+1)^2` kernel.
///
/// `radius == 0` returns an identical image for any valid `sigma`.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] for a non-positive or non-finite `sigma`.
pub fn gaussian_blur(
    src: &PixelBuffer,
    radius: usize,
    sigma: f64,
    engine: &ForkJoin,
) -> OpsResult<PixelBuffer> {
    let kernel = Kernel::gaussian(radius, sigma)?;
    debug!(radius, sigma, size = kernel.size(), "gaussian kernel built");
    convolve(src, &kernel, engine)
}

/// Box blur with a uniform `(2*radius+1)^2` kernel.
pub fn box_blur(src: &PixelBuffer, radius: usize, engine: &ForkJoin) -> OpsResult<PixelBuffer> {
    let kernel = Kernel::box_blur(radius)?;
    convolve(src, &kernel, engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, 255, |x, y| {
            Rgb::new((x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x + y) * 11 % 256) as u8)
        })
    }

    #[test]
    fn test_gaussian_weight() {
        assert_relative_eq!(gaussian(3.0, 3.0, 2.0), 1.0);
        assert_relative_eq!(gaussian(1.0, 3.0, 2.0), (-0.5f64).exp());
    }

    #[test]
    fn test_gaussian_kernel_sums_to_one() {
        for radius in [0, 1, 2, 5, 20] {
            for sigma in [0.1, 0.5, 1.0, 2.0, 10.0] {
                let k = Kernel::gaussian(radius, sigma).unwrap();
                assert_eq!(k.size(), 2 * radius + 1);
                assert_eq!(k.radius(), radius);
                assert!((k.sum() - 1.0).abs() < 1e-9, "r={radius} s={sigma}");
                assert!(k.data().iter().all(|&w| w >= 0.0));
            }
        }
    }

    #[test]
    fn test_gaussian_kernel_symmetric_and_peaked() {
        let k = Kernel::gaussian(2, 1.0).unwrap();
        assert_relative_eq!(k.at(0, 1), k.at(1, 0));
        assert_relative_eq!(k.at(0, 0), k.at(4, 4));
        assert!(k.at(2, 2) > k.at(2, 1));
        assert!(k.at(2, 1) > k.at(1, 1));
    }

    #[test]
    fn test_gaussian_kernel_is_outer_product() {
        let k1 = Kernel::gaussian_1d(1, 1.0).unwrap();
        let total: f64 = k1.iter().sum::<f64>().powi(2);
        let k = Kernel::gaussian(1, 1.0).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(k.at(i, j), k1[i] * k1[j] / total, epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_invalid_sigma() {
        for sigma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Kernel::gaussian(2, sigma).unwrap_err();
            assert!(err.is_invalid_parameter(), "sigma {sigma}");
        }
    }

    #[test]
    fn test_huge_radius_rejected() {
        assert!(Kernel::box_blur(usize::MAX / 2).is_err());
        assert!(Kernel::gaussian(usize::MAX, 1.0).is_err());
    }

    #[test]
    fn test_radius_beyond_addressable_kernel() {
        // side fits in usize and side*side does too, the byte size does not
        let radius = 1usize << 30;
        assert!(Kernel::box_blur(radius).unwrap_err().is_invalid_parameter());
        assert!(Kernel::gaussian(radius, 2.0).unwrap_err().is_invalid_parameter());
        assert!(Kernel::gaussian_1d(radius, 2.0).unwrap_err().is_invalid_parameter());

        let img = PixelBuffer::filled(2, 2, 255, Rgb::splat(7));
        let err = box_blur(&img, radius, &ForkJoin::default()).unwrap_err();
        assert!(err.is_invalid_parameter());
        let err = gaussian_blur(&img, radius, 1.0, &ForkJoin::default()).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_kernel_new_normalizes() {
        let k = Kernel::new(vec![1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0], 3).unwrap();
        assert_relative_eq!(k.at(1, 1), 0.25);
        assert_relative_eq!(k.sum(), 1.0);
        assert!(Kernel::new(vec![1.0; 4], 2).is_err());
        assert!(Kernel::new(vec![1.0; 8], 3).is_err());
        assert!(Kernel::new(vec![0.0; 9], 3).is_err());
        assert!(Kernel::new(vec![-1.0; 9], 3).is_err());
    }

    #[test]
    fn test_radius_zero_is_identity() {
        let img = gradient(13, 7);
        for sigma in [0.01, 1.0, 100.0] {
            let out = gaussian_blur(&img, 0, sigma, &ForkJoin::default()).unwrap();
            assert_eq!(out, img);
        }
        let out = convolve(&img, &Kernel::identity(), &ForkJoin::default()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let img = PixelBuffer::filled(10, 6, 255, Rgb::new(100, 150, 200));
        let out = gaussian_blur(&img, 3, 2.0, &ForkJoin::new(5).unwrap()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_blur_smooths_edge() {
        let img = PixelBuffer::from_fn(10, 10, 255, |x, _| {
            if x < 5 { Rgb::BLACK } else { Rgb::splat(255) }
        });
        let out = gaussian_blur(&img, 2, 2.0, &ForkJoin::default()).unwrap();
        assert!(out.pixel(4, 5).r > 0);
        assert!(out.pixel(5, 5).r < 255);
        assert_eq!(out.pixel(0, 5), Rgb::BLACK);
        assert_eq!(out.pixel(9, 5), Rgb::splat(255));
    }

    #[test]
    fn test_replicate_edge_on_single_pixel() {
        // every neighbour clamps to the only pixel
        let img = PixelBuffer::filled(1, 1, 255, Rgb::new(9, 99, 199));
        let out = gaussian_blur(&img, 4, 1.0, &ForkJoin::default()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_non_square_clamps_per_axis() {
        // 1 row, 3 columns: only column clamping applies
        let img = PixelBuffer::new(
            3,
            1,
            255,
            vec![Rgb::splat(0), Rgb::splat(90), Rgb::splat(180)],
        )
        .unwrap();
        let out = box_blur(&img, 1, &ForkJoin::default()).unwrap();
        // col 0: (0 + 0 + 90) * 3 rows / 9 = 30
        assert_eq!(out.pixel(0, 0), Rgb::splat(30));
        assert_eq!(out.pixel(1, 0), Rgb::splat(90));
        // col 2: (90 + 180 + 180) / 3 = 150
        assert_eq!(out.pixel(2, 0), Rgb::splat(150));
    }

    #[test]
    fn test_one_sided_kernel_shift_direction() {
        // only tap (0, 1): dr = -1, dc = 0, so out[row] = src[row + 1]
        let down = Kernel::new(vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 3).unwrap();
        let column = PixelBuffer::new(
            1,
            3,
            255,
            vec![Rgb::splat(10), Rgb::splat(20), Rgb::splat(30)],
        )
        .unwrap();
        let out = convolve(&column, &down, &ForkJoin::new(1).unwrap()).unwrap();
        assert_eq!(
            out.pixels(),
            &[Rgb::splat(20), Rgb::splat(30), Rgb::splat(30)]
        );

        // only tap (1, 2): dr = 0, dc = +1, so out[col] = src[col - 1]
        let right = Kernel::new(vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0], 3).unwrap();
        let row = PixelBuffer::new(
            3,
            1,
            255,
            vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6), Rgb::new(7, 8, 9)],
        )
        .unwrap();
        let out = convolve(&row, &right, &ForkJoin::new(1).unwrap()).unwrap();
        assert_eq!(
            out.pixels(),
            &[Rgb::new(1, 2, 3), Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]
        );
    }

    #[test]
    fn test_cutoff_does_not_change_output() {
        let img = gradient(23, 17);
        let n = img.len();
        let reference = gaussian_blur(&img, 3, 1.5, &ForkJoin::new(n).unwrap()).unwrap();
        for cutoff in [1, 10, 64, 10_000] {
            let out = gaussian_blur(&img, 3, 1.5, &ForkJoin::new(cutoff).unwrap()).unwrap();
            assert_eq!(out, reference, "cutoff {cutoff}");
        }
    }

    #[test]
    fn test_blur_respects_max_value() {
        let img = PixelBuffer::from_fn(5, 5, 15, |x, y| Rgb::splat(((x + y) % 16) as u8));
        let out = gaussian_blur(&img, 2, 3.0, &ForkJoin::default()).unwrap();
        assert_eq!(out.max_value(), 15);
        assert!(out.pixels().iter().all(|px| px.max_channel() <= 15));
    }

    #[test]
    fn test_empty_image() {
        let img = PixelBuffer::new(0, 0, 255, Vec::new()).unwrap();
        let out = gaussian_blur(&img, 2, 1.0, &ForkJoin::default()).unwrap();
        assert!(out.is_empty());
    }
}
