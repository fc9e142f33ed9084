//! # pixmap-ops
//!
//! Parallel image transforms over [`pixmap_core::PixelBuffer`].
//!
//! Every transform reads an immutable source and writes a fresh
//! destination through one fork/join engine, [`ForkJoin`]. The engine
//! bisects the index range down to a sequential cutoff and hands each half
//! a disjoint slice of the destination, so no locks are involved.
//!
//! # Modules
//!
//! - [`parallel`] - the fork/join engine and [`Span`] ranges
//! - [`color`] - negate, greyscale
//! - [`transform`] - mirror
//! - [`filter`] - kernels, convolution, Gaussian and box blur
//! - [`op`] - runtime transform selection
//!
//! # Example
//!
//! ```rust
//! use pixmap_core::{PixelBuffer, Rgb};
//! use pixmap_ops::{ForkJoin, Operation};
//!
//! let img = PixelBuffer::filled(64, 64, 255, Rgb::new(200, 100, 50));
//! let engine = ForkJoin::new(512).unwrap();
//!
//! let grey = Operation::Greyscale.apply(&img, &engine).unwrap();
//! let blurred = Operation::GaussianBlur { radius: 3, sigma: 1.5 }
//!     .apply(&grey, &engine)
//!     .unwrap();
//! assert_eq!(blurred.dimensions(), (64, 64));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod color;
pub mod filter;
pub mod op;
pub mod parallel;
pub mod transform;

pub use error::{OpsError, OpsResult};
pub use filter::Kernel;
pub use op::Operation;
pub use parallel::{ForkJoin, Span, DEFAULT_SEQUENTIAL_CUTOFF};
