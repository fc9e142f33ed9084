//! Divide-and-conquer task runner on Rayon's work-stealing pool.
//!
//! [`ForkJoin`] bisects an index range until a piece is shorter than the
//! sequential cutoff, then computes that piece directly. The destination
//! slice is split at the same midpoint with `split_at_mut`, so the two
//! halves handed to `rayon::join` own disjoint memory and never need a
//! lock. The source is only ever borrowed immutably by the compute
//! function.
//!
//! Two partitionings are provided:
//!
//! - [`ForkJoin::fill`] - flat element index (pointwise transforms)
//! - [`ForkJoin::fill_rows`] - row index, leaves receive whole rows
//!   (neighbourhood transforms such as convolution)
//!
//! # Example
//!
//! ```rust
//! use pixmap_ops::parallel::ForkJoin;
//!
//! let engine = ForkJoin::new(64).unwrap();
//! let squares = engine.map(1000, |i| i * i).unwrap();
//! assert_eq!(squares[31], 961);
//! ```

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// Default sequential cutoff, in destination elements.
///
/// Only affects performance; any value `>= 1` yields the same output.
pub const DEFAULT_SEQUENTIAL_CUTOFF: usize = 4096;

/// Half-open index interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// First index in the span.
    pub start: usize,
    /// One past the last index.
    pub end: usize,
}

impl Span {
    /// Creates a span. `end < start` is treated as empty.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of indices covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Splits at the midpoint. The left half gets the smaller share.
    #[inline]
    pub fn split(self) -> (Self, Self) {
        let mid = self.start + self.len() / 2;
        (Self::new(self.start, mid), Self::new(mid, self.end.max(mid)))
    }

    /// Indices in the span.
    #[inline]
    pub fn iter(self) -> Range<usize> {
        self.start..self.end.max(self.start)
    }
}

/// Fork/join task runner with a tunable sequential cutoff.
///
/// Runs on Rayon's global pool unless built with
/// [`with_threads`](ForkJoin::with_threads).
#[derive(Clone)]
pub struct ForkJoin {
    cutoff: usize,
    pool: Option<Arc<ThreadPool>>,
}

impl Default for ForkJoin {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_SEQUENTIAL_CUTOFF,
            pool: None,
        }
    }
}

impl std::fmt::Debug for ForkJoin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForkJoin")
            .field("cutoff", &self.cutoff)
            .field("threads", &self.threads())
            .finish()
    }
}

impl ForkJoin {
    /// Creates a runner with the given sequential cutoff.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if `cutoff == 0`.
    pub fn new(cutoff: usize) -> OpsResult<Self> {
        if cutoff == 0 {
            return Err(OpsError::InvalidParameter(
                "sequential cutoff must be >= 1".into(),
            ));
        }
        Ok(Self { cutoff, pool: None })
    }

    /// Moves execution onto a dedicated pool of `threads` workers.
    ///
    /// `threads == 0` lets Rayon pick the size.
    pub fn with_threads(mut self, threads: usize) -> OpsResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("pixmap-worker-{i}"))
            .build()
            .map_err(|e| OpsError::ThreadPool(e.to_string()))?;
        debug!(threads = pool.current_num_threads(), "built dedicated pool");
        self.pool = Some(Arc::new(pool));
        Ok(self)
    }

    /// Sequential cutoff in destination elements.
    #[inline]
    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    /// Number of worker threads tasks will run on.
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Writes `dst[i] = f(i)` for every index, splitting on the flat range.
    ///
    /// # Errors
    ///
    /// [`OpsError::TaskFailure`] if `f` panics. All sibling tasks have
    /// finished by the time the error is returned.
    pub fn fill<T, F>(&self, dst: &mut [T], f: F) -> OpsResult<()>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        trace!(len = dst.len(), cutoff = self.cutoff, "ForkJoin::fill");
        let cutoff = self.cutoff;
        let span = Span::new(0, dst.len());
        self.run(|| fork_flat(span, dst, cutoff, &f))
    }

    /// Allocates a vector of `len` elements and fills it with `f`.
    ///
    /// The vector is dropped if any task fails, so no partial result escapes.
    pub fn map<T, F>(&self, len: usize, f: F) -> OpsResult<Vec<T>>
    where
        T: Default + Clone + Send,
        F: Fn(usize) -> T + Sync,
    {
        let mut dst = vec![T::default(); len];
        self.fill(&mut dst, f)?;
        Ok(dst)
    }

    /// Calls `f(row, out)` for every `row_len`-element row of `dst`,
    /// splitting on the row range.
    ///
    /// The cutoff is compared with the number of elements in a row range;
    /// a range is never split below one row.
    ///
    /// # Errors
    ///
    /// - [`OpsError::InvalidParameter`] if `dst` is not a whole number of rows
    /// - [`OpsError::TaskFailure`] if `f` panics
    pub fn fill_rows<T, F>(&self, dst: &mut [T], row_len: usize, f: F) -> OpsResult<()>
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        trace!(len = dst.len(), row_len, cutoff = self.cutoff, "ForkJoin::fill_rows");
        if row_len == 0 {
            if dst.is_empty() {
                return Ok(());
            }
            return Err(OpsError::InvalidParameter(
                "row length must be > 0 for a non-empty buffer".into(),
            ));
        }
        if dst.len() % row_len != 0 {
            return Err(OpsError::InvalidParameter(format!(
                "buffer of {} elements is not a whole number of {}-element rows",
                dst.len(),
                row_len
            )));
        }
        let cutoff = self.cutoff;
        let rows = Span::new(0, dst.len() / row_len);
        self.run(|| fork_rows(rows, dst, row_len, cutoff, &f))
    }

    /// Runs `op` on this runner's pool, so any Rayon work it starts
    /// (`par_iter`, `join`) is bounded by [`threads`](Self::threads).
    ///
    /// Without a dedicated pool `op` runs on the caller's thread and uses
    /// the global pool. Panics in `op` propagate.
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    fn run<R, J>(&self, job: J) -> OpsResult<R>
    where
        R: Send,
        J: FnOnce() -> R + Send,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.install(job)));
        outcome.map_err(|payload| {
            let msg = panic_message(payload.as_ref());
            debug!(%msg, "parallel task panicked");
            OpsError::TaskFailure(msg)
        })
    }
}

fn fork_flat<T, F>(span: Span, dst: &mut [T], cutoff: usize, f: &F)
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    debug_assert_eq!(span.len(), dst.len());
    if span.len() < cutoff || span.len() < 2 {
        for (slot, i) in dst.iter_mut().zip(span.iter()) {
            *slot = f(i);
        }
        return;
    }
    let (left, right) = span.split();
    let (dst_left, dst_right) = dst.split_at_mut(left.len());
    rayon::join(
        || fork_flat(left, dst_left, cutoff, f),
        || fork_flat(right, dst_right, cutoff, f),
    );
}

fn fork_rows<T, F>(rows: Span, dst: &mut [T], row_len: usize, cutoff: usize, f: &F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    debug_assert_eq!(rows.len() * row_len, dst.len());
    if dst.len() < cutoff || rows.len() < 2 {
        for (row, out) in rows.iter().zip(dst.chunks_exact_mut(row_len)) {
            f(row, out);
        }
        return;
    }
    let (top, bottom) = rows.split();
    let (dst_top, dst_bottom) = dst.split_at_mut(top.len() * row_len);
    rayon::join(
        || fork_rows(top, dst_top, row_len, cutoff, f),
        || fork_rows(bottom, dst_bottom, row_len, cutoff, f),
    );
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
