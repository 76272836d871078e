use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),

    /// The destination length is not a whole number of rows.
    #[error("destination length {len} is not a multiple of the row stride {stride}")]
    SizeMismatch {
        /// Length of the destination slice
        len: usize,
        /// Row stride used to split the slice
        stride: usize,
    },
}

/// Controls how output rows are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run every row on the calling thread.
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run on a dedicated pool of `n` threads.
    ///
    /// The pool is built per call and dropped afterwards.
    Fixed(usize),
}

/// Calls `f(row_index, row)` once for every row of `dst`.
///
/// Every row is handed to exactly one invocation, so rows can be written independently
/// while `f` only reads shared, immutable state.
///
/// # Arguments
///
/// * `dst` - The destination buffer, row-major.
/// * `stride` - The number of elements per row.
/// * `strategy` - The execution strategy.
/// * `f` - The per-row operation.
///
/// # Errors
///
/// * [`ParallelError::InvalidRowStride`] if `stride` is zero.
/// * [`ParallelError::SizeMismatch`] if `dst` is not a whole number of rows.
/// * [`ParallelError::InvalidThreadCount`] / [`ParallelError::BuildError`] for a bad
///   [`ExecutionStrategy::Fixed`] pool.
///
/// # Example
///
/// ```
/// use fuzzy_imgproc::parallel::{for_each_row, ExecutionStrategy};
///
/// let mut dst = vec![0usize; 6];
/// for_each_row(&mut dst, 3, ExecutionStrategy::Serial, |r, row| {
///     row.iter_mut().enumerate().for_each(|(c, v)| *v = r * 3 + c);
/// })
/// .unwrap();
/// assert_eq!(dst, vec![0, 1, 2, 3, 4, 5]);
/// ```
pub fn for_each_row<T, F>(
    dst: &mut [T],
    stride: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if stride == 0 {
        return Err(ParallelError::InvalidRowStride(stride));
    }
    if dst.len() % stride != 0 {
        return Err(ParallelError::SizeMismatch {
            len: dst.len(),
            stride,
        });
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(stride)
                .enumerate()
                .for_each(|(r, row)| f(r, row));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(stride)
                .enumerate()
                .for_each(|(r, row)| f(r, row));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(stride)
                    .enumerate()
                    .for_each(|(r, row)| f(r, row));
            });
        }
    }
    Ok(())
}
