use fuzzy_tensor::TensorError;

use crate::parallel::ParallelError;

/// An error type for the image processing operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImgprocError {
    /// An axis is too short for the requested border handling.
    #[error("Axis {axis} has length {len}, but at least {min} is required")]
    AxisTooShort {
        /// Index of the offending axis (0 = rows, 1 = columns)
        axis: usize,
        /// Actual length of the axis
        len: usize,
        /// Minimum length accepted
        min: usize,
    },

    /// Error coming from the tensor layer (shape or allocation).
    #[error(transparent)]
    TensorError(#[from] TensorError),

    /// Error while scheduling the work on the thread pool.
    #[error(transparent)]
    ParallelError(#[from] ParallelError),
}

impl ImgprocError {
    /// Returns true if the input did not satisfy the shape contract of the operation.
    pub fn is_shape_error(&self) -> bool {
        match self {
            Self::AxisTooShort { .. } => true,
            Self::TensorError(e) => e.is_shape_error(),
            Self::ParallelError(_) => false,
        }
    }

    /// Returns true if a buffer could not be allocated.
    pub fn is_out_of_memory(&self) -> bool {
        match self {
            Self::TensorError(e) => e.is_out_of_memory(),
            _ => false,
        }
    }
}
