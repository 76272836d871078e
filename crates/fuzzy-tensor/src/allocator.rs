use thiserror::Error;

/// An error type for tensor allocation.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TensorAllocatorError {
    /// The requested element count does not fit in `usize`.
    #[error("Capacity overflow: the product of shape {0:?} does not fit in usize")]
    CapacityOverflow(Vec<usize>),

    /// The system allocator could not reserve the requested buffer.
    #[error("Out of memory: failed to reserve {0} bytes")]
    OutOfMemory(usize),
}

/// Computes the number of elements of a shape, checking for overflow.
///
/// # Arguments
///
/// * `shape` - The extent of each dimension.
///
/// # Returns
///
/// The product of all dimensions, or [`TensorAllocatorError::CapacityOverflow`].
///
/// # Example
///
/// ```
/// use fuzzy_tensor::allocator::numel_checked;
///
/// assert_eq!(numel_checked(&[2, 3, 4]), Ok(24));
/// assert!(numel_checked(&[usize::MAX, 2]).is_err());
/// ```
pub fn numel_checked(shape: &[usize]) -> Result<usize, TensorAllocatorError> {
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| TensorAllocatorError::CapacityOverflow(shape.to_vec()))
}

/// Reserves an empty vector able to hold exactly `len` elements.
///
/// Allocation failure is reported instead of aborting the process.
pub fn try_alloc_vec<T>(len: usize) -> Result<Vec<T>, TensorAllocatorError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| {
        TensorAllocatorError::OutOfMemory(len.saturating_mul(std::mem::size_of::<T>()))
    })?;
    Ok(data)
}
