use num_traits::AsPrimitive;
use thiserror::Error;

use crate::allocator::{numel_checked, try_alloc_vec, TensorAllocatorError};
use crate::view::TensorView;

/// Error type for tensor operations.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum TensorError {
    /// Tensor shape does not match the provided data.
    ///
    /// The product of the shape dimensions must equal the data length exactly.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// The number of dimensions of a runtime shape differs from the tensor rank.
    ///
    /// # Example
    /// ```ignore
    /// // Error: a 2-D tensor cannot be built from a 3-D shape
    /// let t = Tensor2::<u8>::from_dyn_shape_vec(&[2, 2, 1], vec![0; 4])?;
    /// ```
    #[error("Rank mismatch: expected a {expected}-dimensional shape, got {shape:?}")]
    RankMismatch {
        /// Rank required by the tensor type
        expected: usize,
        /// The offending shape
        shape: Vec<usize>,
    },

    /// A sliding window does not fit inside the source tensor.
    #[error("Window {window:?} does not fit in a tensor of shape {shape:?}")]
    WindowTooLarge {
        /// Requested window extent per axis
        window: Vec<usize>,
        /// Shape of the source tensor
        shape: Vec<usize>,
    },

    /// Underlying buffer could not be allocated.
    #[error("Storage error: {0}")]
    StorageError(#[from] TensorAllocatorError),
}

impl TensorError {
    /// Creates an InvalidShape error with clear context.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Returns true if the error belongs to the shape class (bad rank, extent or data length).
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidShape { .. } | Self::RankMismatch { .. } | Self::WindowTooLarge { .. }
        )
    }

    /// Returns true if the error comes from buffer allocation.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::StorageError(_))
    }
}

/// Computes the strides for a row-major (C-contiguous) tensor layout.
///
/// # Examples
///
/// ```rust
/// use fuzzy_tensor::tensor::get_strides_from_shape;
///
/// let strides = get_strides_from_shape([2, 3]);
/// assert_eq!(strides, [3, 1]);
///
/// let strides = get_strides_from_shape([2, 3, 4]);
/// assert_eq!(strides, [12, 4, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A multi-dimensional array with owned, row-major data.
///
/// # Type Parameters
///
/// * `T` - The element type stored in the tensor
/// * `N` - The number of dimensions, checked at compile time
///
/// # Examples
///
/// ```rust
/// use fuzzy_tensor::Tensor2;
///
/// let t = Tensor2::<u8>::from_shape_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
/// assert_eq!(t.shape, [2, 2]);
/// assert_eq!(t.get([1, 0]), Some(&3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T, const N: usize> {
    data: Vec<T>,
    /// The shape of the tensor.
    pub shape: [usize; N],
    /// The strides of the tensor data in memory.
    pub strides: [usize; N],
}

impl<T, const N: usize> Tensor<T, N> {
    /// Creates a new `Tensor` with the given shape and data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the tensor, an error is returned.
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, TensorError> {
        let numel = numel_checked(&shape)?;
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        let strides = get_strides_from_shape(shape);
        Ok(Self {
            data,
            shape,
            strides,
        })
    }

    /// Creates a new `Tensor` from a shape only known at runtime.
    ///
    /// # Errors
    ///
    /// * [`TensorError::RankMismatch`] if `shape.len() != N`.
    /// * [`TensorError::InvalidShape`] if the data length does not match the shape.
    ///
    /// # Example
    ///
    /// ```
    /// use fuzzy_tensor::{Tensor2, TensorError};
    ///
    /// let t = Tensor2::<u8>::from_dyn_shape_vec(&[2, 3], vec![0; 6]).unwrap();
    /// assert_eq!(t.shape, [2, 3]);
    ///
    /// let err = Tensor2::<u8>::from_dyn_shape_vec(&[2, 3, 1], vec![0; 6]).unwrap_err();
    /// assert!(matches!(err, TensorError::RankMismatch { expected: 2, .. }));
    /// ```
    pub fn from_dyn_shape_vec(shape: &[usize], data: Vec<T>) -> Result<Self, TensorError> {
        let shape: [usize; N] = shape
            .try_into()
            .map_err(|_| TensorError::RankMismatch {
                expected: N,
                shape: shape.to_vec(),
            })?;
        Self::from_shape_vec(shape, data)
    }

    /// Creates a new `Tensor` by copying a slice laid out in a shape only known at runtime.
    ///
    /// # Errors
    ///
    /// Same as [`Tensor::from_dyn_shape_vec`].
    pub fn from_dyn_shape_slice(shape: &[usize], data: &[T]) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        let shape: [usize; N] = shape
            .try_into()
            .map_err(|_| TensorError::RankMismatch {
                expected: N,
                shape: shape.to_vec(),
            })?;
        Self::from_shape_slice(shape, data)
    }

    /// Creates a new `Tensor` with the given shape and slice of data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the tensor, an error is returned.
    pub fn from_shape_slice(shape: [usize; N], data: &[T]) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        let numel = numel_checked(&shape)?;
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        let mut buf = try_alloc_vec(numel)?;
        buf.extend_from_slice(data);
        Self::from_shape_vec(shape, buf)
    }

    /// Creates a new `Tensor` with the given shape filled with `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use fuzzy_tensor::Tensor2;
    ///
    /// let t = Tensor2::<u8>::from_shape_val([2, 2], 1).unwrap();
    /// assert_eq!(t.as_slice(), &[1, 1, 1, 1]);
    /// ```
    pub fn from_shape_val(shape: [usize; N], value: T) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        let numel = numel_checked(&shape)?;
        let mut data = try_alloc_vec(numel)?;
        data.resize(numel, value);
        Self::from_shape_vec(shape, data)
    }

    /// Creates a new `Tensor` with the given shape and a function to generate the data.
    ///
    /// The function `f` is called with the index of the element to generate, in row-major order.
    ///
    /// # Example
    ///
    /// ```
    /// use fuzzy_tensor::Tensor2;
    ///
    /// let t = Tensor2::<u8>::from_shape_fn([2, 2], |[i, j]| (i * 2 + j) as u8).unwrap();
    /// assert_eq!(t.as_slice(), &[0, 1, 2, 3]);
    /// ```
    pub fn from_shape_fn<F>(shape: [usize; N], f: F) -> Result<Self, TensorError>
    where
        F: Fn([usize; N]) -> T,
    {
        let numel = numel_checked(&shape)?;
        let mut data = try_alloc_vec(numel)?;
        for i in 0..numel {
            let mut index = [0; N];
            let mut j = i;
            for k in (0..N).rev() {
                index[k] = j % shape[k];
                j /= shape[k];
            }
            data.push(f(index));
        }
        Self::from_shape_vec(shape, data)
    }

    /// Creates a new `Tensor` filled with zeros.
    pub fn zeros(shape: [usize; N]) -> Result<Self, TensorError>
    where
        T: Clone + num_traits::Zero,
    {
        Self::from_shape_val(shape, T::zero())
    }

    /// Returns the number of elements in the tensor.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns the data slice of the tensor.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the data slice of the tensor as mutable.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the tensor and returns the underlying buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns the offset of the element at the given index, if every axis is in range.
    pub fn get_iter_offset(&self, index: [usize; N]) -> Option<usize> {
        let mut offset = 0;
        for ((&idx, &dim_size), &stride) in index.iter().zip(self.shape.iter()).zip(&self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Returns a reference to the element at the given index.
    ///
    /// # Returns
    ///
    /// `None` if any axis of the index is out of range.
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.get_iter_offset(index).and_then(|o| self.data.get(o))
    }

    /// Returns a reference to the element at the given index without checking each axis.
    ///
    /// # Panics
    ///
    /// Panics if the flat offset falls outside the buffer.
    #[inline]
    pub fn get_unchecked(&self, index: [usize; N]) -> &T {
        let offset = index
            .iter()
            .zip(self.strides.iter())
            .fold(0, |acc, (i, s)| acc + i * s);
        &self.data[offset]
    }

    /// Returns a non-owning view with the same shape and strides.
    pub fn view(&self) -> TensorView<'_, T, N> {
        TensorView {
            data: &self.data,
            shape: self.shape,
            strides: self.strides,
        }
    }

    /// Applies `f` to every element, producing a tensor of the same shape.
    pub fn map<U, F>(&self, f: F) -> Result<Tensor<U, N>, TensorError>
    where
        F: Fn(&T) -> U,
    {
        let mut data = try_alloc_vec(self.numel())?;
        data.extend(self.data.iter().map(f));
        Ok(Tensor {
            data,
            shape: self.shape,
            strides: self.strides,
        })
    }

    /// Casts every element to `f64`, preserving the shape.
    ///
    /// # Example
    ///
    /// ```
    /// use fuzzy_tensor::Tensor2;
    ///
    /// let t = Tensor2::<u8>::from_shape_vec([1, 3], vec![0, 128, 255]).unwrap();
    /// let t64 = t.cast_f64().unwrap();
    /// assert_eq!(t64.as_slice(), &[0.0, 128.0, 255.0]);
    /// ```
    pub fn cast_f64(&self) -> Result<Tensor<f64, N>, TensorError>
    where
        T: AsPrimitive<f64>,
    {
        self.map(|x| x.as_())
    }
}

impl<T, const N: usize> std::fmt::Display for Tensor<T, N>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cols = self.shape.last().copied().unwrap_or(0);
        if cols == 0 || self.data.is_empty() {
            return write!(f, "[]");
        }
        let width = self
            .data
            .iter()
            .map(|v| format!("{v:.4}").len())
            .max()
            .unwrap_or(0);
        for (r, row) in self.data.chunks_exact(cols).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (c, v) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                let rounded = format!("{v:.4}");
                write!(f, "{rounded:>width$}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::tensor::TensorError;
    use crate::{Tensor1, Tensor2, Tensor3};

    #[test]
    fn constructor_2d() -> Result<(), TensorError> {
        let data: Vec<u8> = vec![1, 2];
        let t = Tensor2::<u8>::from_shape_vec([1, 2], data)?;
        assert_eq!(t.shape, [1, 2]);
        assert_eq!(t.as_slice(), &[1, 2]);
        assert_eq!(t.strides, [2, 1]);
        assert_eq!(t.numel(), 2);
        Ok(())
    }

    #[test]
    fn constructor_invalid_shape() {
        let res = Tensor2::<u8>::from_shape_vec([2, 2], vec![1, 2, 3]);
        assert_eq!(res, Err(TensorError::invalid_shape(4, 3)));
    }

    #[test]
    fn constructor_dyn_shape() -> Result<(), TensorError> {
        let t = Tensor2::<i32>::from_dyn_shape_vec(&[3, 2], vec![1, 2, 3, 4, 5, 6])?;
        assert_eq!(t.shape, [3, 2]);
        assert_eq!(t.get([2, 1]), Some(&6));

        let err = Tensor2::<i32>::from_dyn_shape_vec(&[6], vec![1, 2, 3, 4, 5, 6]).unwrap_err();
        assert_eq!(
            err,
            TensorError::RankMismatch {
                expected: 2,
                shape: vec![6],
            }
        );
        assert!(err.is_shape_error());
        assert!(!err.is_out_of_memory());

        let err = Tensor2::<i32>::from_dyn_shape_vec(&[1, 2, 3], vec![0; 6]).unwrap_err();
        assert!(matches!(err, TensorError::RankMismatch { expected: 2, .. }));
        Ok(())
    }

    #[test]
    fn constructor_overflow_is_allocation_error() {
        let err = Tensor2::<u8>::from_shape_val([usize::MAX, 2], 0).unwrap_err();
        assert!(err.is_out_of_memory());
        assert!(!err.is_shape_error());
    }

    #[test]
    fn get_2d() -> Result<(), TensorError> {
        let data: Vec<u8> = vec![1, 2, 3, 4];
        let t = Tensor2::<u8>::from_shape_vec([2, 2], data)?;
        assert_eq!(t.get([0, 0]), Some(&1));
        assert_eq!(t.get([0, 1]), Some(&2));
        assert_eq!(t.get([1, 0]), Some(&3));
        assert_eq!(t.get([1, 1]), Some(&4));
        assert!(t.get([2, 0]).is_none());
        assert!(t.get([0, 2]).is_none());
        assert_eq!(*t.get_unchecked([1, 1]), 4);
        Ok(())
    }

    #[test]
    fn get_3d() -> Result<(), TensorError> {
        let data: Vec<u8> = vec![1, 2, 3, 4, 5, 6];
        let t = Tensor3::<u8>::from_shape_vec([2, 1, 3], data)?;
        assert_eq!(t.get([0, 0, 2]), Some(&3));
        assert_eq!(t.get([1, 0, 0]), Some(&4));
        assert!(t.get([0, 1, 0]).is_none());
        Ok(())
    }

    #[test]
    fn from_shape_fn_row_major() -> Result<(), TensorError> {
        let t = Tensor2::<usize>::from_shape_fn([2, 3], |[i, j]| i * 10 + j)?;
        assert_eq!(t.as_slice(), &[0, 1, 2, 10, 11, 12]);
        Ok(())
    }

    #[test]
    fn zeros_and_map() -> Result<(), TensorError> {
        let t = Tensor1::<i16>::zeros([3])?;
        let t2 = t.map(|x| x + 7)?;
        assert_eq!(t2.as_slice(), &[7, 7, 7]);
        assert_eq!(t2.shape, [3]);
        Ok(())
    }

    #[test]
    fn cast_f64_signed() -> Result<(), TensorError> {
        let t = Tensor2::<i8>::from_shape_vec([1, 3], vec![-128, 0, 127])?;
        let t64 = t.cast_f64()?;
        assert_eq!(t64.as_slice(), &[-128.0, 0.0, 127.0]);
        assert_eq!(t64.shape, t.shape);
        Ok(())
    }

    #[test]
    fn display_rows() -> Result<(), TensorError> {
        let t = Tensor2::<f64>::from_shape_vec([2, 2], vec![1.0, 2.5, -3.0, 4.0])?;
        assert_eq!(
            format!("{t}"),
            "[ 1.0000,  2.5000]\n[-3.0000,  4.0000]"
        );
        Ok(())
    }
}
