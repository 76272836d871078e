use crate::allocator::try_alloc_vec;
use crate::{Tensor, Tensor2, TensorError};

/// A non-owning view into tensor data.
///
/// `TensorView` borrows the buffer of another tensor and carries its own shape and strides,
/// so the same memory can be read under a different logical layout without copying.
///
/// # Examples
///
/// ```rust
/// use fuzzy_tensor::Tensor2;
///
/// let t = Tensor2::<i32>::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
/// let view = t.view();
/// assert_eq!(view.shape, [2, 3]);
/// assert_eq!(*view.get_unchecked([1, 2]), 6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a, T, const N: usize> {
    /// Reference to the buffer held by another tensor.
    pub data: &'a [T],

    /// The shape of the tensor view.
    pub shape: [usize; N],

    /// The strides for accessing elements in the view.
    pub strides: [usize; N],
}

impl<T, const N: usize> TensorView<'_, T, N> {
    /// Returns the whole borrowed buffer, regardless of the view layout.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.data
    }

    /// Returns the number of logical elements in the view.
    ///
    /// Overlapping views (such as sliding windows) report more elements than the buffer holds.
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Gets the element at the given index without checking each axis against the shape.
    ///
    /// # Panics
    ///
    /// Panics if the strided offset falls outside the borrowed buffer.
    #[inline]
    pub fn get_unchecked(&self, index: [usize; N]) -> &T {
        let offset = index
            .iter()
            .zip(self.strides.iter())
            .fold(0, |acc, (i, s)| acc + i * s);
        &self.data[offset]
    }

    /// Gets the element at the given index.
    ///
    /// # Returns
    ///
    /// `None` if any axis of the index is out of range.
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        let mut offset = 0;
        for ((&idx, &dim_size), &stride) in index.iter().zip(self.shape.iter()).zip(&self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        self.data.get(offset)
    }

    /// Copies the view into an owned tensor with standard row-major layout.
    pub fn to_tensor(&self) -> Result<Tensor<T, N>, TensorError>
    where
        T: Clone,
    {
        let numel = self.numel();
        let mut data = try_alloc_vec(numel)?;
        let mut index = [0; N];
        for _ in 0..numel {
            data.push(self.get_unchecked(index).clone());

            // increment the row-major index
            for k in (0..N).rev() {
                index[k] += 1;
                if index[k] < self.shape[k] {
                    break;
                }
                index[k] = 0;
            }
        }
        Tensor::from_shape_vec(self.shape, data)
    }
}

/// Creates a sliding window view over a 2-D tensor.
///
/// The result has logical shape `[rows - wr + 1, cols - wc + 1, wr, wc]`, and element
/// `[i, j, a, b]` is `src[i + a, j + b]`. The view shares the buffer of `src`.
///
/// # Arguments
///
/// * `src` - The tensor to window over.
/// * `window` - The window extent `[wr, wc]`.
///
/// # Errors
///
/// Returns [`TensorError::WindowTooLarge`] if a window extent is zero or exceeds the
/// corresponding axis of `src`.
///
/// # Example
///
/// ```
/// use fuzzy_tensor::{sliding_window_view, Tensor2};
///
/// let t = Tensor2::<u8>::from_shape_fn([3, 4], |[i, j]| (i * 4 + j) as u8).unwrap();
/// let windows = sliding_window_view(&t, [3, 3]).unwrap();
///
/// assert_eq!(windows.shape, [1, 2, 3, 3]);
/// assert_eq!(*windows.get_unchecked([0, 1, 2, 0]), 9);
/// ```
pub fn sliding_window_view<T>(
    src: &Tensor2<T>,
    window: [usize; 2],
) -> Result<TensorView<'_, T, 4>, TensorError> {
    let [rows, cols] = src.shape;
    let [wr, wc] = window;
    if wr == 0 || wc == 0 || wr > rows || wc > cols {
        return Err(TensorError::WindowTooLarge {
            window: window.to_vec(),
            shape: src.shape.to_vec(),
        });
    }

    let [row_stride, col_stride] = src.strides;

    Ok(TensorView {
        data: src.as_slice(),
        shape: [rows - wr + 1, cols - wc + 1, wr, wc],
        strides: [row_stride, col_stride, row_stride, col_stride],
    })
}
