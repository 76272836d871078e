use fuzzy_tensor::{Tensor2, TensorAllocatorError, TensorError};
use rayon::prelude::*;

use crate::error::ImgprocError;

/// A border type for the spatial padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// Fills the border with a single constant value.
    ///
    /// Example: ...0 0 0 | a b c d | 0 0 0...
    Constant,

    /// Repeats the outermost row or column into the padded region.
    ///
    /// Example: ...a a a | a b c d | d d d...
    Edge,

    /// Mirrors the values across the boundary, starting with the pixel next to the edge.
    ///
    /// Example: ...d c b | a b c d | c b a...
    Reflect,

    /// Mirrors the values across the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...c b a | a b c d | d c b...
    Symmetric,

    /// Wraps the content from the opposite side.
    ///
    /// Example: ...b c d | a b c d | a b c...
    Wrap,
}

impl PaddingMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        let period = 2 * (len as isize - 1);
        let i = i.rem_euclid(period);
        if i >= len as isize {
            (period - i) as usize
        } else {
            i as usize
        }
    }

    #[inline]
    fn symmetric(i: isize, len: usize) -> usize {
        let period = 2 * len as isize;
        let i = i.rem_euclid(period);
        if i >= len as isize {
            (period - 1 - i) as usize
        } else {
            i as usize
        }
    }

    #[inline]
    fn wrap(i: isize, len: usize) -> usize {
        i.rem_euclid(len as isize) as usize
    }

    /// Minimum axis length the mode needs to fill a non-empty border.
    pub fn min_axis_len(&self) -> usize {
        match self {
            PaddingMode::Constant => 0,
            PaddingMode::Edge | PaddingMode::Symmetric | PaddingMode::Wrap => 1,
            PaddingMode::Reflect => 2,
        }
    }

    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the padding mode.
    ///
    /// - `Edge`: clamp to edge
    /// - `Reflect`: mirror excluding edge, period `2 * (len - 1)`
    /// - `Symmetric`: mirror including edge, period `2 * len`
    /// - `Wrap`: circular wrap
    /// - `Constant`: returns 0 (not used directly)
    ///
    /// # Arguments
    /// - `i`: The (possibly out-of-range) coordinate index.
    /// - `len`: The valid length of the dimension, at least [`PaddingMode::min_axis_len`].
    ///
    /// # Example
    /// ```rust
    /// use fuzzy_imgproc::padding::PaddingMode;
    ///
    /// assert_eq!(PaddingMode::Reflect.map_index(-1, 4), 1);
    /// assert_eq!(PaddingMode::Reflect.map_index(4, 4), 2);
    /// assert_eq!(PaddingMode::Symmetric.map_index(-1, 4), 0);
    /// assert_eq!(PaddingMode::Wrap.map_index(-1, 4), 3);
    /// ```
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        match self {
            PaddingMode::Edge => i.clamp(0, len as isize - 1) as usize,
            PaddingMode::Reflect => Self::reflect(i, len),
            PaddingMode::Symmetric => Self::symmetric(i, len),
            PaddingMode::Wrap => Self::wrap(i, len),
            PaddingMode::Constant => 0,
        }
    }

    fn validate_axis(&self, axis: usize, len: usize, amount: usize) -> Result<(), ImgprocError> {
        let min = self.min_axis_len();
        if amount > 0 && len < min {
            return Err(ImgprocError::AxisTooShort { axis, len, min });
        }
        Ok(())
    }

    /// Fills the border of `new_data`, which already holds the source in its center.
    ///
    /// # Notes
    /// - [`PaddingMode::Constant`] is assumed to be already applied when initializing `new_data`.
    fn apply_padding<T: Copy + Send + Sync>(
        &self,
        new_data: &mut [T],
        old_width: usize,
        old_height: usize,
        new_width: usize,
        new_height: usize,
        padding: &Padding2D,
    ) {
        if let PaddingMode::Constant = self {
            return; // already filled
        }

        let top = padding.top;
        let bottom = padding.bottom;
        let left = padding.left;
        let row_stride = new_width;

        // top
        {
            let (top_section, rest) = new_data.split_at_mut(top * row_stride);

            top_section
                .par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(y, dst_row)| {
                    let src_y = self.map_index(y as isize - top as isize, old_height);
                    let src_row = &rest[src_y * row_stride..(src_y + 1) * row_stride];
                    dst_row.copy_from_slice(src_row);
                });
        }

        // bottom
        {
            let split_point = (new_height - bottom) * row_stride;
            let (rest, bottom_section) = new_data.split_at_mut(split_point);

            bottom_section
                .par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(idx, dst_row)| {
                    let y = new_height - bottom + idx;
                    let src_y = self.map_index(y as isize - top as isize, old_height);
                    let src_start = (src_y + top) * row_stride;
                    dst_row.copy_from_slice(&rest[src_start..src_start + row_stride]);
                });
        }

        // left and right
        new_data.par_chunks_exact_mut(row_stride).for_each(|row| {
            for x in (0..left).chain((left + old_width)..new_width) {
                let src_x = self.map_index(x as isize - left as isize, old_width);
                row[x] = row[left + src_x];
            }
        });
    }
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// The same amount of padding on all four sides.
    pub const fn uniform(amount: usize) -> Self {
        Self {
            top: amount,
            bottom: amount,
            left: amount,
            right: amount,
        }
    }

    /// Returns the `[rows, cols]` shape obtained by padding a tensor of `shape`.
    ///
    /// # Returns
    /// `None` if the padded shape overflows `usize`.
    ///
    /// # Example
    /// ```rust
    /// use fuzzy_imgproc::padding::Padding2D;
    ///
    /// let padding = Padding2D { top: 1, bottom: 1, left: 2, right: 2 };
    /// assert_eq!(padding.padded_shape([4, 4]), Some([6, 8]));
    /// ```
    pub fn padded_shape(&self, shape: [usize; 2]) -> Option<[usize; 2]> {
        let rows = shape[0].checked_add(self.top)?.checked_add(self.bottom)?;
        let cols = shape[1].checked_add(self.left)?.checked_add(self.right)?;
        Some([rows, cols])
    }
}

/// Creates a new tensor with spatial padding applied, centering the source.
///
/// # Arguments
///
/// * `src` - The source tensor with shape (H, W).
/// * `padding` - The amount of padding for all four sides defined in [`Padding2D`].
/// * `padding_mode` - The type of border handling defined in [`PaddingMode`].
/// * `constant_value` - The value used for [`PaddingMode::Constant`]; ignored otherwise.
///
/// # Returns
///
/// A tensor with shape (H + top + bottom, W + left + right).
///
/// # Errors
///
/// * [`ImgprocError::AxisTooShort`] if a padded axis is shorter than
///   [`PaddingMode::min_axis_len`] (e.g. reflecting a single row).
/// * An allocation error if the padded buffer cannot be reserved.
///
/// # Example
///
/// ```rust
/// use fuzzy_tensor::Tensor2;
/// use fuzzy_imgproc::padding::{spatial_padding, Padding2D, PaddingMode};
///
/// let src = Tensor2::<u8>::from_shape_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
/// let dst = spatial_padding(&src, Padding2D::uniform(1), PaddingMode::Reflect, 0).unwrap();
///
/// assert_eq!(dst.shape, [4, 4]);
/// assert_eq!(dst.as_slice(), &[
///     4, 3, 4, 3,
///     2, 1, 2, 1,
///     4, 3, 4, 3,
///     2, 1, 2, 1,
/// ]);
/// ```
pub fn spatial_padding<T>(
    src: &Tensor2<T>,
    padding: Padding2D,
    padding_mode: PaddingMode,
    constant_value: T,
) -> Result<Tensor2<T>, ImgprocError>
where
    T: Copy + Send + Sync,
{
    let [old_height, old_width] = src.shape;

    padding_mode.validate_axis(0, old_height, padding.top.saturating_add(padding.bottom))?;
    padding_mode.validate_axis(1, old_width, padding.left.saturating_add(padding.right))?;

    let [new_height, new_width] = padding.padded_shape(src.shape).ok_or_else(|| {
        TensorError::from(TensorAllocatorError::CapacityOverflow(vec![
            old_height,
            old_width,
        ]))
    })?;

    log::trace!(
        "spatial_padding: {old_height}x{old_width} -> {new_height}x{new_width} ({padding_mode:?})"
    );

    let mut dst = Tensor2::from_shape_val([new_height, new_width], constant_value)?;
    if dst.numel() == 0 {
        return Ok(dst);
    }

    let new_data = dst.as_slice_mut();

    // copy old data as center of new data
    if old_width > 0 {
        for (y, src_row) in src.as_slice().chunks_exact(old_width).enumerate() {
            let start = (y + padding.top) * new_width + padding.left;
            new_data[start..start + old_width].copy_from_slice(src_row);
        }
    }

    padding_mode.apply_padding(
        new_data, old_width, old_height, new_width, new_height, &padding,
    );

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    // helper functions
    fn make_src_2x2() -> Result<Tensor2<u8>, TensorError> {
        Tensor2::from_shape_vec([2, 2], vec![1, 2, 3, 4])
    }

    fn make_src_3x4() -> Result<Tensor2<i32>, TensorError> {
        Tensor2::from_shape_fn([3, 4], |[i, j]| (i * 4 + j) as i32)
    }

    const PAD_1: Padding2D = Padding2D::uniform(1);

    #[test]
    fn test_map_index_reflect() {
        let len = 4;
        let mapped: Vec<usize> = (-5..9)
            .map(|i| PaddingMode::Reflect.map_index(i, len))
            .collect();
        // ... 3 2 1 | 0 1 2 3 | 2 1 0 1 2 ...
        assert_eq!(mapped, vec![1, 2, 3, 2, 1, 0, 1, 2, 3, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn test_map_index_symmetric_edge_wrap() {
        assert_eq!(PaddingMode::Symmetric.map_index(-1, 3), 0);
        assert_eq!(PaddingMode::Symmetric.map_index(-4, 3), 2);
        assert_eq!(PaddingMode::Symmetric.map_index(3, 3), 2);
        assert_eq!(PaddingMode::Edge.map_index(-7, 3), 0);
        assert_eq!(PaddingMode::Edge.map_index(9, 3), 2);
        assert_eq!(PaddingMode::Wrap.map_index(-1, 3), 2);
        assert_eq!(PaddingMode::Wrap.map_index(7, 3), 1);
    }

    #[test]
    fn test_spatial_padding_constant() -> Result<(), ImgprocError> {
        let src = make_src_2x2()?;
        let dst = spatial_padding(&src, PAD_1, PaddingMode::Constant, 9)?;

        #[rustfmt::skip]
        let expected = [
            9, 9, 9, 9,
            9, 1, 2, 9,
            9, 3, 4, 9,
            9, 9, 9, 9,
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_edge() -> Result<(), ImgprocError> {
        let src = make_src_2x2()?;
        let dst = spatial_padding(&src, PAD_1, PaddingMode::Edge, 0)?;

        #[rustfmt::skip]
        let expected = [
            1, 1, 2, 2,
            1, 1, 2, 2,
            3, 3, 4, 4,
            3, 3, 4, 4,
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_reflect() -> Result<(), ImgprocError> {
        let src = make_src_2x2()?;
        let dst = spatial_padding(&src, PAD_1, PaddingMode::Reflect, 0)?;

        // row -1 mirrors row 1, column -1 mirrors column 1
        assert_eq!(dst.shape, [4, 4]);
        assert_eq!(&dst.as_slice()[0..4], &[4, 3, 4, 3]);
        assert_eq!(&dst.as_slice()[12..16], &[2, 1, 2, 1]);
        assert_eq!(dst.get([1, 0]), Some(&2));
        assert_eq!(dst.get([2, 3]), Some(&3));

        // actual image
        assert_eq!(dst.get([1, 1]), Some(&1));
        assert_eq!(dst.get([2, 2]), Some(&4));

        Ok(())
    }

    #[test]
    fn test_spatial_padding_symmetric() -> Result<(), ImgprocError> {
        let src = make_src_2x2()?;
        let dst = spatial_padding(&src, PAD_1, PaddingMode::Symmetric, 0)?;

        // with a single pixel of padding symmetric equals edge
        #[rustfmt::skip]
        let expected = [
            1, 1, 2, 2,
            1, 1, 2, 2,
            3, 3, 4, 4,
            3, 3, 4, 4,
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_wrap() -> Result<(), ImgprocError> {
        let src = make_src_2x2()?;
        let dst = spatial_padding(&src, PAD_1, PaddingMode::Wrap, 0)?;

        #[rustfmt::skip]
        let expected = [
            4, 3, 4, 3,
            2, 1, 2, 1,
            4, 3, 4, 3,
            2, 1, 2, 1,
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_reflect_asymmetric() -> Result<(), ImgprocError> {
        let src = make_src_3x4()?;
        let padding = Padding2D {
            top: 2,
            bottom: 0,
            left: 0,
            right: 3,
        };
        let dst = spatial_padding(&src, padding, PaddingMode::Reflect, -1)?;

        assert_eq!(dst.shape, [5, 7]);
        #[rustfmt::skip]
        let expected = [
            8, 9, 10, 11, 10, 9, 8,
            4, 5, 6, 7, 6, 5, 4,
            0, 1, 2, 3, 2, 1, 0,
            4, 5, 6, 7, 6, 5, 4,
            8, 9, 10, 11, 10, 9, 8,
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_larger_than_image_reflect() -> Result<(), ImgprocError> {
        let src = Tensor2::<u8>::from_shape_vec([1, 2], vec![5, 6])?;
        let padding = Padding2D {
            top: 0,
            bottom: 0,
            left: 3,
            right: 3,
        };
        let dst = spatial_padding(&src, padding, PaddingMode::Reflect, 0)?;
        assert_eq!(dst.as_slice(), &[6, 5, 6, 5, 6, 5, 6, 5]);
        Ok(())
    }

    #[test]
    fn test_spatial_padding_larger_than_image_edge() -> Result<(), ImgprocError> {
        let src = Tensor2::<u8>::from_shape_vec([1, 1], vec![7])?;
        let padding = Padding2D {
            top: 3,
            bottom: 3,
            left: 4,
            right: 4,
        };
        let dst = spatial_padding(&src, padding, PaddingMode::Edge, 0)?;
        assert_eq!(dst.shape, [7, 9]);
        assert!(dst.as_slice().iter().all(|&v| v == 7));
        Ok(())
    }

    #[test]
    fn test_spatial_padding_reflect_single_row() -> Result<(), ImgprocError> {
        let src = Tensor2::<u8>::from_shape_vec([1, 3], vec![1, 2, 3])?;

        let res = spatial_padding(&src, PAD_1, PaddingMode::Reflect, 0);
        assert_eq!(
            res,
            Err(ImgprocError::AxisTooShort {
                axis: 0,
                len: 1,
                min: 2,
            })
        );

        // only padding the columns is fine
        let padding = Padding2D {
            top: 0,
            bottom: 0,
            left: 1,
            right: 1,
        };
        let dst = spatial_padding(&src, padding, PaddingMode::Reflect, 0)?;
        assert_eq!(dst.as_slice(), &[2, 1, 2, 3, 2]);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_shape_overflow() -> Result<(), ImgprocError> {
        let src = make_src_2x2()?;
        let err = spatial_padding(&src, Padding2D::uniform(usize::MAX), PaddingMode::Constant, 0)
            .unwrap_err();

        assert!(err.is_out_of_memory());
        assert!(!err.is_shape_error());
        assert_eq!(
            err,
            ImgprocError::TensorError(TensorError::StorageError(
                TensorAllocatorError::CapacityOverflow(vec![2, 2])
            ))
        );
        Ok(())
    }

    #[test]
    fn test_spatial_padding_empty_constant() -> Result<(), ImgprocError> {
        let src = Tensor2::<u8>::from_shape_vec([0, 0], vec![])?;
        let dst = spatial_padding(&src, PAD_1, PaddingMode::Constant, 3)?;
        assert_eq!(dst.shape, [2, 2]);
        assert_eq!(dst.as_slice(), &[3, 3, 3, 3]);

        let res = spatial_padding(&src, PAD_1, PaddingMode::Wrap, 0);
        assert!(matches!(res, Err(ImgprocError::AxisTooShort { min: 1, .. })));
        Ok(())
    }
}
