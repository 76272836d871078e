use fuzzy_tensor::{sliding_window_view, Tensor2, TensorView};
use num_traits::AsPrimitive;

use crate::{
    error::ImgprocError,
    padding::{spatial_padding, Padding2D, PaddingMode},
    parallel::{for_each_row, ExecutionStrategy},
};

/// Offsets of the 4-connected neighbours inside a 3x3 window: west, east, north, south.
///
/// ```text
///         +---+
///         | n |
///     +---+---+---+
///     | w | x | e |
///     +---+---+---+
///         | s |
///         +---+
/// ```
const CROSS_OFFSETS: [[usize; 2]; 4] = [[1, 0], [1, 2], [0, 1], [2, 1]];

/// Weight of each neighbour in the mean.
const CROSS_WEIGHT: f64 = 0.25;

/// Minimum length of each axis; reflecting a single row or column has no interior to mirror.
const MIN_AXIS_LEN: usize = 2;

fn check_axes(shape: [usize; 2]) -> Result<(), ImgprocError> {
    for (axis, &len) in shape.iter().enumerate() {
        if len < MIN_AXIS_LEN {
            return Err(ImgprocError::AxisTooShort {
                axis,
                len,
                min: MIN_AXIS_LEN,
            });
        }
    }
    Ok(())
}

#[inline]
fn cross_mean(windows: &TensorView<'_, f64, 4>, row: usize, col: usize) -> f64 {
    // scale before summing so that values near f64::MAX do not overflow
    CROSS_OFFSETS
        .iter()
        .map(|&[dy, dx]| CROSS_WEIGHT * *windows.get_unchecked([row, col, dy, dx]))
        .sum()
}

/// Defocus a raster by the local arithmetic mean of the 4-connected neighbourhood.
///
/// Each output pixel is `0.25 * (w + e + n + s)`, the mean of the pixels directly left, right,
/// above and below it, with the borders reflected. This attenuates isolated outliers
/// ("salt & pepper" noise) in quantized data. The output never leaves the range of the
/// input, but it is always `f64`.
///
/// # Arguments
///
/// * `src` - The source raster with shape (H, W). No normalization is required.
///
/// # Returns
///
/// A new `f64` raster with shape (H, W).
///
/// # Errors
///
/// * [`ImgprocError::AxisTooShort`] if H or W is smaller than 2.
/// * An allocation error if the padded or output buffer cannot be reserved.
///
/// # Example
///
/// ```
/// use fuzzy_tensor::Tensor2;
/// use fuzzy_imgproc::defocus::defocus_local_means;
///
/// let src = Tensor2::<u8>::from_shape_vec([3, 3], vec![
///     10, 10, 10,
///     10,  0, 10,
///     10, 10, 10,
/// ]).unwrap();
///
/// let dst = defocus_local_means(&src).unwrap();
/// assert_eq!(dst.shape, [3, 3]);
/// assert_eq!(dst.get([1, 1]), Some(&10.0));
/// ```
pub fn defocus_local_means<T>(src: &Tensor2<T>) -> Result<Tensor2<f64>, ImgprocError>
where
    T: AsPrimitive<f64>,
{
    defocus_local_means_with(src, ExecutionStrategy::default())
}

/// Same as [`defocus_local_means`], scheduling the output rows with `strategy`.
///
/// The result does not depend on the strategy.
pub fn defocus_local_means_with<T>(
    src: &Tensor2<T>,
    strategy: ExecutionStrategy,
) -> Result<Tensor2<f64>, ImgprocError>
where
    T: AsPrimitive<f64>,
{
    check_axes(src.shape)?;

    let [rows, cols] = src.shape;
    log::debug!("defocus_local_means: {rows}x{cols} with {strategy:?}");

    let padded = spatial_padding(
        &src.cast_f64()?,
        Padding2D::uniform(1),
        PaddingMode::Reflect,
        0.0,
    )?;

    // [rows, cols, 3, 3] view over the padded buffer
    let windows = sliding_window_view(&padded, [3, 3])?;

    let mut dst = Tensor2::<f64>::zeros([rows, cols])?;
    for_each_row(dst.as_slice_mut(), cols, strategy, |r, dst_row| {
        dst_row
            .iter_mut()
            .enumerate()
            .for_each(|(c, out)| *out = cross_mean(&windows, r, c));
    })?;

    Ok(dst)
}

/// Defocus a raster whose shape is only known at runtime.
///
/// # Arguments
///
/// * `shape` - The shape of `data`; must be exactly `[H, W]`.
/// * `data` - The row-major pixel buffer.
///
/// # Errors
///
/// * A rank mismatch error if `shape` does not have exactly two dimensions.
/// * A shape error if `data.len()` differs from the product of `shape`.
/// * Any error of [`defocus_local_means`].
///
/// # Example
///
/// ```
/// use fuzzy_imgproc::defocus::defocus_local_means_dyn;
///
/// let res = defocus_local_means_dyn(&[2, 2, 1], &[1u8, 2, 3, 4]);
/// assert!(res.unwrap_err().is_shape_error());
/// ```
pub fn defocus_local_means_dyn<T>(
    shape: &[usize],
    data: &[T],
) -> Result<Tensor2<f64>, ImgprocError>
where
    T: AsPrimitive<f64>,
{
    let src = Tensor2::from_dyn_shape_slice(shape, data)?;
    defocus_local_means(&src)
}

/// Apply [`defocus_local_means`] `iterations` times, feeding each output into the next pass.
///
/// With zero iterations the input is returned cast to `f64`.
pub fn defocus_local_means_iter<T>(
    src: &Tensor2<T>,
    iterations: usize,
) -> Result<Tensor2<f64>, ImgprocError>
where
    T: AsPrimitive<f64>,
{
    check_axes(src.shape)?;

    let mut current = src.cast_f64()?;
    for _ in 0..iterations {
        current = defocus_local_means(&current)?;
    }
    Ok(current)
}
