#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `fuzzy-tensor` provides the small array layer the raster filters are built on:
//!
//! - **Tensor**: owned, row-major, rank fixed at compile time through a const generic
//! - **TensorView**: non-owning strided view, the basis of [`sliding_window_view`]
//! - **allocator**: fallible buffer reservation so that out-of-memory surfaces as an error
//!
//! # Quick Start
//!
//! ```rust
//! use fuzzy_tensor::{sliding_window_view, Tensor2};
//!
//! let t = Tensor2::<u8>::from_shape_vec([3, 3], (0..9).collect()).unwrap();
//!
//! // every 2x2 neighbourhood, without copying the buffer
//! let windows = sliding_window_view(&t, [2, 2]).unwrap();
//! assert_eq!(windows.shape, [2, 2, 2, 2]);
//! assert_eq!(*windows.get_unchecked([1, 1, 1, 1]), 8);
//! ```

/// Allocator module containing fallible buffer reservation.
pub mod allocator;

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

/// View module containing non-owning tensor views and the sliding window primitive.
pub mod view;

pub use crate::allocator::TensorAllocatorError;
pub use crate::tensor::{get_strides_from_shape, Tensor, TensorError};
pub use crate::view::{sliding_window_view, TensorView};

/// Type alias for a 1-dimensional tensor.
pub type Tensor1<T> = Tensor<T, 1>;

/// Type alias for a 2-dimensional tensor.
pub type Tensor2<T> = Tensor<T, 2>;

/// Type alias for a 3-dimensional tensor.
pub type Tensor3<T> = Tensor<T, 3>;

/// Type alias for a 4-dimensional tensor.
pub type Tensor4<T> = Tensor<T, 4>;
