#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! ```rust
//! use fuzzy_imops::{imgproc::defocus::defocus_local_means, tensor::Tensor2};
//!
//! let noisy = Tensor2::<u8>::from_shape_vec([3, 3], vec![9, 9, 9, 9, 255, 9, 9, 9, 9]).unwrap();
//! let clean = defocus_local_means(&noisy).unwrap();
//! assert_eq!(clean.get([1, 1]), Some(&9.0));
//! ```

#[doc(inline)]
pub use fuzzy_tensor as tensor;

#[doc(inline)]
pub use fuzzy_imgproc as imgproc;
