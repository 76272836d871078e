#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// local-means defocusing module.
pub mod defocus;

/// Error types for the image processing module.
pub mod error;

/// spatial padding module.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

pub use crate::error::ImgprocError;
