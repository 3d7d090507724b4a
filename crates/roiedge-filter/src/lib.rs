//! roiedge-filter - Edge detection engine
//!
//! This crate provides the detector and its building blocks:
//!
//! - Convolution with arbitrary kernels, binomial smoothing
//! - Sobel gradients and non-maximum suppression
//! - Hysteresis thresholding and binarization
//! - [`canny_roi`], the full pipeline on one region of interest
//! - [`detect`], the byte-slice boundary call with status codes

pub mod boundary;
pub mod canny;
pub mod convolve;
pub mod edge;
mod error;
pub mod kernel;
pub mod threshold;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

// Re-export commonly used functions
pub use boundary::{detect, status_code};
pub use canny::{canny_gray, canny_roi};
pub use convolve::{binomial_smooth, fpix_convolve, fpix_convolve_sep};
pub use edge::{Direction, GradientField, non_max_suppression, sobel_gradient};
pub use threshold::{HysteresisStats, binarize, classify, hysteresis};
