//! roiedge Core - Basic data structures for ROI edge detection
//!
//! This crate provides the value types shared by every stage:
//!
//! - [`PixelBuffer`] / [`PixelBufferMut`] - The raster container (immutable / mutable)
//! - [`FloatImage`] - Floating-point plane for intermediate math
//! - [`Rect`] - Region of interest, and [`validate_roi`]
//! - [`DetectionParameters`] - Thresholds and binarization level
//! - [`Error`] / [`ErrorKind`] - Error type and the shared failure taxonomy

pub mod error;
pub mod fpix;
pub mod params;
pub mod pix;
pub mod rect;

pub use error::{Error, ErrorKind, Result, STATUS_OK};
pub use fpix::FloatImage;
pub use params::DetectionParameters;
pub use pix::{PixelBuffer, PixelBufferMut, PixelFormat, bgra_luminance_region};
pub use rect::{Rect, validate_roi};

/// Channel layout of BGRA pixels and helpers for packed `0xAARRGGBB`
/// values.
pub mod color {
    use crate::pix::{LUMA_BLUE_WEIGHT, LUMA_GREEN_WEIGHT, LUMA_RED_WEIGHT};

    /// Byte index of blue within a pixel
    pub const BLUE: usize = 0;
    /// Byte index of green within a pixel
    pub const GREEN: usize = 1;
    /// Byte index of red within a pixel
    pub const RED: usize = 2;
    /// Byte index of alpha within a pixel
    pub const ALPHA: usize = 3;

    pub const ALPHA_SHIFT: u32 = 24;
    pub const RED_SHIFT: u32 = 16;
    pub const GREEN_SHIFT: u32 = 8;
    pub const BLUE_SHIFT: u32 = 0;

    /// Compose a packed pixel from its components.
    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        ((a as u32) << ALPHA_SHIFT)
            | ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
    }

    /// Split a packed pixel into `(r, g, b, a)`.
    #[inline]
    pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
        (
            (pixel >> RED_SHIFT) as u8,
            (pixel >> GREEN_SHIFT) as u8,
            (pixel >> BLUE_SHIFT) as u8,
            (pixel >> ALPHA_SHIFT) as u8,
        )
    }

    /// Weighted luminance, rounded to nearest.
    #[inline]
    pub fn luma(r: u8, g: u8, b: u8) -> u8 {
        let v = LUMA_RED_WEIGHT * r as f32
            + LUMA_GREEN_WEIGHT * g as f32
            + LUMA_BLUE_WEIGHT * b as f32;
        (v + 0.5).min(255.0) as u8
    }

}
