//! ROI validation against image bounds
//!
//! The validator is a pure boundary check: it returns the region unchanged
//! or rejects it. Clamping is left to whoever produced the region (see
//! [`Rect::clamp_to`]).

use super::Rect;
use crate::error::{Error, Result};

/// Validate a region of interest against a `width` x `height` image.
///
/// # Errors
///
/// - [`Error::RoiEmpty`] if the width or height of `roi` is not positive.
///   This is checked first, so an empty region far outside the image is
///   still reported as empty.
/// - [`Error::RoiOutOfBounds`] if any part of `roi` lies outside the image.
pub fn validate_roi(width: u32, height: u32, roi: &Rect) -> Result<Rect> {
    if roi.w <= 0 || roi.h <= 0 {
        return Err(Error::RoiEmpty { w: roi.w, h: roi.h });
    }
    if roi.x < 0 || roi.y < 0 || roi.right() > width as i64 || roi.bottom() > height as i64 {
        return Err(Error::RoiOutOfBounds {
            roi: *roi,
            width,
            height,
        });
    }
    Ok(*roi)
}
