//! The detection boundary call
//!
//! Plain byte slices in, plain byte slice out. The input is BGRA8 with a
//! stride of `width * 4`; the output is a caller-allocated Gray8 region of
//! exactly `roi.w * roi.h` bytes.
//!
//! All checks run before any computation, in this order:
//!
//! 1. input length (`InvalidBufferSize`)
//! 2. ROI (`RoiEmpty`, `RoiOutOfBounds`)
//! 3. parameters (`InvalidParameters`)
//! 4. output length (`InvalidBufferSize`)
//!
//! On any failure the output slice is left untouched.

use crate::canny::canny_gray;
use crate::{FilterError, FilterResult};
use roiedge_core::{
    DetectionParameters, Error, PixelFormat, Rect, STATUS_OK, bgra_luminance_region, validate_roi,
};
use tracing::{debug, warn};

/// Detect edges in `roi` of a BGRA8 image and write the edge map to `output`.
///
/// Returns the produced `(width, height)`, which always equals the ROI size.
pub fn detect(
    input: &[u8],
    width: u32,
    height: u32,
    output: &mut [u8],
    params: &DetectionParameters,
    roi: Rect,
) -> FilterResult<(u32, u32)> {
    let stride = width as usize * PixelFormat::Bgra8.bytes_per_pixel();
    let expected = stride
        .checked_mul(height as usize)
        .ok_or(Error::InvalidDimension { width, height })?;
    if input.len() != expected {
        return Err(Error::InvalidBufferSize {
            expected,
            actual: input.len(),
        }
        .into());
    }

    let roi = validate_roi(width, height, &roi)?;
    params.validate()?;

    let needed = roi.w as usize * roi.h as usize;
    if output.len() != needed {
        return Err(FilterError::OutputSize {
            expected: needed,
            actual: output.len(),
        });
    }

    let gray = bgra_luminance_region(input, width, height, stride, &roi)?;
    let edges = canny_gray(&gray, params)?;
    if edges.stride() != roi.w as usize || edges.data().len() != needed {
        return Err(FilterError::ProcessingFailed(format!(
            "edge map layout {}x{} (stride {}) does not match region {}",
            edges.width(),
            edges.height(),
            edges.stride(),
            roi
        )));
    }
    output.copy_from_slice(edges.data());

    debug!(%roi, image_width = width, image_height = height, "detect");
    Ok(edges.dimensions())
}

/// Status code of a [`detect`] result: [`STATUS_OK`] or the kind's code.
pub fn status_code(result: &FilterResult<(u32, u32)>) -> i32 {
    match result {
        Ok(_) => STATUS_OK,
        Err(e) => {
            warn!(kind = %e.kind(), "detect failed: {}", e);
            e.kind().status_code()
        }
    }
}
