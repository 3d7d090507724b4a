//! roiedge-ffi - C ABI for ROI edge detection
//!
//! Exposes [`roiedge_detect`], the boundary call, to C and to any language
//! that can load a C library. Buffer lengths travel with their pointers so
//! that every access is bounds checked on the Rust side. Panics never
//! cross the boundary; they are reported as `ProcessingFailed`.
//!
//! Status codes:
//!
//! | code | meaning |
//! |---|---|
//! | 0 | success |
//! | -1 | processing failed |
//! | -2 | empty region |
//! | -3 | region out of bounds |
//! | -4 | buffer size mismatch |
//! | -5 | invalid parameters |
//! | -6 | computation unavailable |

use roiedge_core::{DetectionParameters, Error, ErrorKind, Rect, STATUS_OK};
use roiedge_filter::{FilterResult, detect, status_code};
use std::ffi::{c_char, c_int};
use std::panic::{self, AssertUnwindSafe};
use std::slice;
use tracing::warn;

/// Run [`detect`] with signed dimensions as received over the C boundary.
///
/// Negative image dimensions are a buffer layout error.
pub fn detect_signed(
    input: &[u8],
    width: i32,
    height: i32,
    output: &mut [u8],
    params: &DetectionParameters,
    roi: Rect,
) -> FilterResult<(u32, u32)> {
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(Error::NegativeDimension {
            width: width.into(),
            height: height.into(),
        }
        .into());
    };
    detect(input, w, h, output, params, roi)
}

/// Detect edges in a region of a BGRA8 image.
///
/// `input` holds `width * height * 4` bytes, row-major BGRA with a stride
/// of `width * 4`. `output` receives `roi_width * roi_height` bytes, one
/// per pixel, with a stride of `roi_width`. The produced dimensions are
/// written to `out_width` and `out_height` (0 on failure); either may be
/// null. On failure `output` is not written.
///
/// # Safety
///
/// - `input` must be valid for reads of `input_len` bytes, or null with
///   `input_len == 0`.
/// - `output` must be valid for writes of `output_len` bytes, or null with
///   `output_len == 0`, and must not overlap `input`.
/// - `out_width` and `out_height` must each be null or valid for a write.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn roiedge_detect(
    input: *const u8,
    input_len: usize,
    width: c_int,
    height: c_int,
    output: *mut u8,
    output_len: usize,
    out_width: *mut c_int,
    out_height: *mut c_int,
    low_threshold: f64,
    high_threshold: f64,
    binarization_level: c_int,
    roi_x: c_int,
    roi_y: c_int,
    roi_width: c_int,
    roi_height: c_int,
) -> c_int {
    // SAFETY: the caller guarantees `input`/`input_len` and
    // `output`/`output_len` describe valid, disjoint buffers.
    let input: &[u8] = if input.is_null() {
        &[]
    } else {
        unsafe { slice::from_raw_parts(input, input_len) }
    };
    let output: &mut [u8] = if output.is_null() {
        &mut []
    } else {
        unsafe { slice::from_raw_parts_mut(output, output_len) }
    };
    let params = DetectionParameters::new(low_threshold, high_threshold, binarization_level);
    let roi = Rect::new(roi_x, roi_y, roi_width, roi_height);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        detect_signed(input, width, height, output, &params, roi)
    }));
    let (status, dims) = match result {
        Ok(detected) => (status_code(&detected), detected.unwrap_or((0, 0))),
        Err(_) => {
            warn!("panic inside roiedge_detect");
            (ErrorKind::ProcessingFailed.status_code(), (0, 0))
        }
    };

    // SAFETY: each pointer is null or valid for one write.
    unsafe {
        if !out_width.is_null() {
            *out_width = dims.0 as c_int;
        }
        if !out_height.is_null() {
            *out_height = dims.1 as c_int;
        }
    }
    status
}

/// Static, NUL-terminated description of a status code.
///
/// Unknown codes map to `"unknown status"`. The returned pointer is valid
/// for the lifetime of the program and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn roiedge_status_message(status: c_int) -> *const c_char {
    let text = match ErrorKind::from_status_code(status) {
        _ if status == STATUS_OK => c"success",
        Some(ErrorKind::ProcessingFailed) => c"an error occurred during image processing",
        Some(ErrorKind::RoiEmpty) => c"the selected region is empty",
        Some(ErrorKind::RoiOutOfBounds) => c"the selected region lies outside the image",
        Some(ErrorKind::InvalidBufferSize) => c"image buffer does not match its dimensions",
        Some(ErrorKind::InvalidParameters) => c"detection parameters are out of range",
        Some(ErrorKind::ComputationUnavailable) => c"the edge detector could not be started",
        None => c"unknown status",
    };
    text.as_ptr()
}
