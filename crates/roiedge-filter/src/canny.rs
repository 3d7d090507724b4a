//! The edge detection pipeline
//!
//! ```text
//! ROI luma -> binomial smoothing -> Sobel gradient -> non-maximum
//! suppression -> hysteresis -> binarization
//! ```
//!
//! Every stage after luma extraction works on a buffer the size of the ROI,
//! so the cost scales with the ROI area and not with the image area.

use crate::convolve::binomial_smooth;
use crate::edge::{non_max_suppression, sobel_gradient};
use crate::threshold::{binarize, hysteresis};
use crate::{FilterError, FilterResult};
use roiedge_core::{DetectionParameters, FloatImage, PixelBuffer, PixelFormat, Rect, validate_roi};
use tracing::debug;

/// Run the detector on a whole Gray8 buffer.
///
/// The result has the same dimensions as `gray` and holds only 0 and 255.
///
/// # Errors
///
/// - [`roiedge_core::Error::InvalidParameter`] for invalid `params`.
/// - [`roiedge_core::Error::UnsupportedFormat`] if `gray` is not Gray8.
/// - [`FilterError::ProcessingFailed`] if the gradient is not finite.
pub fn canny_gray(gray: &PixelBuffer, params: &DetectionParameters) -> FilterResult<PixelBuffer> {
    params.validate()?;
    gray.require_format(PixelFormat::Gray8)?;
    if gray.is_empty() {
        return Ok(PixelBuffer::new(gray.width(), gray.height(), PixelFormat::Gray8)?);
    }

    let (low, high) = params.ordered_thresholds();
    let smoothed = binomial_smooth(&FloatImage::from_gray(gray)?)?;
    let field = sobel_gradient(&smoothed);
    if field.magnitude.data().iter().any(|m| !m.is_finite()) {
        return Err(FilterError::ProcessingFailed(
            "gradient magnitude is not finite".to_string(),
        ));
    }

    let thinned = non_max_suppression(&field);
    let (linked, stats) = hysteresis(&thinned, low, high)?;
    let edges = binarize(&linked, params.level())?;

    debug!(
        width = gray.width(),
        height = gray.height(),
        low,
        high,
        level = params.binarization_level,
        promoted = stats.promoted,
        "edge map computed"
    );
    Ok(edges)
}

/// Run the detector on the `roi` of `image`.
///
/// BGRA images are reduced to luma inside the ROI only; Gray8 images are
/// clipped. The result is `roi.w x roi.h`.
///
/// # Errors
///
/// The ROI is checked before the parameters:
/// [`roiedge_core::Error::RoiEmpty`] or [`roiedge_core::Error::RoiOutOfBounds`]
/// first, then [`roiedge_core::Error::InvalidParameter`].
pub fn canny_roi(
    image: &PixelBuffer,
    roi: &Rect,
    params: &DetectionParameters,
) -> FilterResult<PixelBuffer> {
    let roi = validate_roi(image.width(), image.height(), roi)?;
    params.validate()?;
    let gray = image.luminance_region(&roi)?;
    canny_gray(&gray, params)
}
