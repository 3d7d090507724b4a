//! Luminance conversion
//!
//! Reduces BGRA rasters to 8-bit intensity. Alpha is ignored.

use super::{PixelBuffer, PixelFormat};
use crate::color;
use crate::error::{Error, Result};
use crate::rect::{Rect, validate_roi};

/// Red weight of the luma transform
pub const LUMA_RED_WEIGHT: f32 = 0.299;
/// Green weight of the luma transform
pub const LUMA_GREEN_WEIGHT: f32 = 0.587;
/// Blue weight of the luma transform
pub const LUMA_BLUE_WEIGHT: f32 = 0.114;

impl PixelBuffer {
    /// Convert the whole buffer to Gray8.
    ///
    /// A Gray8 buffer is returned as a cheap clone.
    pub fn convert_to_luminance(&self) -> Result<PixelBuffer> {
        if self.format() == PixelFormat::Gray8 {
            return Ok(self.clone());
        }
        if self.is_empty() {
            return PixelBuffer::new(self.width(), self.height(), PixelFormat::Gray8);
        }
        self.luminance_region(&self.bounds())
    }

    /// Convert the pixels of `roi` to a tightly packed Gray8 buffer of
    /// size `roi.w x roi.h`.
    ///
    /// Only the bytes inside the region are read.
    ///
    /// # Errors
    ///
    /// Returns the validation error for `roi` (empty or out of bounds).
    pub fn luminance_region(&self, roi: &Rect) -> Result<PixelBuffer> {
        match self.format() {
            PixelFormat::Gray8 => self.clip_rectangle(roi),
            PixelFormat::Bgra8 => {
                bgra_luminance_region(self.data(), self.width(), self.height(), self.stride(), roi)
            }
        }
    }
}

/// Convert the `roi` of raw BGRA8 bytes to a tightly packed Gray8 buffer.
///
/// This is the entry point for callers that own a plain byte slice and
/// should not have to copy the whole image into a [`PixelBuffer`] first.
/// Only the rows and columns inside `roi` are read.
///
/// # Errors
///
/// - [`Error::InvalidStride`] if `stride < width * 4`.
/// - [`Error::InvalidBufferSize`] if `data.len() != stride * height`.
/// - The validation error for `roi` (empty or out of bounds).
pub fn bgra_luminance_region(
    data: &[u8],
    width: u32,
    height: u32,
    stride: usize,
    roi: &Rect,
) -> Result<PixelBuffer> {
    let bpp = PixelFormat::Bgra8.bytes_per_pixel();
    if stride < width as usize * bpp {
        return Err(Error::InvalidStride {
            stride,
            width,
            bytes_per_pixel: bpp,
        });
    }
    let expected = stride
        .checked_mul(height as usize)
        .ok_or(Error::InvalidDimension { width, height })?;
    if data.len() != expected {
        return Err(Error::InvalidBufferSize {
            expected,
            actual: data.len(),
        });
    }
    let roi = validate_roi(width, height, roi)?;

    let (w, h) = (roi.w as u32, roi.h as u32);
    let mut out = PixelBuffer::new(w, h, PixelFormat::Gray8)?.to_mut();
    let x0 = roi.x as usize * bpp;
    for dy in 0..h {
        let start = (roi.y as usize + dy as usize) * stride + x0;
        let src = &data[start..start + w as usize * bpp];
        for (d, px) in out.row_mut(dy).iter_mut().zip(src.chunks_exact(bpp)) {
            *d = color::luma(px[color::RED], px[color::GREEN], px[color::BLUE]);
        }
    }
    Ok(out.into())
}
