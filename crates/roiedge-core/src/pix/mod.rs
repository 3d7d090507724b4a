//! PixelBuffer - The raster container exchanged between all stages
//!
//! # Pixel layout
//!
//! - Row-major, one row every `stride` bytes
//! - [`PixelFormat::Bgra8`]: 4 bytes per pixel, blue first, alpha last
//! - [`PixelFormat::Gray8`]: 1 byte per pixel (intensity)
//! - The buffer length is exactly `stride * height`
//!
//! Buffers built by this crate are tightly packed (`stride = width *
//! bytes_per_pixel`). A caller may dictate a longer stride through
//! [`PixelBuffer::from_bytes_with_stride`]; padding bytes are never read.
//!
//! # Ownership model
//!
//! `PixelBuffer` uses `Arc` for cheap cloning, so a loaded image can be
//! shared read-only by any number of in-flight requests. To modify pixel
//! data, convert to [`PixelBufferMut`] via [`PixelBuffer::try_into_mut`] or
//! [`PixelBuffer::to_mut`], then convert back with `Into<PixelBuffer>`.

mod access;
mod convert;

pub use convert::{LUMA_BLUE_WEIGHT, LUMA_GREEN_WEIGHT, LUMA_RED_WEIGHT, bgra_luminance_region};

use crate::error::{Error, Result};
use crate::rect::Rect;
use std::sync::Arc;

/// Sample layout of a [`PixelBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8 bits per channel, channel order B, G, R, A
    Bgra8,
    /// 8-bit intensity
    Gray8,
}

impl PixelFormat {
    /// Number of bytes occupied by one pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra8 => 4,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// Internal buffer data
#[derive(Debug)]
struct BufferData {
    width: u32,
    height: u32,
    format: PixelFormat,
    /// Bytes per row, `>= width * bytes_per_pixel`
    stride: usize,
    data: Vec<u8>,
}

/// Immutable, shareable raster
///
/// # Examples
///
/// ```
/// use roiedge_core::{PixelBuffer, PixelFormat};
///
/// let image = PixelBuffer::new(640, 480, PixelFormat::Bgra8).unwrap();
/// assert_eq!(image.stride(), 640 * 4);
/// assert_eq!(image.data().len(), 640 * 4 * 480);
/// ```
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    inner: Arc<BufferData>,
}

/// Bytes needed for one tightly packed row.
fn packed_stride(width: u32, format: PixelFormat) -> Result<usize> {
    (width as usize)
        .checked_mul(format.bytes_per_pixel())
        .ok_or(Error::InvalidDimension { width, height: 0 })
}

/// Total byte length for `height` rows of `stride` bytes.
fn buffer_len(width: u32, height: u32, stride: usize) -> Result<usize> {
    stride
        .checked_mul(height as usize)
        .ok_or(Error::InvalidDimension { width, height })
}

impl PixelBuffer {
    /// Create a zero-filled, tightly packed buffer.
    ///
    /// Zero width or height is allowed and yields an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the byte size overflows.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let stride = packed_stride(width, format)?;
        let len = buffer_len(width, height, stride)?;
        Ok(Self::from_parts(width, height, format, stride, vec![0u8; len]))
    }

    /// Wrap caller-supplied bytes with a tightly packed stride.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBufferSize`] if `data.len()` is not
    /// `width * bytes_per_pixel * height`.
    pub fn from_bytes(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let stride = packed_stride(width, format)?;
        Self::from_bytes_with_stride(width, height, format, stride, data)
    }

    /// Wrap caller-supplied bytes with a caller-dictated stride.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidStride`] if `stride` is shorter than one row.
    /// - [`Error::InvalidBufferSize`] if `data.len() != stride * height`.
    pub fn from_bytes_with_stride(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self> {
        let min_stride = packed_stride(width, format)?;
        if stride < min_stride {
            return Err(Error::InvalidStride {
                stride,
                width,
                bytes_per_pixel: format.bytes_per_pixel(),
            });
        }
        let expected = buffer_len(width, height, stride)?;
        if data.len() != expected {
            return Err(Error::InvalidBufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::from_parts(width, height, format, stride, data))
    }

    fn from_parts(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        data: Vec<u8>,
    ) -> Self {
        PixelBuffer {
            inner: Arc::new(BufferData {
                width,
                height,
                format,
                stride,
                data,
            }),
        }
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Get the pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.inner.format
    }

    /// Get the row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.stride
    }

    /// Rectangle covering the whole buffer.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::full(self.inner.width, self.inner.height)
    }

    /// Check if the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.width == 0 || self.inner.height == 0
    }

    /// Get raw access to the bytes, padding included.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the pixel bytes of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.inner.stride;
        let len = self.inner.width as usize * self.inner.format.bytes_per_pixel();
        &self.inner.data[start..start + len]
    }

    /// Copy the pixels into a tightly packed byte vector.
    pub fn to_packed_bytes(&self) -> Vec<u8> {
        let row_len = self.inner.width as usize * self.inner.format.bytes_per_pixel();
        if self.inner.stride == row_len {
            return self.inner.data.clone();
        }
        let mut out = Vec::with_capacity(row_len * self.inner.height as usize);
        for y in 0..self.inner.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }

    /// Get the number of strong references to this buffer.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check if two buffers have the same width, height and format.
    pub fn sizes_equal(&self, other: &PixelBuffer) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.format == other.inner.format
    }

    /// Fail with [`Error::UnsupportedFormat`] unless the format matches.
    pub fn require_format(&self, expected: PixelFormat) -> Result<()> {
        if self.inner.format != expected {
            return Err(Error::UnsupportedFormat {
                expected,
                actual: self.inner.format,
            });
        }
        Ok(())
    }

    /// Count pixels with a nonzero value (Gray8 only).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for BGRA buffers.
    pub fn count_nonzero(&self) -> Result<u64> {
        self.require_format(PixelFormat::Gray8)?;
        let mut count = 0u64;
        for y in 0..self.inner.height {
            count += self.row(y).iter().filter(|&&v| v != 0).count() as u64;
        }
        Ok(count)
    }

    /// Try to convert into a mutable buffer without copying.
    ///
    /// Succeeds only when this is the sole reference.
    pub fn try_into_mut(self) -> std::result::Result<PixelBufferMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixelBufferMut { inner: data }),
            Err(arc) => Err(PixelBuffer { inner: arc }),
        }
    }

    /// Create a mutable deep copy.
    pub fn to_mut(&self) -> PixelBufferMut {
        PixelBufferMut {
            inner: BufferData {
                width: self.inner.width,
                height: self.inner.height,
                format: self.inner.format,
                stride: self.inner.stride,
                data: self.inner.data.clone(),
            },
        }
    }

    /// Copy the pixels of `rect` into a new, tightly packed buffer.
    ///
    /// # Errors
    ///
    /// Returns the validation error for `rect` (empty or out of bounds).
    pub fn clip_rectangle(&self, rect: &Rect) -> Result<PixelBuffer> {
        let roi = crate::rect::validate_roi(self.inner.width, self.inner.height, rect)?;
        let bpp = self.inner.format.bytes_per_pixel();
        let (w, h) = (roi.w as u32, roi.h as u32);
        let mut out = PixelBuffer::new(w, h, self.inner.format)?.to_mut();
        for dy in 0..h {
            let src = self.row(roi.y as u32 + dy);
            let start = roi.x as usize * bpp;
            out.row_mut(dy)
                .copy_from_slice(&src[start..start + w as usize * bpp]);
        }
        Ok(out.into())
    }
}

/// Mutable raster, converted back into a [`PixelBuffer`] when done
#[derive(Debug)]
pub struct PixelBufferMut {
    inner: BufferData,
}

impl PixelBufferMut {
    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.inner.format
    }

    /// Get the row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.stride
    }

    /// Get mutable raw access to the bytes, padding included.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Get the pixel bytes of row `y` for writing.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.inner.stride;
        let len = self.inner.width as usize * self.inner.format.bytes_per_pixel();
        &mut self.inner.data[start..start + len]
    }

    /// Set every byte of every pixel to `value`.
    pub fn fill(&mut self, value: u8) {
        for y in 0..self.inner.height {
            self.row_mut(y).fill(value);
        }
    }
}

impl From<PixelBufferMut> for PixelBuffer {
    fn from(buf: PixelBufferMut) -> Self {
        PixelBuffer {
            inner: Arc::new(buf.inner),
        }
    }
}

/// Equal when size, format and row contents match. Stride padding is ignored.
impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        self.sizes_equal(other) && (0..self.height()).all(|y| self.row(y) == other.row(y))
    }
}

impl Eq for PixelBuffer {}
