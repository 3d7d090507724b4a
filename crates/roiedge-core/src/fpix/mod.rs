//! FloatImage - Floating-point image
//!
//! `FloatImage` is a 2D array of `f32` values used for the intermediate
//! stages of edge detection (smoothed intensity, gradient magnitude), where
//! 8-bit precision is insufficient.
//!
//! # Examples
//!
//! ```
//! use roiedge_core::FloatImage;
//!
//! let mut img = FloatImage::new(100, 100);
//! img.set(10, 20, 0.5);
//! assert_eq!(img.get(10, 20), Some(0.5));
//! ```

use crate::error::{Error, Result};
use crate::pix::{PixelBuffer, PixelFormat};

/// Floating-point image
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The pixel at (x, y)
/// is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl FloatImage {
    /// Create an image with all pixels set to zero.
    pub fn new(width: u32, height: u32) -> Self {
        FloatImage {
            width,
            height,
            data: vec![0.0; width as usize * height as usize],
        }
    }

    /// Wrap existing row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBufferSize`] if `data.len() != width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidBufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(FloatImage {
            width,
            height,
            data,
        })
    }

    /// Promote a Gray8 buffer to float.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for BGRA buffers.
    pub fn from_gray(pix: &PixelBuffer) -> Result<Self> {
        pix.require_format(PixelFormat::Gray8)?;
        let mut data = Vec::with_capacity(pix.width() as usize * pix.height() as usize);
        for y in 0..pix.height() {
            data.extend(pix.row(y).iter().map(|&v| v as f32));
        }
        Ok(FloatImage {
            width: pix.width(),
            height: pix.height(),
            data,
        })
    }

    /// Convert to Gray8, rounding to nearest and clipping to `0..=255`.
    pub fn to_gray(&self) -> Result<PixelBuffer> {
        let data = self
            .data
            .iter()
            .map(|&v| v.round().clamp(0.0, 255.0) as u8)
            .collect();
        PixelBuffer::from_bytes(self.width, self.height, PixelFormat::Gray8, data)
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get a value, or `None` outside the image.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get a value with coordinates clamped to the nearest edge pixel.
    ///
    /// # Panics
    ///
    /// Panics on an empty image.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> f32 {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.data[self.index(cx, cy)]
    }

    /// Set a value; writes outside the image are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.data[i] = value;
        }
    }

    /// Get row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[f32] {
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Get row `y` for writing.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [f32] {
        let start = y as usize * self.width as usize;
        &mut self.data[start..start + self.width as usize]
    }

    /// Get the raw data.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get the raw data for writing.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Largest value, or `None` for an empty image.
    pub fn max_value(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::max)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data_size_check() {
        assert!(FloatImage::from_data(2, 2, vec![0.0; 4]).is_ok());
        assert!(FloatImage::from_data(2, 2, vec![0.0; 3]).is_err());
    }

    #[test]
    fn test_gray_roundtrip_clips() {
        let img = FloatImage::from_data(4, 1, vec![-3.0, 10.4, 10.6, 900.0]).unwrap();
        let gray = img.to_gray().unwrap();
        assert_eq!(gray.data(), &[0, 10, 11, 255]);
        let back = FloatImage::from_gray(&gray).unwrap();
        assert_eq!(back.data(), &[0.0, 10.0, 11.0, 255.0]);
    }

    #[test]
    fn test_clamped_access() {
        let img = FloatImage::from_data(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(img.get_clamped(-5, -5), 1.0);
        assert_eq!(img.get_clamped(9, 0), 2.0);
        assert_eq!(img.get_clamped(1, 9), 4.0);
        assert_eq!(img.max_value(), Some(4.0));
        assert_eq!(img.get(2, 0), None);
    }
}
