//! Pixel access functions
//!
//! Per-pixel getters and setters. Gray8 pixels read back as their
//! intensity; Bgra8 pixels read back packed as `0xAARRGGBB`, which is
//! the little-endian interpretation of the four stored bytes.

use super::{PixelBuffer, PixelBufferMut, PixelFormat};
use crate::color;
use crate::error::{Error, Result};

/// Byte offset of pixel (x, y), or `None` when outside.
#[inline]
fn offset(width: u32, height: u32, stride: usize, bpp: usize, x: u32, y: u32) -> Option<usize> {
    if x < width && y < height {
        Some(y as usize * stride + x as usize * bpp)
    } else {
        None
    }
}

#[inline]
fn read(data: &[u8], format: PixelFormat, at: usize) -> u32 {
    match format {
        PixelFormat::Gray8 => data[at] as u32,
        PixelFormat::Bgra8 => {
            u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
        }
    }
}

impl PixelBuffer {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        let at = offset(
            self.width(),
            self.height(),
            self.stride(),
            self.format().bytes_per_pixel(),
            x,
            y,
        )?;
        Some(read(self.data(), self.format(), at))
    }

    /// Get a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset lies outside the buffer.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        let at = y as usize * self.stride() + x as usize * self.format().bytes_per_pixel();
        read(self.data(), self.format(), at)
    }

    /// Get RGBA values at (x, y).
    ///
    /// Gray pixels are expanded to `(v, v, v, 255)`.
    pub fn get_rgba(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        let v = self.get_pixel(x, y)?;
        Some(match self.format() {
            PixelFormat::Gray8 => (v as u8, v as u8, v as u8, 255),
            PixelFormat::Bgra8 => color::extract_rgba(v),
        })
    }
}

impl PixelBufferMut {
    /// Get a pixel value at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        let bpp = self.format().bytes_per_pixel();
        let at = offset(self.width(), self.height(), self.stride(), bpp, x, y)?;
        Some(read(&self.inner.data, self.format(), at))
    }

    /// Set a pixel value at (x, y).
    ///
    /// Gray8 stores the low byte of `val`; Bgra8 stores `val` as
    /// `0xAARRGGBB`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        let bpp = self.format().bytes_per_pixel();
        let at = offset(self.width(), self.height(), self.stride(), bpp, x, y).ok_or(
            Error::IndexOutOfBounds {
                index: y as usize * self.width() as usize + x as usize,
                len: self.width() as usize * self.height() as usize,
            },
        )?;
        self.write(at, val);
        Ok(())
    }

    /// Set a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset lies outside the buffer.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let at = y as usize * self.stride() + x as usize * self.format().bytes_per_pixel();
        self.write(at, val);
    }

    /// Set RGBA values at (x, y).
    ///
    /// On a Gray8 buffer the color is reduced to its luma.
    pub fn set_rgba(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) -> Result<()> {
        let val = match self.format() {
            PixelFormat::Gray8 => color::luma(r, g, b) as u32,
            PixelFormat::Bgra8 => color::compose_rgba(r, g, b, a),
        };
        self.set_pixel(x, y, val)
    }

    #[inline]
    fn write(&mut self, at: usize, val: u32) {
        match self.inner.format {
            PixelFormat::Gray8 => self.inner.data[at] = val as u8,
            PixelFormat::Bgra8 => self.inner.data[at..at + 4].copy_from_slice(&val.to_le_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgra_byte_order() {
        let mut img = PixelBuffer::new(2, 1, PixelFormat::Bgra8).unwrap().to_mut();
        img.set_rgba(1, 0, 10, 20, 30, 40).unwrap();
        let img: PixelBuffer = img.into();
        // Stored as B, G, R, A
        assert_eq!(&img.data()[4..8], &[30, 20, 10, 40]);
        assert_eq!(img.get_pixel(1, 0), Some(0x280A141E));
        assert_eq!(img.get_rgba(1, 0), Some((10, 20, 30, 40)));
    }

    #[test]
    fn test_gray_access() {
        let mut img = PixelBuffer::new(3, 3, PixelFormat::Gray8).unwrap().to_mut();
        img.set_pixel(2, 1, 200).unwrap();
        assert_eq!(img.get_pixel(2, 1), Some(200));
        assert!(img.set_pixel(3, 0, 1).is_err());
        let img: PixelBuffer = img.into();
        assert_eq!(img.get_pixel_unchecked(2, 1), 200);
        assert_eq!(img.get_rgba(2, 1), Some((200, 200, 200, 255)));
        assert_eq!(img.get_pixel(0, 3), None);
    }
}
