//! Convolution kernels
//!
//! A kernel is a small row-major grid of `f32` weights with an origin
//! (`cx`, `cy`). Convolution places the origin over the output pixel.

use crate::{FilterError, FilterResult};

/// Weights of the 5-tap binomial smoothing kernel, before normalization
pub const BINOMIAL5: [f32; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];

/// A 2D convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Width of the kernel
    width: u32,
    /// Height of the kernel
    height: u32,
    /// X coordinate of the center
    cx: u32,
    /// Y coordinate of the center
    cy: u32,
    /// Kernel data (row-major order)
    data: Vec<f32>,
}

impl Kernel {
    /// Create a zero kernel with the origin at the center.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] if a dimension is 0.
    pub fn new(width: u32, height: u32) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Kernel {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![0.0; width as usize * height as usize],
        })
    }

    /// Create a kernel from row-major values, origin at the center.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] if `data.len() != width * height`.
    pub fn from_slice(width: u32, height: u32, data: &[f32]) -> FilterResult<Self> {
        let mut kernel = Self::new(width, height)?;
        if data.len() != kernel.data.len() {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} values for a {}x{} kernel, got {}",
                kernel.data.len(),
                width,
                height,
                data.len()
            )));
        }
        kernel.data.copy_from_slice(data);
        Ok(kernel)
    }

    /// Horizontal 5-tap binomial kernel `[1, 4, 6, 4, 1] / 16`.
    pub fn binomial_horizontal() -> Self {
        Kernel {
            width: 5,
            height: 1,
            cx: 2,
            cy: 0,
            data: BINOMIAL5.iter().map(|w| w / 16.0).collect(),
        }
    }

    /// Vertical 5-tap binomial kernel `[1, 4, 6, 4, 1]^T / 16`.
    pub fn binomial_vertical() -> Self {
        Self::binomial_horizontal().transpose()
    }

    /// Sobel kernel responding to horizontal intensity change (x derivative).
    ///
    /// ```text
    /// -1  0  1
    /// -2  0  2
    /// -1  0  1
    /// ```
    pub fn sobel_x() -> Self {
        Kernel {
            width: 3,
            height: 3,
            cx: 1,
            cy: 1,
            data: vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
        }
    }

    /// Sobel kernel responding to vertical intensity change (y derivative,
    /// positive downward). The transpose of [`Kernel::sobel_x`].
    pub fn sobel_y() -> Self {
        Self::sobel_x().transpose()
    }

    /// Get the kernel width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the center X coordinate.
    #[inline]
    pub fn center_x(&self) -> u32 {
        self.cx
    }

    /// Get the center Y coordinate.
    #[inline]
    pub fn center_y(&self) -> u32 {
        self.cy
    }

    /// Set the center coordinates.
    pub fn set_center(&mut self, cx: u32, cy: u32) -> FilterResult<()> {
        if cx >= self.width || cy >= self.height {
            return Err(FilterError::InvalidKernel(format!(
                "center ({}, {}) outside {}x{} kernel",
                cx, cy, self.width, self.height
            )));
        }
        self.cx = cx;
        self.cy = cy;
        Ok(())
    }

    /// Get the kernel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set a value at (x, y); ignored outside the kernel.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = value;
        }
    }

    /// Swap rows and columns (and the origin coordinates).
    pub fn transpose(&self) -> Self {
        let mut data = vec![0.0; self.data.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                data[(x * self.height + y) as usize] = self.data[(y * self.width + x) as usize];
            }
        }
        Kernel {
            width: self.height,
            height: self.width,
            cx: self.cy,
            cy: self.cx,
            data,
        }
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Normalize the kernel so that values sum to 1.
    ///
    /// Kernels summing to (nearly) zero, such as derivative kernels, are
    /// left unchanged.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum.abs() >= 1e-6 {
            self.data.iter_mut().for_each(|v| *v /= sum);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial_sums_to_one() {
        let k = Kernel::binomial_horizontal();
        assert_eq!((k.width(), k.height()), (5, 1));
        assert_eq!(k.sum(), 1.0);
        assert_eq!(k.data(), &[0.0625, 0.25, 0.375, 0.25, 0.0625]);
        let v = Kernel::binomial_vertical();
        assert_eq!((v.width(), v.height(), v.center_y()), (1, 5, 2));
    }

    #[test]
    fn test_sobel_transpose() {
        let sy = Kernel::sobel_y();
        assert_eq!(sy.get(1, 0), Some(-2.0));
        assert_eq!(sy.get(1, 2), Some(2.0));
        assert_eq!(sy.get(0, 1), Some(0.0));
        assert_eq!(sy.sum(), 0.0);
    }

    #[test]
    fn test_from_slice_checks_length() {
        assert!(Kernel::from_slice(3, 1, &[1.0, 2.0]).is_err());
        assert!(Kernel::new(0, 3).is_err());
        let mut k = Kernel::from_slice(3, 1, &[1.0, 2.0, 1.0]).unwrap();
        k.normalize();
        assert_eq!(k.data(), &[0.25, 0.5, 0.25]);
        assert!(k.set_center(3, 0).is_err());
    }
}
