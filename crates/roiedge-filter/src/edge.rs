//! Gradient computation and non-maximum suppression
//!
//! Gradients use the unnormalized 3x3 Sobel pair, so for 8-bit input the
//! magnitude `sqrt(gx^2 + gy^2)` lies in `0.0..=~1442.5` (a full black to
//! white step gives `4 * 255 = 1020` per axis). Hysteresis thresholds are
//! compared against this scale.

use crate::convolve::fpix_convolve;
use crate::kernel::Kernel;
use roiedge_core::FloatImage;

/// Gradient direction quantized to four angle buckets.
///
/// Angles are measured with y pointing down, folded into `0..180` degrees.
/// Bucket boundaries sit at 22.5 degree offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 0 degrees: intensity changes left to right
    Horizontal,
    /// 45 degrees: changes toward the lower right
    Diagonal45,
    /// 90 degrees: intensity changes top to bottom
    Vertical,
    /// 135 degrees: changes toward the lower left
    Diagonal135,
}

impl Direction {
    /// Quantize a gradient vector.
    pub fn from_gradient(gx: f32, gy: f32) -> Self {
        let mut angle = gy.atan2(gx).to_degrees();
        if angle < 0.0 {
            angle += 180.0;
        }
        if !(22.5..157.5).contains(&angle) {
            Direction::Horizontal
        } else if angle < 67.5 {
            Direction::Diagonal45
        } else if angle < 112.5 {
            Direction::Vertical
        } else {
            Direction::Diagonal135
        }
    }

    /// Unit step `(dx, dy)` along the gradient.
    pub fn step(self) -> (i64, i64) {
        match self {
            Direction::Horizontal => (1, 0),
            Direction::Diagonal45 => (1, 1),
            Direction::Vertical => (0, 1),
            Direction::Diagonal135 => (-1, 1),
        }
    }
}

/// Per-pixel gradient of a float image
#[derive(Debug, Clone)]
pub struct GradientField {
    /// Gradient magnitude
    pub magnitude: FloatImage,
    /// Quantized gradient direction, row-major
    pub direction: Vec<Direction>,
}

impl GradientField {
    /// Get the field width.
    pub fn width(&self) -> u32 {
        self.magnitude.width()
    }

    /// Get the field height.
    pub fn height(&self) -> u32 {
        self.magnitude.height()
    }
}

/// Compute the Sobel gradient of `fpix`, replicating border pixels.
pub fn sobel_gradient(fpix: &FloatImage) -> GradientField {
    let gx = fpix_convolve(fpix, &Kernel::sobel_x());
    let gy = fpix_convolve(fpix, &Kernel::sobel_y());

    let mut magnitude = FloatImage::new(fpix.width(), fpix.height());
    let direction = gx
        .data()
        .iter()
        .zip(gy.data())
        .zip(magnitude.data_mut())
        .map(|((&x, &y), m)| {
            *m = x.hypot(y);
            Direction::from_gradient(x, y)
        })
        .collect();

    GradientField {
        magnitude,
        direction,
    }
}

/// Thin gradient ridges to single-pixel-wide candidate edges.
///
/// A pixel keeps its magnitude only if it is positive, strictly greater
/// than the neighbor behind it along the gradient, and at least as large
/// as the neighbor ahead of it; otherwise it becomes 0. On a two pixel
/// plateau this keeps exactly one pixel. Neighbors outside the image
/// count as 0.
pub fn non_max_suppression(field: &GradientField) -> FloatImage {
    let (w, h) = (field.width(), field.height());
    let mag = &field.magnitude;
    let at = |x: i64, y: i64| -> f32 {
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            0.0
        } else {
            mag.data()[y as usize * w as usize + x as usize]
        }
    };

    let mut out = FloatImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let i = y as usize * w as usize + x as usize;
            let m = mag.data()[i];
            if m <= 0.0 {
                continue;
            }
            let (dx, dy) = field.direction[i].step();
            let (x, y) = (x as i64, y as i64);
            let behind = at(x - dx, y - dy);
            let ahead = at(x + dx, y + dy);
            if m > behind && m >= ahead {
                out.set(x as u32, y as u32, m);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_buckets() {
        assert_eq!(Direction::from_gradient(1.0, 0.0), Direction::Horizontal);
        assert_eq!(Direction::from_gradient(-1.0, 0.0), Direction::Horizontal);
        assert_eq!(Direction::from_gradient(1.0, 0.3), Direction::Horizontal);
        assert_eq!(Direction::from_gradient(1.0, 1.0), Direction::Diagonal45);
        assert_eq!(Direction::from_gradient(-1.0, -1.0), Direction::Diagonal45);
        assert_eq!(Direction::from_gradient(0.0, 1.0), Direction::Vertical);
        assert_eq!(Direction::from_gradient(0.0, -5.0), Direction::Vertical);
        assert_eq!(Direction::from_gradient(-1.0, 1.0), Direction::Diagonal135);
        assert_eq!(Direction::from_gradient(0.0, 0.0), Direction::Horizontal);
    }

    #[test]
    fn test_step_edge_gradient() {
        // 0 | 255 step between columns 1 and 2
        let data = (0..16)
            .map(|i| if i % 4 >= 2 { 255.0 } else { 0.0 })
            .collect();
        let img = FloatImage::from_data(4, 4, data).unwrap();
        let field = sobel_gradient(&img);
        assert_eq!(field.magnitude.get(1, 1), Some(1020.0));
        assert_eq!(field.magnitude.get(2, 1), Some(1020.0));
        assert_eq!(field.magnitude.get(0, 1), Some(0.0));
        assert_eq!(field.direction[5], Direction::Horizontal);
    }

    #[test]
    fn test_nms_keeps_one_of_plateau() {
        let field = GradientField {
            magnitude: FloatImage::from_data(5, 1, vec![1.0, 5.0, 5.0, 1.0, 0.0]).unwrap(),
            direction: vec![Direction::Horizontal; 5],
        };
        let thin = non_max_suppression(&field);
        assert_eq!(thin.data(), &[0.0, 5.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_nms_border_neighbors_are_zero() {
        let field = GradientField {
            magnitude: FloatImage::from_data(2, 1, vec![3.0, 1.0]).unwrap(),
            direction: vec![Direction::Horizontal; 2],
        };
        let thin = non_max_suppression(&field);
        assert_eq!(thin.data(), &[3.0, 0.0]);
    }

    #[test]
    fn test_nms_follows_direction() {
        // Vertical gradient: compare with pixels above and below only
        let field = GradientField {
            magnitude: FloatImage::from_data(3, 3, vec![
                0.0, 1.0, 0.0, //
                9.0, 4.0, 9.0, //
                0.0, 2.0, 0.0,
            ])
            .unwrap(),
            direction: vec![Direction::Vertical; 9],
        };
        let thin = non_max_suppression(&field);
        assert_eq!(thin.get(1, 1), Some(4.0));
        assert_eq!(thin.get(0, 1), Some(9.0));
    }
}
