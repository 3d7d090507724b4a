//! Rect - Rectangular regions of interest
//!
//! A `Rect` is a plain `Copy` value in image pixel coordinates. It may hold
//! negative or zero extents: constructing one never validates it, so that a
//! region produced by user interaction can be reported precisely by
//! [`validate_roi`] instead of being silently repaired.

mod validate;

pub use validate::validate_roi;

/// A rectangle region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle covering a whole `width` x `height` image.
    ///
    /// Dimensions larger than `i32::MAX` saturate.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            w: i32::try_from(width).unwrap_or(i32::MAX),
            h: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }

    /// Create a rectangle from two corner points given in any order.
    ///
    /// This is the normalization applied to a mouse drag: the start and
    /// current pointer positions become top-left and extent.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let (x, w) = if x1 <= x2 {
            (x1, x2 - x1)
        } else {
            (x2, x1 - x2)
        };
        let (y, h) = if y1 <= y2 {
            (y1, y2 - y1)
        } else {
            (y2, y1 - y2)
        };
        Self { x, y, w, h }
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    /// Get the area; zero for empty rectangles.
    #[inline]
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.w as i64 * self.h as i64
        }
    }

    /// Check if the rectangle has no pixels (non-positive width or height)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if a point is inside the rectangle
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && (x as i64) < self.right() && y >= self.y && (y as i64) < self.bottom()
    }

    /// Check if this rectangle contains another one
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Compute the intersection of two rectangles
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if (x as i64) < right && (y as i64) < bottom {
            Some(Rect {
                x,
                y,
                w: (right - x as i64) as i32,
                h: (bottom - y as i64) as i32,
            })
        } else {
            None
        }
    }

    /// Translate the rectangle by (dx, dy)
    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            w: self.w,
            h: self.h,
        }
    }

    /// Clamp the rectangle to a `width` x `height` image.
    ///
    /// Equivalent to clamping both drag corners to the image and rebuilding
    /// the rectangle. A rectangle that lies completely outside comes back
    /// empty rather than as `None`, so the caller can still submit it and
    /// get `RoiEmpty` reported.
    pub fn clamp_to(&self, width: u32, height: u32) -> Rect {
        self.intersect(&Rect::full(width, height))
            .unwrap_or_else(|| Rect {
                x: (self.x as i64).clamp(0, width as i64) as i32,
                y: (self.y as i64).clamp(0, height as i64) as i32,
                w: 0,
                h: 0,
            })
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.w, self.h)
    }
}
