//! Connected component analysis
//!
//! Masks are Gray8 buffers where any nonzero pixel is foreground.

use crate::error::RegionResult;
use roiedge_core::{PixelBuffer, PixelFormat};
use std::collections::VecDeque;

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

const FOUR_WAY: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const EIGHT_WAY: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl ConnectivityType {
    /// Neighbor offsets `(dx, dy)` for this connectivity.
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            ConnectivityType::FourWay => &FOUR_WAY,
            ConnectivityType::EightWay => &EIGHT_WAY,
        }
    }

    /// In-bounds neighbors of (x, y) in a `width` x `height` grid.
    pub fn neighbors(
        self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = (u32, u32)> {
        self.offsets().iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx as i64;
            let ny = y as i64 + dy as i64;
            if nx >= 0 && ny >= 0 && nx < width as i64 && ny < height as i64 {
                Some((nx as u32, ny as u32))
            } else {
                None
            }
        })
    }
}

/// Count the connected foreground components of a mask.
///
/// # Errors
///
/// Returns a core error if `mask` is not Gray8.
pub fn count_components(mask: &PixelBuffer, connectivity: ConnectivityType) -> RegionResult<u32> {
    mask.require_format(PixelFormat::Gray8)?;
    let (width, height) = mask.dimensions();
    let mut visited = vec![false; width as usize * height as usize];
    let mut queue = VecDeque::new();
    let mut count = 0u32;

    for y in 0..height {
        for x in 0..width {
            let i = y as usize * width as usize + x as usize;
            if visited[i] || mask.get_pixel_unchecked(x, y) == 0 {
                continue;
            }
            count += 1;
            visited[i] = true;
            queue.push_back((x, y));
            while let Some((cx, cy)) = queue.pop_front() {
                for (nx, ny) in connectivity.neighbors(cx, cy, width, height) {
                    let ni = ny as usize * width as usize + nx as usize;
                    if !visited[ni] && mask.get_pixel_unchecked(nx, ny) != 0 {
                        visited[ni] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
    }

    Ok(count)
}
