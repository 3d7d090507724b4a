//! Seed fill operations
//!
//! Binary reconstruction: grow a seed image inside a mask, keeping every
//! mask pixel that is connected to some seed through other mask pixels.
//! This is the linking step of hysteresis thresholding, where the seeds
//! are the strong edge pixels and the mask holds strong and weak ones.

use crate::conncomp::ConnectivityType;
use crate::error::{RegionError, RegionResult};
use roiedge_core::{PixelBuffer, PixelBufferMut, PixelFormat};
use std::collections::VecDeque;

/// Value written for foreground pixels by the fill functions
pub const FOREGROUND: u8 = 255;

/// Reconstruct the components of `mask` that contain a seed.
///
/// Both inputs are Gray8 masks (nonzero = set) of the same size. A seed
/// pixel outside the mask is ignored. The result is a Gray8 mask with
/// [`FOREGROUND`] on every reached pixel and 0 elsewhere.
///
/// # Errors
///
/// - Core error if either input is not Gray8.
/// - [`RegionError::SizeMismatch`] if the sizes differ.
pub fn seedfill_binary(
    seed: &PixelBuffer,
    mask: &PixelBuffer,
    connectivity: ConnectivityType,
) -> RegionResult<PixelBuffer> {
    seed.require_format(PixelFormat::Gray8)?;
    mask.require_format(PixelFormat::Gray8)?;
    if seed.dimensions() != mask.dimensions() {
        return Err(RegionError::SizeMismatch {
            seed_w: seed.width(),
            seed_h: seed.height(),
            mask_w: mask.width(),
            mask_h: mask.height(),
        });
    }

    let (width, height) = mask.dimensions();
    let mut out = PixelBuffer::new(width, height, PixelFormat::Gray8)?.to_mut();
    let mut queue = VecDeque::new();

    for y in 0..height {
        let (seed_row, mask_row) = (seed.row(y), mask.row(y));
        for x in 0..width {
            if seed_row[x as usize] != 0 && mask_row[x as usize] != 0 {
                out.set_pixel_unchecked(x, y, FOREGROUND as u32);
                queue.push_back((x, y));
            }
        }
    }

    grow(&mut out, mask, &mut queue, connectivity);
    Ok(out.into())
}

/// Breadth-first growth from the queued pixels.
fn grow(
    out: &mut PixelBufferMut,
    mask: &PixelBuffer,
    queue: &mut VecDeque<(u32, u32)>,
    connectivity: ConnectivityType,
) {
    let (width, height) = mask.dimensions();
    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in connectivity.neighbors(x, y, width, height) {
            if mask.get_pixel_unchecked(nx, ny) != 0 && out.get_pixel(nx, ny) == Some(0) {
                out.set_pixel_unchecked(nx, ny, FOREGROUND as u32);
                queue.push_back((nx, ny));
            }
        }
    }
}
