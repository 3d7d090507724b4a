//! Deterministic synthetic BGRA8 test images
//!
//! Every builder returns an opaque, tightly packed `Bgra8` buffer. Colors
//! are gray levels so that the luminance of each pixel equals the level
//! passed in.

use crate::TestResult;
use rand::prelude::*;
use roiedge_core::{PixelBuffer, PixelFormat, Rect};

fn build(
    width: u32,
    height: u32,
    mut level_at: impl FnMut(u32, u32) -> u8,
) -> TestResult<PixelBuffer> {
    let mut pix = PixelBuffer::new(width, height, PixelFormat::Bgra8)?.to_mut();
    for y in 0..height {
        let row = pix.row_mut(y);
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let v = level_at(x as u32, y);
            px.copy_from_slice(&[v, v, v, 255]);
        }
    }
    Ok(pix.into())
}

/// Uniform gray image.
pub fn solid(width: u32, height: u32, level: u8) -> TestResult<PixelBuffer> {
    build(width, height, |_, _| level)
}

/// `background` image with a filled `square` of `foreground`.
pub fn bright_square(
    width: u32,
    height: u32,
    square: Rect,
    background: u8,
    foreground: u8,
) -> TestResult<PixelBuffer> {
    build(width, height, |x, y| {
        if square.contains_point(x as i32, y as i32) {
            foreground
        } else {
            background
        }
    })
}

/// Columns `< split_x` are `left`, the rest `right`.
pub fn vertical_step(
    width: u32,
    height: u32,
    split_x: u32,
    left: u8,
    right: u8,
) -> TestResult<PixelBuffer> {
    build(width, height, |x, _| if x < split_x { left } else { right })
}

/// Checkerboard of `cell` x `cell` squares, starting with `a` at (0, 0).
pub fn checkerboard(width: u32, height: u32, cell: u32, a: u8, b: u8) -> TestResult<PixelBuffer> {
    let cell = cell.max(1);
    build(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { a } else { b }
    })
}

/// Uniformly random gray levels from a seeded generator.
pub fn noise(width: u32, height: u32, seed: u64) -> TestResult<PixelBuffer> {
    let mut rng = StdRng::seed_from_u64(seed);
    build(width, height, |_, _| rng.random_range(0..=255u8))
}

/// Gray level image with noise of amplitude `amplitude` added to `base`.
pub fn noisy(base: &PixelBuffer, amplitude: u8, seed: u64) -> TestResult<PixelBuffer> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pix = base.to_mut();
    let amp = amplitude as i16;
    for y in 0..pix.height() {
        for px in pix.row_mut(y).chunks_exact_mut(4) {
            let delta = rng.random_range(-amp..=amp);
            let v = (px[0] as i16 + delta).clamp(0, 255) as u8;
            px[..3].fill(v);
        }
    }
    Ok(pix.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bright_square_layout() {
        let img = bright_square(8, 8, Rect::new(2, 2, 4, 4), 10, 200).unwrap();
        assert_eq!(img.get_rgba(0, 0), Some((10, 10, 10, 255)));
        assert_eq!(img.get_rgba(2, 2), Some((200, 200, 200, 255)));
        assert_eq!(img.get_rgba(6, 6), Some((10, 10, 10, 255)));
    }

    #[test]
    fn test_noise_is_deterministic() {
        let a = noise(16, 16, 7).unwrap();
        let b = noise(16, 16, 7).unwrap();
        let c = noise(16, 16, 8).unwrap();
        assert_eq!(a.data(), b.data());
        assert_ne!(a.data(), c.data());
    }

    #[test]
    fn test_checkerboard() {
        let img = checkerboard(4, 4, 2, 0, 255).unwrap();
        assert_eq!(img.get_rgba(0, 0).unwrap().0, 0);
        assert_eq!(img.get_rgba(2, 0).unwrap().0, 255);
        assert_eq!(img.get_rgba(2, 2).unwrap().0, 0);
    }
}
