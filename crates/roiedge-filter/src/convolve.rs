//! Convolution on floating-point images
//!
//! Borders are handled by edge replication: a sample outside the image
//! takes the value of the nearest edge pixel, so smoothing does not darken
//! the image boundary and derivatives vanish across it.

use crate::kernel::Kernel;
use crate::FilterResult;
use roiedge_core::FloatImage;

/// Convolve a `FloatImage` with a kernel, replicating border pixels.
///
/// The kernel is applied as-is (no normalization, no flipping).
pub fn fpix_convolve(fpix: &FloatImage, kernel: &Kernel) -> FloatImage {
    let w = fpix.width() as i64;
    let h = fpix.height() as i64;
    let kw = kernel.width() as i64;
    let kh = kernel.height() as i64;
    let cx = kernel.center_x() as i64;
    let cy = kernel.center_y() as i64;
    let kdata = kernel.data();

    let mut out = FloatImage::new(w as u32, h as u32);
    if w == 0 || h == 0 {
        return out;
    }

    for y in 0..h {
        let row = out.row_mut(y as u32);
        for (x, dst) in row.iter_mut().enumerate() {
            let x = x as i64;
            let mut sum = 0.0f32;
            for ky in 0..kh {
                for kx in 0..kw {
                    let k = kdata[(ky * kw + kx) as usize];
                    if k != 0.0 {
                        sum += k * fpix.get_clamped(x + kx - cx, y + ky - cy);
                    }
                }
            }
            *dst = sum;
        }
    }

    out
}

/// Convolve with `kernel_x` horizontally, then `kernel_y` vertically.
pub fn fpix_convolve_sep(fpix: &FloatImage, kernel_x: &Kernel, kernel_y: &Kernel) -> FloatImage {
    let tmp = fpix_convolve(fpix, kernel_x);
    fpix_convolve(&tmp, kernel_y)
}

/// Noise suppression with the separable 5-tap binomial kernel.
pub fn binomial_smooth(fpix: &FloatImage) -> FilterResult<FloatImage> {
    Ok(fpix_convolve_sep(
        fpix,
        &Kernel::binomial_horizontal(),
        &Kernel::binomial_vertical(),
    ))
}
