//! Double threshold, hysteresis linking and binarization

use crate::{FilterError, FilterResult};
use roiedge_core::{FloatImage, PixelBuffer, PixelFormat};
use roiedge_region::{ConnectivityType, seedfill_binary};
use tracing::debug;

/// Pixel counts of a hysteresis pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HysteresisStats {
    /// Pixels at or above the high threshold
    pub strong: u64,
    /// Pixels in `low..high`
    pub weak: u64,
    /// Pixels kept after linking (all strong plus the linked weak ones)
    pub promoted: u64,
}

/// Classify thinned magnitudes into strong and candidate masks.
///
/// Returns `(strong, candidate)` Gray8 masks where `candidate` holds both
/// strong and weak pixels. Pixels with magnitude 0 are never candidates,
/// even when `low` is 0.
pub fn classify(
    thinned: &FloatImage,
    low: f64,
    high: f64,
) -> FilterResult<(PixelBuffer, PixelBuffer)> {
    let (w, h) = (thinned.width(), thinned.height());
    let mut strong = PixelBuffer::new(w, h, PixelFormat::Gray8)?.to_mut();
    let mut candidate = PixelBuffer::new(w, h, PixelFormat::Gray8)?.to_mut();

    for y in 0..h {
        let src = thinned.row(y);
        let s_row = strong.row_mut(y);
        for (d, &m) in s_row.iter_mut().zip(src) {
            if m > 0.0 && m as f64 >= high {
                *d = 1;
            }
        }
        let c_row = candidate.row_mut(y);
        for (d, &m) in c_row.iter_mut().zip(src) {
            if m > 0.0 && m as f64 >= low {
                *d = 1;
            }
        }
    }

    Ok((strong.into(), candidate.into()))
}

/// Hysteresis thresholding of thinned gradient magnitudes.
///
/// A weak pixel survives only if it is 8-connected, directly or through
/// other weak pixels, to a strong pixel. Surviving pixels carry their
/// magnitude rounded and clipped to `0..=255`; all others are 0.
///
/// `low` and `high` must already be ordered.
pub fn hysteresis(
    thinned: &FloatImage,
    low: f64,
    high: f64,
) -> FilterResult<(PixelBuffer, HysteresisStats)> {
    if low > high {
        return Err(FilterError::ProcessingFailed(format!(
            "hysteresis thresholds out of order: {} > {}",
            low, high
        )));
    }

    let (strong, candidate) = classify(thinned, low, high)?;
    let linked = seedfill_binary(&strong, &candidate, ConnectivityType::EightWay)?;

    let (w, h) = (thinned.width(), thinned.height());
    let mut out = PixelBuffer::new(w, h, PixelFormat::Gray8)?.to_mut();
    for y in 0..h {
        let keep = linked.row(y);
        let mag = thinned.row(y);
        for ((d, &k), &m) in out.row_mut(y).iter_mut().zip(keep).zip(mag) {
            if k != 0 {
                *d = m.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    let strong_count = strong.count_nonzero()?;
    let stats = HysteresisStats {
        strong: strong_count,
        weak: candidate.count_nonzero()? - strong_count,
        promoted: linked.count_nonzero()?,
    };
    debug!(
        strong = stats.strong,
        weak = stats.weak,
        promoted = stats.promoted,
        "hysteresis"
    );

    Ok((out.into(), stats))
}

/// Binarize a Gray8 buffer: `v >= level` becomes 255, everything else 0.
///
/// Level 0 therefore turns every pixel on.
pub fn binarize(pix: &PixelBuffer, level: u8) -> FilterResult<PixelBuffer> {
    pix.require_format(PixelFormat::Gray8)?;
    let mut out = PixelBuffer::new(pix.width(), pix.height(), PixelFormat::Gray8)?.to_mut();
    for y in 0..pix.height() {
        for (d, &v) in out.row_mut(y).iter_mut().zip(pix.row(y)) {
            *d = if v >= level { 255 } else { 0 };
        }
    }
    Ok(out.into())
}
