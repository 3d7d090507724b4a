//! Processing requests
//!
//! A request is an immutable snapshot of everything one detection needs.
//! Editing the session afterwards creates a new request with a larger id;
//! it never changes one already taken.

use roiedge_core::{DetectionParameters, PixelBuffer, Rect};
use std::fmt;

/// Monotonically increasing request identity within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(pub u64);

impl RequestId {
    /// The id following this one.
    pub fn next(self) -> Self {
        RequestId(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of `{image, roi, parameters}`
///
/// The image is shared, not copied: [`PixelBuffer`] clones are reference
/// counted and immutable.
#[derive(Debug, Clone)]
pub struct ProcessingRequest {
    id: RequestId,
    image: Option<PixelBuffer>,
    roi: Rect,
    params: DetectionParameters,
}

impl ProcessingRequest {
    pub fn new(
        id: RequestId,
        image: Option<PixelBuffer>,
        roi: Rect,
        params: DetectionParameters,
    ) -> Self {
        Self {
            id,
            image,
            roi,
            params,
        }
    }

    #[inline]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The source image, `None` before any image was loaded.
    #[inline]
    pub fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref()
    }

    #[inline]
    pub fn roi(&self) -> Rect {
        self.roi
    }

    #[inline]
    pub fn params(&self) -> &DetectionParameters {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roiedge_core::PixelFormat;

    #[test]
    fn test_snapshot_shares_image() {
        let image = PixelBuffer::new(4, 4, PixelFormat::Bgra8).unwrap();
        let req = ProcessingRequest::new(
            RequestId(3),
            Some(image.clone()),
            Rect::full(4, 4),
            DetectionParameters::default(),
        );
        assert_eq!(image.ref_count(), 2);
        assert_eq!(req.id().next(), RequestId(4));
        assert_eq!(req.id().to_string(), "#3");
    }
}
