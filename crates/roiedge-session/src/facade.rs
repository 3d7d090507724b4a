//! Validation, detection and result delivery
//!
//! [`ProcessingFacade::process`] turns a request into an [`Outcome`];
//! [`ProcessingFacade::deliver`] decides whether that outcome may still be
//! shown. Delivery is checked against request identity: once a newer
//! request has been submitted, an older one's result is dropped, and a
//! result never replaces one from a newer request.

use crate::request::{ProcessingRequest, RequestId};
use roiedge_core::{DetectionParameters, ErrorKind, PixelBuffer, Rect};
use roiedge_filter::{FilterResult, canny_roi};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// The detection stage behind the facade
pub trait Detector: Send + Sync {
    /// Compute the edge map of `roi`. The ROI has already been validated.
    fn detect(
        &self,
        image: &PixelBuffer,
        roi: &Rect,
        params: &DetectionParameters,
    ) -> FilterResult<PixelBuffer>;
}

/// The built-in detector: [`canny_roi`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CannyDetector;

impl Detector for CannyDetector {
    fn detect(
        &self,
        image: &PixelBuffer,
        roi: &Rect,
        params: &DetectionParameters,
    ) -> FilterResult<PixelBuffer> {
        canny_roi(image, roi, params)
    }
}

/// A binary edge map the size of the ROI, one byte per pixel
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMap(PixelBuffer);

impl EdgeMap {
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Row-major bytes with stride equal to the width.
    pub fn bytes(&self) -> &[u8] {
        self.0.data()
    }

    pub fn as_buffer(&self) -> &PixelBuffer {
        &self.0
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.0
    }
}

/// Result of processing one request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Edge map for the requested region
    Success(EdgeMap),
    /// Nothing to process: no image, or an empty region
    Empty,
    /// Processing was refused or failed
    Failure { kind: ErrorKind, message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn edge_map(&self) -> Option<&EdgeMap> {
        match self {
            Outcome::Success(map) => Some(map),
            _ => None,
        }
    }
}

/// An outcome released to the presentation side
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub request_id: RequestId,
    pub outcome: Outcome,
}

#[derive(Default)]
struct DeliveryState {
    latest_submitted: Option<RequestId>,
    last_delivered: Option<RequestId>,
    shown: Option<EdgeMap>,
    dropped: u64,
}

/// Orchestrates validation and detection and filters stale results
pub struct ProcessingFacade {
    detector: Box<dyn Detector>,
    keep_last_on_failure: bool,
    state: Mutex<DeliveryState>,
}

impl ProcessingFacade {
    pub fn new(detector: Box<dyn Detector>, keep_last_on_failure: bool) -> Self {
        Self {
            detector,
            keep_last_on_failure,
            state: Mutex::new(DeliveryState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, DeliveryState> {
        self.state.lock().unwrap_or_else(|e| {
            warn!("facade state lock poisoned, recovering");
            e.into_inner()
        })
    }

    /// Record that `id` was handed to the worker.
    ///
    /// Results of requests older than the newest submitted one are dropped
    /// from now on.
    pub fn submit(&self, id: RequestId) {
        let mut state = self.state();
        if state.latest_submitted.is_none_or(|latest| id > latest) {
            state.latest_submitted = Some(id);
        }
    }

    /// Validate and run one request.
    ///
    /// A missing image or an empty ROI yields [`Outcome::Empty`]; every
    /// other error becomes [`Outcome::Failure`].
    pub fn process(&self, request: &ProcessingRequest) -> Outcome {
        let Some(image) = request.image() else {
            debug!(id = %request.id(), "no image loaded");
            return Outcome::Empty;
        };

        match self
            .detector
            .detect(image, &request.roi(), request.params())
        {
            Ok(map) => Outcome::Success(EdgeMap(map)),
            Err(e) if e.kind() == ErrorKind::RoiEmpty => {
                debug!(id = %request.id(), roi = %request.roi(), "empty region");
                Outcome::Empty
            }
            Err(e) => {
                warn!(id = %request.id(), kind = %e.kind(), "processing failed: {}", e);
                Outcome::Failure {
                    kind: e.kind(),
                    message: e.to_string(),
                }
            }
        }
    }

    /// Release `outcome` unless a newer request has been submitted or
    /// delivered since `id`.
    pub fn deliver(&self, id: RequestId, outcome: Outcome) -> Option<Delivery> {
        let mut state = self.state();
        let newer_submitted = state.latest_submitted.is_some_and(|latest| latest > id);
        let newer_delivered = state.last_delivered.is_some_and(|last| last >= id);
        if newer_submitted || newer_delivered {
            state.dropped += 1;
            warn!(%id, "dropping stale result");
            return None;
        }

        state.last_delivered = Some(id);
        match &outcome {
            Outcome::Success(map) => state.shown = Some(map.clone()),
            _ if self.keep_last_on_failure => {}
            _ => state.shown = None,
        }
        Some(Delivery {
            request_id: id,
            outcome,
        })
    }

    /// Process `request` and deliver the outcome.
    pub fn complete(&self, request: &ProcessingRequest) -> Option<Delivery> {
        let outcome = self.process(request);
        self.deliver(request.id(), outcome)
    }

    /// The edge map currently on display.
    pub fn current(&self) -> Option<EdgeMap> {
        self.state().shown.clone()
    }

    /// Number of results dropped as stale.
    pub fn dropped_count(&self) -> u64 {
        self.state().dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roiedge_core::PixelFormat;

    fn request(id: u64, roi: Rect) -> ProcessingRequest {
        let image = PixelBuffer::new(8, 8, PixelFormat::Bgra8).unwrap();
        ProcessingRequest::new(RequestId(id), Some(image), roi, DetectionParameters::default())
    }

    #[test]
    fn test_outcome_mapping() {
        let facade = ProcessingFacade::new(Box::new(CannyDetector), false);
        let ok = facade.process(&request(1, Rect::new(0, 0, 4, 4)));
        assert_eq!(ok.edge_map().map(|m| (m.width(), m.height())), Some((4, 4)));

        assert_eq!(facade.process(&request(2, Rect::new(0, 0, 0, 4))), Outcome::Empty);

        let none = ProcessingRequest::new(
            RequestId(3),
            None,
            Rect::new(0, 0, 4, 4),
            DetectionParameters::default(),
        );
        assert_eq!(facade.process(&none), Outcome::Empty);

        match facade.process(&request(4, Rect::new(6, 6, 4, 4))) {
            Outcome::Failure { kind, .. } => assert_eq!(kind, ErrorKind::RoiOutOfBounds),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_stale_result_dropped() {
        let facade = ProcessingFacade::new(Box::new(CannyDetector), false);
        let a = request(1, Rect::new(0, 0, 4, 4));
        let b = request(2, Rect::new(0, 0, 2, 2));
        facade.submit(a.id());
        facade.submit(b.id());
        assert!(facade.complete(&a).is_none());
        let delivered = facade.complete(&b).unwrap();
        assert_eq!(delivered.request_id, RequestId(2));
        assert_eq!(facade.dropped_count(), 1);
    }

    #[test]
    fn test_never_overwrites_newer() {
        let facade = ProcessingFacade::new(Box::new(CannyDetector), false);
        facade.submit(RequestId(1));
        assert!(facade.deliver(RequestId(1), Outcome::Empty).is_some());
        assert!(facade.deliver(RequestId(1), Outcome::Empty).is_none());
        assert!(facade.deliver(RequestId(0), Outcome::Empty).is_none());
    }

    #[test]
    fn test_failure_policy() {
        let fail = || Outcome::Failure {
            kind: ErrorKind::ProcessingFailed,
            message: "boom".into(),
        };
        for keep in [false, true] {
            let facade = ProcessingFacade::new(Box::new(CannyDetector), keep);
            let a = request(1, Rect::new(0, 0, 4, 4));
            facade.submit(a.id());
            facade.complete(&a).unwrap();
            assert!(facade.current().is_some());
            facade.submit(RequestId(2));
            facade.deliver(RequestId(2), fail()).unwrap();
            assert_eq!(facade.current().is_some(), keep);
        }
    }
}
