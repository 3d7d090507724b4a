//! Debounced request scheduling
//!
//! The scheduler holds at most one pending request. Each [`UpdateScheduler::notify`]
//! replaces it and restarts the quiescence window; the request becomes
//! due once the window elapses with no further notification.
//! [`UpdateScheduler::submit_now`] makes a request due at once.
//!
//! The scheduler is passive: whoever owns it calls [`UpdateScheduler::poll`]
//! and sleeps until [`UpdateScheduler::next_deadline`].

use crate::clock::Clock;
use crate::request::{ProcessingRequest, RequestId};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

struct Pending {
    request: ProcessingRequest,
    due: Duration,
}

/// Coalesces bursts of edits into single submissions
pub struct UpdateScheduler {
    clock: Arc<dyn Clock>,
    quiescence: Duration,
    pending: Option<Pending>,
    superseded: u64,
}

impl UpdateScheduler {
    pub fn new(quiescence: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            quiescence,
            pending: None,
            superseded: 0,
        }
    }

    /// Record `request` as the latest edit and restart the quiescence window.
    ///
    /// Returns the id of the pending request it replaced, if any.
    pub fn notify(&mut self, request: ProcessingRequest) -> Option<RequestId> {
        let due = self.clock.now() + self.quiescence;
        self.replace(request, due)
    }

    /// Make `request` due immediately, replacing any pending request.
    ///
    /// Used for discrete actions such as loading an image.
    pub fn submit_now(&mut self, request: ProcessingRequest) -> Option<RequestId> {
        let due = self.clock.now();
        self.replace(request, due)
    }

    fn replace(&mut self, request: ProcessingRequest, due: Duration) -> Option<RequestId> {
        let id = request.id();
        let old = self
            .pending
            .replace(Pending { request, due })
            .map(|p| p.request.id());
        if let Some(old) = old {
            self.superseded += 1;
            debug!(%old, new = %id, "pending request superseded");
        }
        old
    }

    /// Take the pending request if its window has elapsed.
    pub fn poll(&mut self) -> Option<ProcessingRequest> {
        let now = self.clock.now();
        if self.pending.as_ref().is_some_and(|p| p.due <= now) {
            self.pending.take().map(|p| p.request)
        } else {
            None
        }
    }

    /// When the pending request becomes due, if there is one.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Time left until the pending request is due; zero if already due.
    pub fn time_until_due(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_deadline().map(|due| due.saturating_sub(now))
    }

    /// Drop the pending request without submitting it.
    pub fn cancel(&mut self) -> Option<RequestId> {
        self.pending.take().map(|p| p.request.id())
    }

    /// Whether a request is waiting.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of pending requests replaced before they were submitted.
    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }

    /// The quiescence window.
    pub fn quiescence(&self) -> Duration {
        self.quiescence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use roiedge_core::{DetectionParameters, Rect};

    fn req(id: u64) -> ProcessingRequest {
        ProcessingRequest::new(
            RequestId(id),
            None,
            Rect::new(0, 0, 1, 1),
            DetectionParameters::default(),
        )
    }

    fn scheduler(ms: u64) -> (Arc<ManualClock>, UpdateScheduler) {
        let clock = Arc::new(ManualClock::new());
        let sched = UpdateScheduler::new(Duration::from_millis(ms), clock.clone());
        (clock, sched)
    }

    #[test]
    fn test_due_after_window() {
        let (clock, mut sched) = scheduler(100);
        assert_eq!(sched.notify(req(1)), None);
        assert_eq!(sched.next_deadline(), Some(Duration::from_millis(100)));
        clock.advance(Duration::from_millis(99));
        assert!(sched.poll().is_none());
        assert_eq!(sched.time_until_due(), Some(Duration::from_millis(1)));
        clock.advance(Duration::from_millis(1));
        assert_eq!(sched.poll().map(|r| r.id()), Some(RequestId(1)));
        assert!(sched.poll().is_none());
        assert_eq!(sched.next_deadline(), None);
    }

    #[test]
    fn test_submit_now_bypasses_window() {
        let (_clock, mut sched) = scheduler(100);
        sched.notify(req(1));
        assert_eq!(sched.submit_now(req(2)), Some(RequestId(1)));
        assert_eq!(sched.poll().map(|r| r.id()), Some(RequestId(2)));
        assert_eq!(sched.superseded_count(), 1);
    }

    #[test]
    fn test_cancel() {
        let (clock, mut sched) = scheduler(10);
        sched.notify(req(5));
        assert_eq!(sched.cancel(), Some(RequestId(5)));
        clock.advance(Duration::from_millis(50));
        assert!(sched.poll().is_none());
        assert!(!sched.has_pending());
    }
}
