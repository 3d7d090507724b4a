//! Interactive detection session
//!
//! A session owns two threads:
//!
//! - the **dispatcher** sleeps until the scheduler's pending request is
//!   due, then moves it into the one-slot mailbox (replacing a request the
//!   worker has not picked up yet);
//! - the **worker** takes requests from the mailbox one at a time and runs
//!   them through the facade, sending surviving outcomes to the caller.
//!
//! Edits made on the caller's thread never block on a running detection.
//! At most one detection is in flight, and a result that went stale while
//! it was computing is dropped by the facade.

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::facade::{Delivery, Detector, EdgeMap, Outcome, ProcessingFacade};
use crate::request::{ProcessingRequest, RequestId};
use crate::scheduler::UpdateScheduler;
use crate::{SessionError, SessionResult};
use roiedge_core::{DetectionParameters, ErrorKind, PixelBuffer, Rect};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

struct Inner {
    scheduler: UpdateScheduler,
    mailbox: Option<ProcessingRequest>,
    stop: bool,
}

struct Shared {
    inner: Mutex<Inner>,
    // Signalled on every edit and on stop
    dispatch_wake: Condvar,
    // Signalled when the mailbox fills and on stop
    work_wake: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| {
            warn!("session state lock poisoned, recovering");
            e.into_inner()
        })
    }
}

/// A live detection session
pub struct Session {
    shared: Arc<Shared>,
    facade: Arc<ProcessingFacade>,
    results: Receiver<Delivery>,
    dispatcher: Option<JoinHandle<()>>,
    worker: Option<JoinHandle<()>>,
    image: Option<PixelBuffer>,
    roi: Rect,
    params: DetectionParameters,
    last_id: RequestId,
}

impl Session {
    /// Start a session on the system clock.
    ///
    /// # Errors
    ///
    /// - Invalid initial parameters in `config`.
    /// - [`SessionError::ThreadSpawn`] if a thread cannot be started; the
    ///   kind is [`ErrorKind::ComputationUnavailable`].
    pub fn start<D: Detector + 'static>(config: SessionConfig, detector: D) -> SessionResult<Self> {
        Self::start_with_clock(config, detector, Arc::new(SystemClock::new()))
    }

    /// Start a session with an explicit clock.
    pub fn start_with_clock<D: Detector + 'static>(
        config: SessionConfig,
        detector: D,
        clock: Arc<dyn Clock>,
    ) -> SessionResult<Self> {
        config.validate()?;

        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                scheduler: UpdateScheduler::new(config.quiescence(), clock),
                mailbox: None,
                stop: false,
            }),
            dispatch_wake: Condvar::new(),
            work_wake: Condvar::new(),
        });
        let facade = Arc::new(ProcessingFacade::new(
            Box::new(detector),
            config.keep_last_on_failure,
        ));
        let (tx, results) = mpsc::channel();

        let worker = {
            let shared = shared.clone();
            let facade = facade.clone();
            thread::Builder::new()
                .name("roiedge-worker".into())
                .spawn(move || work_loop(&shared, &facade, tx))
                .map_err(|source| SessionError::ThreadSpawn {
                    name: "worker",
                    source,
                })?
        };

        let dispatcher = {
            let shared = shared.clone();
            let facade = facade.clone();
            thread::Builder::new()
                .name("roiedge-dispatcher".into())
                .spawn(move || dispatch_loop(&shared, &facade))
        };
        let dispatcher = match dispatcher {
            Ok(handle) => handle,
            Err(source) => {
                shared.lock().stop = true;
                shared.work_wake.notify_all();
                if worker.join().is_err() {
                    warn!("worker thread panicked");
                }
                return Err(SessionError::ThreadSpawn {
                    name: "dispatcher",
                    source,
                });
            }
        };

        info!(
            quiescence_ms = config.quiescence_ms,
            keep_last_on_failure = config.keep_last_on_failure,
            "session started"
        );
        Ok(Session {
            shared,
            facade,
            results,
            dispatcher: Some(dispatcher),
            worker: Some(worker),
            image: None,
            roi: Rect::default(),
            params: config.parameters,
            last_id: RequestId::default(),
        })
    }

    fn schedule(&mut self, immediate: bool) -> SessionResult<RequestId> {
        self.last_id = self.last_id.next();
        let request =
            ProcessingRequest::new(self.last_id, self.image.clone(), self.roi, self.params);
        let id = request.id();
        {
            let mut inner = self.shared.lock();
            if inner.stop {
                return Err(SessionError::Closed);
            }
            if immediate {
                inner.scheduler.submit_now(request);
            } else {
                inner.scheduler.notify(request);
            }
        }
        self.shared.dispatch_wake.notify_one();
        Ok(id)
    }

    /// Replace the image, reset the ROI to the full image and submit
    /// immediately.
    pub fn load_image(&mut self, image: PixelBuffer) -> SessionResult<RequestId> {
        info!(
            width = image.width(),
            height = image.height(),
            format = ?image.format(),
            "image loaded"
        );
        self.roi = image.bounds();
        self.image = Some(image);
        self.schedule(true)
    }

    /// Set the region of interest. Returns `None` if it did not change.
    pub fn set_roi(&mut self, roi: Rect) -> SessionResult<Option<RequestId>> {
        if roi == self.roi {
            return Ok(None);
        }
        self.roi = roi;
        self.schedule(false).map(Some)
    }

    /// Set the detection parameters. Returns `None` if they did not change.
    pub fn set_parameters(
        &mut self,
        params: DetectionParameters,
    ) -> SessionResult<Option<RequestId>> {
        if params == self.params {
            return Ok(None);
        }
        self.params = params;
        self.schedule(false).map(Some)
    }

    /// Set the ROI to the whole image. Does nothing without an image.
    pub fn maximize_roi(&mut self) -> SessionResult<Option<RequestId>> {
        match &self.image {
            Some(image) => {
                let full = image.bounds();
                self.set_roi(full)
            }
            None => Ok(None),
        }
    }

    /// Channel of delivered outcomes, in submission order.
    pub fn results(&self) -> &Receiver<Delivery> {
        &self.results
    }

    /// Wait up to `timeout` for the next delivery.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Delivery> {
        match self.results.recv_timeout(timeout) {
            Ok(delivery) => Some(delivery),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("worker gone, no more deliveries");
                None
            }
        }
    }

    /// The edge map on display after the latest delivery.
    pub fn current_edge_map(&self) -> Option<EdgeMap> {
        self.facade.current()
    }

    pub fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref()
    }

    pub fn roi(&self) -> Rect {
        self.roi
    }

    pub fn parameters(&self) -> DetectionParameters {
        self.params
    }

    /// Number of results dropped as stale so far.
    pub fn dropped_count(&self) -> u64 {
        self.facade.dropped_count()
    }

    /// Stop both threads and wait for them. A detection in progress runs to
    /// completion first. Calling this twice is harmless.
    pub fn shutdown(&mut self) {
        if self.dispatcher.is_none() && self.worker.is_none() {
            return;
        }
        {
            let mut inner = self.shared.lock();
            inner.stop = true;
            if let Some(id) = inner.scheduler.cancel() {
                debug!(%id, "pending request cancelled at shutdown");
            }
        }
        self.shared.dispatch_wake.notify_all();
        self.shared.work_wake.notify_all();
        for (name, handle) in [
            ("dispatcher", self.dispatcher.take()),
            ("worker", self.worker.take()),
        ] {
            if let Some(handle) = handle {
                if handle.join().is_err() {
                    warn!("{} thread panicked", name);
                }
            }
        }
        info!("session stopped");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn dispatch_loop(shared: &Shared, facade: &ProcessingFacade) {
    let mut inner = shared.lock();
    loop {
        if inner.stop {
            break;
        }
        if let Some(request) = inner.scheduler.poll() {
            let id = request.id();
            facade.submit(id);
            if let Some(old) = inner.mailbox.replace(request) {
                debug!(old = %old.id(), new = %id, "queued request superseded");
            }
            debug!(%id, "request submitted");
            shared.work_wake.notify_one();
            continue;
        }
        inner = match inner.scheduler.time_until_due() {
            Some(wait) => match shared.dispatch_wake.wait_timeout(inner, wait) {
                Ok((guard, _)) => guard,
                Err(e) => e.into_inner().0,
            },
            None => shared
                .dispatch_wake
                .wait(inner)
                .unwrap_or_else(|e| e.into_inner()),
        };
    }
    debug!("dispatcher stopped");
}

fn work_loop(shared: &Shared, facade: &ProcessingFacade, tx: Sender<Delivery>) {
    loop {
        let request = {
            let mut inner = shared.lock();
            loop {
                if inner.stop {
                    debug!("worker stopped");
                    return;
                }
                if let Some(request) = inner.mailbox.take() {
                    break request;
                }
                inner = shared
                    .work_wake
                    .wait(inner)
                    .unwrap_or_else(|e| e.into_inner());
            }
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| facade.process(&request)))
            .unwrap_or_else(|_| {
                warn!(id = %request.id(), "detector panicked");
                Outcome::Failure {
                    kind: ErrorKind::ProcessingFailed,
                    message: "detector panicked".to_string(),
                }
            });

        if let Some(delivery) = facade.deliver(request.id(), outcome) {
            if tx.send(delivery).is_err() {
                debug!("result receiver dropped");
                return;
            }
        }
    }
}
