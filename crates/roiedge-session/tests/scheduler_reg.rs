//! Debounce regression test
//!
//! Drives the scheduler with a manual clock through the slider-drag and
//! image-load scenarios, then checks stale-result rejection in the facade.

use roiedge_core::{DetectionParameters, Rect};
use roiedge_session::{
    CannyDetector, ManualClock, Outcome, ProcessingFacade, ProcessingRequest, RequestId,
    UpdateScheduler,
};
use roiedge_test::{RegParams, synth};
use std::sync::Arc;
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn request(id: u64, high: f64) -> ProcessingRequest {
    ProcessingRequest::new(
        RequestId(id),
        None,
        Rect::new(0, 0, 10, 10),
        DetectionParameters::new(50.0, high, 128),
    )
}

#[test]
fn scheduler_coalesce_reg() {
    let mut rp = RegParams::new("scheduler_coalesce");
    let clock = Arc::new(ManualClock::new());
    let mut sched = UpdateScheduler::new(ms(100), clock.clone());

    // Edits at t = 0, 10, 20, 30 ms with a 100 ms window
    let mut submitted = Vec::new();
    for (i, t) in [0u64, 10, 20, 30].into_iter().enumerate() {
        clock.set(ms(t));
        sched.notify(request(i as u64 + 1, 100.0 + t as f64));
        submitted.extend(sched.poll());
    }
    // Step through time well past the window
    for t in 31..=400 {
        clock.set(ms(t));
        submitted.extend(sched.poll());
    }

    rp.compare_values(1.0, submitted.len() as f64, 0.0);
    rp.check(submitted[0].id() == RequestId(4), "latest request submitted");
    rp.compare_values(130.0, submitted[0].params().high_threshold, 0.0);
    rp.compare_values(3.0, sched.superseded_count() as f64, 0.0);
    assert!(rp.cleanup());
}

#[test]
fn scheduler_deadline_reg() {
    let mut rp = RegParams::new("scheduler_deadline");
    let clock = Arc::new(ManualClock::new());
    let mut sched = UpdateScheduler::new(ms(100), clock.clone());

    clock.set(ms(30));
    sched.notify(request(1, 150.0));
    rp.check(sched.next_deadline() == Some(ms(130)), "deadline at 130 ms");
    clock.set(ms(129));
    rp.check(sched.poll().is_none(), "not due at 129 ms");
    clock.set(ms(130));
    rp.check(sched.poll().is_some(), "due at 130 ms");

    // Image load is immediate, even in the middle of a drag
    sched.notify(request(2, 150.0));
    sched.submit_now(request(3, 150.0));
    let now = sched.poll();
    rp.check(now.map(|r| r.id()) == Some(RequestId(3)), "load bypasses window");
    rp.check(sched.poll().is_none(), "load replaced the drag edit");

    assert!(rp.cleanup());
}

#[test]
fn facade_stale_reg() {
    let mut rp = RegParams::new("facade_stale");
    let image = synth::bright_square(40, 40, Rect::new(10, 10, 20, 20), 0, 255).unwrap();
    let facade = ProcessingFacade::new(Box::new(CannyDetector), false);

    let a = ProcessingRequest::new(
        RequestId(1),
        Some(image.clone()),
        Rect::full(40, 40),
        DetectionParameters::default(),
    );
    let b = ProcessingRequest::new(
        RequestId(2),
        Some(image),
        Rect::new(5, 5, 30, 30),
        DetectionParameters::default(),
    );

    // A starts, B is submitted before A finishes
    facade.submit(a.id());
    let a_outcome = facade.process(&a);
    facade.submit(b.id());
    let b_delivery = facade.complete(&b);
    let a_delivery = facade.deliver(a.id(), a_outcome);

    rp.check(a_delivery.is_none(), "late stale result dropped");
    let b_delivery = b_delivery.unwrap();
    rp.check(b_delivery.request_id == RequestId(2), "fresh result delivered");
    let dims = b_delivery.outcome.edge_map().map(|m| (m.width(), m.height()));
    rp.check(dims == Some((30, 30)), "fresh result size");
    let shown = facade.current().map(|m| (m.width(), m.height()));
    rp.check(shown == Some((30, 30)), "display keeps fresh map");
    rp.compare_values(1.0, facade.dropped_count() as f64, 0.0);

    // A failure clears the display under the default policy
    facade.submit(RequestId(3));
    let failure = Outcome::Failure {
        kind: roiedge_core::ErrorKind::RoiOutOfBounds,
        message: "out".into(),
    };
    rp.check(facade.deliver(RequestId(3), failure).is_some(), "failure delivered");
    rp.check(facade.current().is_none(), "display cleared");

    assert!(rp.cleanup());
}
