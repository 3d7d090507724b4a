//! roiedge-session - Interactive edge detection sessions
//!
//! - [`UpdateScheduler`] - debounces bursts of edits into single requests
//! - [`ProcessingFacade`] - validation, detection, and stale-result rejection
//! - [`Session`] - caller-facing state plus the dispatcher and worker threads
//! - [`SessionConfig`] - JSON configuration
//!
//! # Examples
//!
//! ```no_run
//! use roiedge_core::{PixelBuffer, PixelFormat, Rect};
//! use roiedge_session::{CannyDetector, Session, SessionConfig};
//! use std::time::Duration;
//!
//! let mut session = Session::start(SessionConfig::default(), CannyDetector).unwrap();
//! session.load_image(PixelBuffer::new(64, 64, PixelFormat::Bgra8).unwrap()).unwrap();
//! session.set_roi(Rect::new(8, 8, 32, 32)).unwrap();
//! while let Some(delivery) = session.recv_timeout(Duration::from_millis(500)) {
//!     println!("{}: {:?}", delivery.request_id, delivery.outcome.is_success());
//! }
//! ```

pub mod clock;
pub mod config;
mod error;
pub mod facade;
pub mod request;
pub mod scheduler;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DEFAULT_QUIESCENCE_MS, SessionConfig, load_config};
pub use error::{SessionError, SessionResult};
pub use facade::{CannyDetector, Delivery, Detector, EdgeMap, Outcome, ProcessingFacade};
pub use request::{ProcessingRequest, RequestId};
pub use scheduler::UpdateScheduler;
pub use session::Session;
