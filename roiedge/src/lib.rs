//! roiedge - Interactive region-of-interest edge detection
//!
//! A user selects a rectangle of an image, tunes the detector, and gets a
//! binary edge map of just that rectangle back. This crate gathers the
//! workspace:
//!
//! - Raster, region and parameter types (re-exported at the root)
//! - [`filter`] - the edge detector and the byte-slice boundary call
//! - [`io`] - PNG / JPEG / BMP decoding, PNG export
//! - [`region`] - connectivity and seed fill
//! - [`session`] - debounced, stale-safe interactive sessions
//!
//! # Example
//!
//! ```
//! use roiedge::{DetectionParameters, PixelBuffer, PixelFormat, Rect};
//!
//! let image = PixelBuffer::new(64, 48, PixelFormat::Bgra8).unwrap();
//! let roi = Rect::new(8, 8, 32, 16);
//! let edges = roiedge::filter::canny_roi(&image, &roi, &DetectionParameters::default()).unwrap();
//! assert_eq!(edges.dimensions(), (32, 16));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use roiedge_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use roiedge_filter as filter;
pub use roiedge_io as io;
pub use roiedge_region as region;
pub use roiedge_session as session;
