//! roiedge-region - Connectivity and seed fill on binary masks
//!
//! - **Connected component analysis** - connectivity types and counting
//! - **Seed fill operations** - binary reconstruction, the linking step
//!   of hysteresis thresholding
//!
//! # Examples
//!
//! ```
//! use roiedge_core::{PixelBuffer, PixelFormat};
//! use roiedge_region::{ConnectivityType, seedfill_binary};
//!
//! let mask = PixelBuffer::from_bytes(3, 1, PixelFormat::Gray8, vec![1, 1, 0]).unwrap();
//! let seed = PixelBuffer::from_bytes(3, 1, PixelFormat::Gray8, vec![0, 1, 0]).unwrap();
//! let linked = seedfill_binary(&seed, &mask, ConnectivityType::EightWay).unwrap();
//! assert_eq!(linked.data(), &[255, 255, 0]);
//! ```

pub mod conncomp;
pub mod error;
pub mod seedfill;

pub use conncomp::{ConnectivityType, count_components};
pub use error::{RegionError, RegionResult};
pub use seedfill::{FOREGROUND, seedfill_binary};
