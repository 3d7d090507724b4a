//! roiedge-test - Regression test framework for roiedge
//!
//! Integration tests named `<topic>_reg.rs` drive a [`RegParams`] through
//! a series of numbered checks and assert on [`RegParams::cleanup`]. Two
//! modes are supported:
//!
//! - **Compare** (default): run all checks in memory
//! - **Display**: additionally write checked images to `tests/regout`
//!
//! Test images are built by [`synth`] rather than loaded from disk.
//!
//! # Usage
//!
//! ```ignore
//! use roiedge_test::RegParams;
//!
//! let mut rp = RegParams::new("canny");
//! rp.compare_values(50.0, map.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // roiedge-test is at crates/roiedge-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Get a scratch file path under the regout directory, creating the
/// directory if needed.
pub fn scratch_path(name: &str) -> TestResult<String> {
    let dir = format!("{}/scratch", regout_dir());
    std::fs::create_dir_all(&dir)?;
    Ok(format!("{}/{}", dir, name))
}
