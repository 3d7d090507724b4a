//! Error types for roiedge-region

use roiedge_core::ErrorKind;
use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] roiedge_core::Error),

    /// Seed and mask images differ in size
    #[error("seed is {seed_w}x{seed_h} but mask is {mask_w}x{mask_h}")]
    SizeMismatch {
        seed_w: u32,
        seed_h: u32,
        mask_w: u32,
        mask_h: u32,
    },
}

impl RegionError {
    /// Classify this error into the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegionError::Core(e) => e.kind(),
            RegionError::SizeMismatch { .. } => ErrorKind::InvalidBufferSize,
        }
    }
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
