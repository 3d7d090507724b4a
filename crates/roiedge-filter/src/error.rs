//! Error types for roiedge-filter

use roiedge_core::ErrorKind;
use thiserror::Error;

/// Errors that can occur during edge detection
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error (buffer layout, ROI, parameters)
    #[error("core error: {0}")]
    Core(#[from] roiedge_core::Error),

    /// Region library error
    #[error("region error: {0}")]
    Region(#[from] roiedge_region::RegionError),

    /// Invalid kernel
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Output buffer does not match the region size
    #[error("output buffer holds {actual} bytes, region needs {expected}")]
    OutputSize { expected: usize, actual: usize },

    /// Internal fault while computing
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}

impl FilterError {
    /// Classify this error into the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilterError::Core(e) => e.kind(),
            FilterError::Region(e) => e.kind(),
            FilterError::OutputSize { .. } => ErrorKind::InvalidBufferSize,
            FilterError::InvalidKernel(_) | FilterError::ProcessingFailed(_) => {
                ErrorKind::ProcessingFailed
            }
        }
    }
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
