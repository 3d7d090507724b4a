//! I/O error types
//!
//! Each format module maps its decoder's errors into `IoError` variants so
//! that callers only need to handle one error type.

use roiedge_core::ErrorKind;
use thiserror::Error;

/// Error type for image I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported or not enabled via features
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The image data is structurally invalid
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// A format-specific decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A format-specific encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// An error from the core library (e.g. buffer size mismatch)
    #[error("core error: {0}")]
    Core(#[from] roiedge_core::Error),
}

impl IoError {
    /// Classify this error into the shared taxonomy.
    ///
    /// Image loading sits outside the detection boundary, so anything
    /// other than a core validation error counts as a processing failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IoError::Core(e) => e.kind(),
            _ => ErrorKind::ProcessingFailed,
        }
    }
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
