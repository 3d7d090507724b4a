//! Error types for roiedge-core
//!
//! Provides a unified error type for all operations in the core crate, and
//! the [`ErrorKind`] taxonomy shared by every crate in the workspace.
//!
//! Each crate keeps its own error enum; all of them collapse onto an
//! `ErrorKind` through a `kind()` method, and every `ErrorKind` has a fixed
//! status code used at the detection boundary.

use crate::pix::PixelFormat;
use crate::rect::Rect;
use thiserror::Error;

/// roiedge-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Image dimensions whose byte size cannot be represented
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Image dimensions received as negative numbers
    #[error("negative image dimensions: {width}x{height}")]
    NegativeDimension { width: i64, height: i64 },

    /// Buffer length does not match `stride * height`
    #[error("invalid buffer size: expected {expected} bytes, got {actual}")]
    InvalidBufferSize { expected: usize, actual: usize },

    /// Row stride shorter than one row of pixels
    #[error("invalid row stride {stride} for width {width} ({bytes_per_pixel} bytes/pixel)")]
    InvalidStride {
        stride: usize,
        width: u32,
        bytes_per_pixel: usize,
    },

    /// Pixel format not accepted by this operation
    #[error("unsupported pixel format: expected {expected:?}, got {actual:?}")]
    UnsupportedFormat {
        expected: PixelFormat,
        actual: PixelFormat,
    },

    /// Incompatible image sizes
    #[error("incompatible image sizes: {0}x{1} vs {2}x{3}")]
    IncompatibleSizes(u32, u32, u32, u32),

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Region of interest with zero or negative extent
    #[error("empty region of interest: {w}x{h}")]
    RoiEmpty { w: i32, h: i32 },

    /// Region of interest not contained in the image
    #[error("region of interest {roi} exceeds image bounds {width}x{height}")]
    RoiOutOfBounds { roi: Rect, width: u32, height: u32 },
}

impl Error {
    /// Classify this error into the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidBufferSize { .. }
            | Error::InvalidStride { .. }
            | Error::InvalidDimension { .. }
            | Error::NegativeDimension { .. }
            | Error::IncompatibleSizes(..) => ErrorKind::InvalidBufferSize,
            Error::UnsupportedFormat { .. } | Error::InvalidParameter(_) => {
                ErrorKind::InvalidParameters
            }
            Error::RoiEmpty { .. } => ErrorKind::RoiEmpty,
            Error::RoiOutOfBounds { .. } => ErrorKind::RoiOutOfBounds,
            Error::IndexOutOfBounds { .. } => ErrorKind::ProcessingFailed,
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure categories of the edge-detection pipeline.
///
/// Validation kinds (`InvalidBufferSize`, `InvalidParameters`, `RoiEmpty`,
/// `RoiOutOfBounds`) are recoverable by correcting the input.
/// `ComputationUnavailable` and `ProcessingFailed` are reported to the user.
/// None of them is fatal to a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input or output buffer length disagrees with the declared layout
    InvalidBufferSize,
    /// Threshold or binarization parameters out of range
    InvalidParameters,
    /// ROI has zero or negative width or height
    RoiEmpty,
    /// ROI extends outside the image
    RoiOutOfBounds,
    /// The detection backend could not be started
    ComputationUnavailable,
    /// Internal fault while computing
    ProcessingFailed,
}

/// Status code reported by the boundary call on success.
pub const STATUS_OK: i32 = 0;

impl ErrorKind {
    /// All kinds, in status-code order.
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::ProcessingFailed,
        ErrorKind::RoiEmpty,
        ErrorKind::RoiOutOfBounds,
        ErrorKind::InvalidBufferSize,
        ErrorKind::InvalidParameters,
        ErrorKind::ComputationUnavailable,
    ];

    /// Nonzero status code for this kind.
    pub fn status_code(self) -> i32 {
        match self {
            ErrorKind::ProcessingFailed => -1,
            ErrorKind::RoiEmpty => -2,
            ErrorKind::RoiOutOfBounds => -3,
            ErrorKind::InvalidBufferSize => -4,
            ErrorKind::InvalidParameters => -5,
            ErrorKind::ComputationUnavailable => -6,
        }
    }

    /// Inverse of [`ErrorKind::status_code`].
    ///
    /// Returns `None` for [`STATUS_OK`] and for unknown codes.
    pub fn from_status_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.status_code() == code)
    }

    /// True for kinds caused by caller input rather than by the backend.
    pub fn is_validation(self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidBufferSize
                | ErrorKind::InvalidParameters
                | ErrorKind::RoiEmpty
                | ErrorKind::RoiOutOfBounds
        )
    }

    /// Short user-facing description.
    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::InvalidBufferSize => "image buffer does not match its dimensions",
            ErrorKind::InvalidParameters => "detection parameters are out of range",
            ErrorKind::RoiEmpty => "the selected region is empty",
            ErrorKind::RoiOutOfBounds => "the selected region lies outside the image",
            ErrorKind::ComputationUnavailable => "the edge detector could not be started",
            ErrorKind::ProcessingFailed => "an error occurred during image processing",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
