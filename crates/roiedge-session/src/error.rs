//! Error types for roiedge-session

use roiedge_core::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running a session
#[derive(Debug, Error)]
pub enum SessionError {
    /// Detection engine error
    #[error("detection error: {0}")]
    Filter(#[from] roiedge_filter::FilterError),

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] roiedge_core::Error),

    /// Configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A session thread could not be started
    #[error("failed to start {name} thread: {source}")]
    ThreadSpawn {
        name: &'static str,
        source: std::io::Error,
    },

    /// The session has been shut down
    #[error("session is shut down")]
    Closed,
}

impl SessionError {
    /// Classify this error into the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Filter(e) => e.kind(),
            SessionError::Core(e) => e.kind(),
            SessionError::ConfigRead { .. } | SessionError::Config { .. } => {
                ErrorKind::InvalidParameters
            }
            SessionError::ThreadSpawn { .. } | SessionError::Closed => {
                ErrorKind::ComputationUnavailable
            }
        }
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
