//! Error types for the dashboard runtime
//!
//! The dataset and every renderer are infallible. Errors only arise at the
//! edges: terminal setup, writing to stdout, and JSON export.

use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Dashboard error types
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Terminal or stdout I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot requested with an unusable frame size
    #[error("Invalid snapshot dimensions: {width}x{height} (both must be non-zero)")]
    InvalidDimensions {
        /// Requested width in columns
        width: u16,
        /// Requested height in rows
        height: u16,
    },
}

impl DashboardError {
    /// Get exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidDimensions { .. } => ExitCode::from(2),
            Self::Io(_) => ExitCode::from(3),
            Self::Json(_) => ExitCode::from(4),
        }
    }
}
