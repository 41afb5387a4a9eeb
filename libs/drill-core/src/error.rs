//! Error types for drill-core.

use thiserror::Error;

/// Result type alias using DrillError.
pub type Result<T> = std::result::Result<T, DrillError>;

/// Errors that can occur while driving a drill session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrillError {
    #[error("session is finished; load a document to continue")]
    InvalidState,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}
