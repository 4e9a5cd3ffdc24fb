//! Error types for the calendar updater.

use thiserror::Error;

/// Errors that can abort an update run.
///
/// Recoverable conditions (fetch failures, malformed page data) are handled
/// where they occur and never reach this type; only storage problems and a
/// corrupt calendar document are fatal.
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("calendar file has no END:VCALENDAR terminator")]
    MissingTerminator,
}

/// Result type alias for update operations.
pub type UpdateResult<T> = Result<T, UpdateError>;
