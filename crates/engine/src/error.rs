//! Engine transport error types.

use thiserror::Error;

/// Transport-level faults at the engine boundary.
///
/// These mean the instance is gone or refused an operation outright; a
/// script rejecting inside the page is not an `EngineError`, it is an
/// ordinary settled outcome.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine instance disposed")]
    Disposed,

    #[error("engine launch failed: {0}")]
    LaunchFailed(String),

    #[error("script send failed: {0}")]
    SendFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),
}
