//! Client error types.

use {serde_json::Value, thiserror::Error};

use akocef_engine::EngineError;

/// Errors surfaced by script dispatch and instance management.
///
/// At the bridge level, rejection, interruption, and timeout are ordinary
/// settled outcomes ([`ScriptOutcome`](crate::ScriptOutcome)); they appear
/// here only through the entry points that require the script to have
/// completed.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The page rejected the wrapped script, or the fragment threw
    /// synchronously.
    #[error("script rejected by page")]
    Rejected { data: Option<Value> },

    /// A navigation replaced the page while the call was outstanding.
    #[error("script interrupted by navigation")]
    Interrupted,

    /// The deadline elapsed before any outcome message arrived. The page
    /// may still be running the fragment.
    #[error("script timed out")]
    TimedOut,

    /// A resolve payload did not decode into the requested type.
    #[error("payload deserialization failed: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The engine instance is gone; the request never settled.
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
