//! Wire protocol for page-to-host outcome messages.
//!
//! The page posts plain strings on a single shared channel, so unrelated
//! traffic is expected. Only strings starting with [`MESSAGE_PREFIX`] belong
//! to this protocol; the remainder of a prefixed string is a JSON object
//! correlating back to exactly one dispatched script.

use {
    serde::{Deserialize, Serialize},
    serde_json::Value,
    tracing::debug,
};

/// Marker in front of every outcome message. Checked before any JSON work so
/// unrelated channel traffic is filtered cheaply.
pub const MESSAGE_PREFIX: &str = "AkoCefMessage: ";

/// Outcome of one wrapped script, correlated by `key`.
///
/// Field names are part of the wire format and case-sensitive. `data` is
/// omitted entirely when the continuation was called without a value, never
/// serialized as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptMessage {
    #[serde(rename = "Key")]
    pub key: String,

    /// `true` when the page called the resolve continuation.
    #[serde(rename = "Value")]
    pub value: bool,

    #[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Filter-then-parse. Returns `None` both for unrelated traffic (no prefix)
/// and for prefixed strings whose body does not decode; a corrupt message is
/// simply not a match for any pending call.
pub fn parse_message(raw: &str) -> Option<ScriptMessage> {
    let body = raw.strip_prefix(MESSAGE_PREFIX)?;
    match serde_json::from_str(body) {
        Ok(message) => Some(message),
        Err(e) => {
            debug!(error = %e, "discarding malformed outcome message");
            None
        },
    }
}
