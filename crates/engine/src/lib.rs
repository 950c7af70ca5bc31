//! Boundary contract for embedded browser-engine instances.
//!
//! The client crate drives script execution through the [`Engine`] trait and
//! never touches a concrete engine binding. An implementation wraps one
//! running instance (an offscreen CEF view, a DevTools connection, a test
//! double) and exposes:
//!
//! - **send_script**: best-effort one-way script execution
//! - **messages**: raw strings posted from inside the page
//! - **loading**: boolean loading-state transitions
//! - **load / is_loading**: navigation and a point-in-time state query
//!
//! [`protocol`] defines the wire format the page uses to report script
//! outcomes back over the message channel.

pub mod error;
pub mod events;
pub mod handle;
pub mod protocol;

pub use {
    error::EngineError,
    events::EngineEvents,
    handle::{Engine, EngineLauncher},
    protocol::{MESSAGE_PREFIX, ScriptMessage, parse_message},
};
