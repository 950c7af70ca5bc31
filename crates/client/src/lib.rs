//! Pooled embedded-browser clients with promise-correlated script execution.
//!
//! Each client owns one engine instance (behind the
//! [`Engine`](akocef_engine::Engine) trait) and drives scripts inside it as
//! if they were remote calls with a result value, a deadline, and
//! cancellation on navigation.
//!
//! # Features
//!
//! - **eval**: run a fragment and await its resolve/reject outcome
//! - **timeouts**: host-side deadlines that settle a call as timed out
//! - **navigation interrupts**: a page load cancels outstanding calls
//! - **element waits**: best-effort polling until a selector matches
//! - **pooling**: identifier-keyed clients with per-instance profile caches
//!
//! # Example
//!
//! ```ignore
//! use akocef_client::{CefConfig, ClientManager};
//!
//! let manager = ClientManager::new(CefConfig::default(), launcher);
//! let client = manager.add_client().await?;
//!
//! client.load_url("https://example.com").await?;
//! client.wait_for_element("#app", Some(Duration::from_secs(5))).await;
//! let answer: Option<i64> = client.eval_as("resolve(6 * 7)", None).await?;
//! ```

pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod manager;

mod script;

pub use {
    bridge::{ScriptBridge, ScriptOutcome},
    client::CefClient,
    config::CefConfig,
    error::ClientError,
    manager::ClientManager,
};
