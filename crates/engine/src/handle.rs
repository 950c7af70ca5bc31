//! The engine handle and launcher traits.

use std::{path::Path, sync::Arc};

use {async_trait::async_trait, tokio::sync::broadcast};

use crate::error::EngineError;

/// One running embedded-browser instance.
///
/// Event callbacks arrive on the engine's own task; subscribers receive them
/// through broadcast channels. Dropping a receiver unsubscribes it.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Best-effort one-way script execution request. Fails when the
    /// instance is already torn down.
    async fn send_script(&self, script: &str) -> Result<(), EngineError>;

    /// Raw strings posted from inside the page.
    fn subscribe_messages(&self) -> broadcast::Receiver<String>;

    /// Loading-state transitions (`true` = a page load is in progress).
    fn subscribe_loading(&self) -> broadcast::Receiver<bool>;

    /// Point-in-time loading state.
    fn is_loading(&self) -> bool;

    /// Begin navigating to `url`.
    async fn load(&self, url: &str) -> Result<(), EngineError>;

    /// Tear down the instance. Event streams close after this.
    async fn close(&self);
}

/// Launches engine instances for the client manager.
///
/// `cache_path` is the per-instance profile directory, when the manager is
/// configured with a cache root.
#[async_trait]
pub trait EngineLauncher: Send + Sync {
    async fn launch(&self, cache_path: Option<&Path>) -> Result<Arc<dyn Engine>, EngineError>;
}
