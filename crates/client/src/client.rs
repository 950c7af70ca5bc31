//! Per-instance client: script execution, navigation, element waits.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use {
    serde::de::DeserializeOwned,
    tracing::{debug, info},
    uuid::Uuid,
};

use akocef_engine::Engine;

use crate::{
    bridge::{ScriptBridge, ScriptOutcome},
    config::CefConfig,
    error::ClientError,
    script,
};

/// One managed engine instance with promise-correlated script execution.
pub struct CefClient {
    id: Uuid,
    cache_path: Option<PathBuf>,
    engine: Arc<dyn Engine>,
    bridge: ScriptBridge,
}

impl CefClient {
    pub fn new(
        id: Uuid,
        cache_path: Option<PathBuf>,
        engine: Arc<dyn Engine>,
        config: &CefConfig,
    ) -> Self {
        Self {
            bridge: ScriptBridge::new(Arc::clone(&engine), config.poll_interval_ms),
            id,
            cache_path,
            engine,
        }
    }

    /// Stable identifier of this instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// On-disk profile cache assigned to this instance, if any.
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// Run a script without waiting for any result.
    pub async fn execute(&self, fragment: &str) -> Result<(), ClientError> {
        self.engine.send_script(fragment).await?;
        Ok(())
    }

    /// Dispatch a fragment and return its settled outcome.
    ///
    /// The fragment must call `resolve(value)` or `reject(reason)`.
    pub async fn eval_promise(
        &self,
        fragment: &str,
        deadline: Option<Duration>,
    ) -> Result<ScriptOutcome, ClientError> {
        self.bridge.dispatch(fragment, deadline).await
    }

    /// Dispatch a fragment and decode its resolve payload.
    ///
    /// `None` when the page resolved without a value. Every non-resolved
    /// outcome is an error carrying what the page reported.
    pub async fn eval_as<T: DeserializeOwned>(
        &self,
        fragment: &str,
        deadline: Option<Duration>,
    ) -> Result<Option<T>, ClientError> {
        let data = self.bridge.dispatch(fragment, deadline).await?.into_result()?;
        Ok(data.map(serde_json::from_value).transpose()?)
    }

    /// Dispatch a fragment, requiring it to resolve.
    ///
    /// For callers that need the fragment to have completed: rejection,
    /// interruption, and timeout surface as explicit errors instead of a
    /// silent non-answer.
    pub async fn eval_expect(
        &self,
        fragment: &str,
        deadline: Option<Duration>,
    ) -> Result<(), ClientError> {
        self.bridge.dispatch(fragment, deadline).await?.into_result()?;
        Ok(())
    }

    /// Wait until `selector` matches a rendered element, best-effort.
    ///
    /// Never raises; a deadline bounds how long the page is polled.
    pub async fn wait_for_element(&self, selector: &str, deadline: Option<Duration>) {
        debug!(client_id = %self.id, selector, "waiting for element");
        let condition = script::element_condition(selector);
        self.bridge.wait_for(&condition, deadline).await;
    }

    /// Navigate and wait for the load to settle.
    pub async fn load_url(&self, url: &str) -> Result<(), ClientError> {
        info!(client_id = %self.id, url, "navigating");
        self.bridge.navigate_and_await(url).await
    }

    /// Wait for any in-progress load to finish.
    pub async fn wait_to_load(&self) {
        self.bridge.await_load_settled().await;
    }

    /// Tear down the engine instance. Outstanding dispatches settle as
    /// interrupted.
    pub async fn close(&self) {
        self.engine.close().await;
    }
}
