//! Identifier-keyed client pool with per-instance cache paths.

use std::{collections::HashMap, sync::Arc};

use {
    tokio::sync::RwLock,
    tracing::{info, warn},
    uuid::Uuid,
};

use akocef_engine::EngineLauncher;

use crate::{client::CefClient, config::CefConfig, error::ClientError};

/// Owns the collection of engine clients.
pub struct ClientManager {
    config: CefConfig,
    launcher: Arc<dyn EngineLauncher>,
    clients: RwLock<HashMap<Uuid, Arc<CefClient>>>,
}

impl ClientManager {
    /// Create a manager, clearing stale profile caches from previous runs
    /// when configured to.
    pub fn new(config: CefConfig, launcher: Arc<dyn EngineLauncher>) -> Self {
        if config.clear_cache_on_start
            && let Some(root) = &config.cache_root
            && root.exists()
        {
            match std::fs::remove_dir_all(root) {
                Ok(()) => info!(cache_root = %root.display(), "removed stale profile caches"),
                Err(e) => warn!(
                    cache_root = %root.display(),
                    error = %e,
                    "failed to clear profile caches at startup"
                ),
            }
        }

        Self {
            config,
            launcher,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Launch a new engine instance and register a client for it.
    pub async fn add_client(&self) -> Result<Arc<CefClient>, ClientError> {
        let id = Uuid::new_v4();
        let cache_path = self
            .config
            .cache_root
            .as_ref()
            .map(|root| root.join(id.to_string()));

        let engine = self.launcher.launch(cache_path.as_deref()).await?;
        let client = Arc::new(CefClient::new(id, cache_path, engine, &self.config));

        self.clients.write().await.insert(id, Arc::clone(&client));
        info!(client_id = %id, "added engine client");
        Ok(client)
    }

    /// Look up a client by id.
    pub async fn get_client(&self, id: Uuid) -> Option<Arc<CefClient>> {
        self.clients.read().await.get(&id).cloned()
    }

    /// Remove a client and close its engine. Unknown ids are a no-op.
    pub async fn remove_client(&self, id: Uuid) {
        let client = self.clients.write().await.remove(&id);
        if let Some(client) = client {
            client.close().await;
            info!(client_id = %id, "removed engine client");
        }
    }

    /// Number of live clients.
    pub async fn active_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Close every client.
    pub async fn shutdown(&self) {
        let ids: Vec<Uuid> = self.clients.read().await.keys().copied().collect();
        for id in ids {
            self.remove_client(id).await;
        }
        info!("client manager shut down");
    }
}
