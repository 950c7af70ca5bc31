//! Client pool configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the client manager and its script bridges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CefConfig {
    /// Root directory for per-instance profile caches. Each client gets a
    /// subdirectory named after its id. `None` leaves cache placement to the
    /// engine.
    pub cache_root: Option<PathBuf>,

    /// Remove the cache root at startup, dropping profile data left behind
    /// by previous runs.
    pub clear_cache_on_start: bool,

    /// Element-wait polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for CefConfig {
    fn default() -> Self {
        Self {
            cache_root: None,
            clear_cache_on_start: true,
            poll_interval_ms: 100,
        }
    }
}
