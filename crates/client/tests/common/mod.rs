//! In-memory engine double driven directly by tests.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use {async_trait::async_trait, serde_json::Value, tokio::sync::broadcast};

use akocef_engine::{
    Engine, EngineError, EngineEvents, EngineLauncher, MESSAGE_PREFIX, ScriptMessage,
};

type Responder = Box<dyn FnMut(&str) -> Option<ScriptMessage> + Send>;

/// Scriptable [`Engine`] implementation: records sent units, lets tests post
/// channel traffic and drive loading transitions, and can auto-answer
/// dispatches by correlation token.
pub struct FakeEngine {
    events: EngineEvents,
    loading: AtomicBool,
    sent: Mutex<Vec<String>>,
    loaded_urls: Mutex<Vec<String>>,
    responder: Mutex<Option<Responder>>,
    reject_sends: AtomicBool,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: EngineEvents::default(),
            loading: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            loaded_urls: Mutex::new(Vec::new()),
            responder: Mutex::new(None),
            reject_sends: AtomicBool::new(false),
        })
    }

    /// Auto-answer future dispatches; the closure receives the correlation
    /// token extracted from each sent unit.
    pub fn respond(&self, f: impl FnMut(&str) -> Option<ScriptMessage> + Send + 'static) {
        *self.responder.lock().unwrap() = Some(Box::new(f));
    }

    pub fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::SeqCst);
        self.events.emit_loading(loading);
    }

    pub fn post(&self, message: &ScriptMessage) {
        self.events.emit_message(format!(
            "{MESSAGE_PREFIX}{}",
            serde_json::to_string(message).unwrap()
        ));
    }

    pub fn post_raw(&self, raw: &str) {
        self.events.emit_message(raw);
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn loaded_urls(&self) -> Vec<String> {
        self.loaded_urls.lock().unwrap().clone()
    }

    pub fn last_token(&self) -> Option<String> {
        self.sent.lock().unwrap().last().and_then(|unit| extract_token(unit))
    }

    /// Make every further send fail as if the instance were torn down.
    pub fn fail_sends(&self) {
        self.reject_sends.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Engine for FakeEngine {
    async fn send_script(&self, script: &str) -> Result<(), EngineError> {
        if self.reject_sends.load(Ordering::SeqCst) {
            return Err(EngineError::Disposed);
        }
        self.sent.lock().unwrap().push(script.to_string());

        let reply = {
            let mut responder = self.responder.lock().unwrap();
            match (responder.as_mut(), extract_token(script)) {
                (Some(f), Some(token)) => f(&token),
                _ => None,
            }
        };
        if let Some(message) = reply {
            self.post(&message);
        }
        Ok(())
    }

    fn subscribe_messages(&self) -> broadcast::Receiver<String> {
        self.events.subscribe_messages()
    }

    fn subscribe_loading(&self) -> broadcast::Receiver<bool> {
        self.events.subscribe_loading()
    }

    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    async fn load(&self, url: &str) -> Result<(), EngineError> {
        self.loaded_urls.lock().unwrap().push(url.to_string());
        self.set_loading(true);
        Ok(())
    }

    async fn close(&self) {}
}

/// Launcher handing out fresh [`FakeEngine`]s, recording the cache path
/// requested for each.
pub struct FakeLauncher {
    pub launched_paths: Mutex<Vec<Option<PathBuf>>>,
}

impl FakeLauncher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            launched_paths: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl EngineLauncher for FakeLauncher {
    async fn launch(&self, cache_path: Option<&Path>) -> Result<Arc<dyn Engine>, EngineError> {
        self.launched_paths
            .lock()
            .unwrap()
            .push(cache_path.map(Path::to_path_buf));
        Ok(FakeEngine::new())
    }
}

/// Pull the correlation token out of a wrapped unit.
pub fn extract_token(unit: &str) -> Option<String> {
    let start = unit.find("Key: '")? + "Key: '".len();
    let rest = &unit[start..];
    let end = rest.find('\'')?;
    Some(rest[..end].to_string())
}

pub fn success(token: &str, data: Option<Value>) -> ScriptMessage {
    ScriptMessage {
        key: token.to_string(),
        value: true,
        data,
    }
}

pub fn failure(token: &str, data: Option<Value>) -> ScriptMessage {
    ScriptMessage {
        key: token.to_string(),
        value: false,
        data,
    }
}
