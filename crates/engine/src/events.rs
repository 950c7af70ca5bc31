//! Broadcast fan-out for engine events.

use tokio::sync::broadcast;

/// Event fan-out an [`Engine`](crate::Engine) implementation embeds.
///
/// Emitting never blocks the engine's callback task: sends with no live
/// subscriber are dropped, and a subscriber that lags past the channel
/// capacity observes a `Lagged` error rather than stalling the sender.
pub struct EngineEvents {
    messages: broadcast::Sender<String>,
    loading: broadcast::Sender<bool>,
}

impl EngineEvents {
    pub fn new(capacity: usize) -> Self {
        let (messages, _) = broadcast::channel(capacity);
        let (loading, _) = broadcast::channel(capacity);
        Self { messages, loading }
    }

    pub fn subscribe_messages(&self) -> broadcast::Receiver<String> {
        self.messages.subscribe()
    }

    pub fn subscribe_loading(&self) -> broadcast::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Deliver a raw page message to all subscribers.
    pub fn emit_message(&self, raw: impl Into<String>) {
        let _ = self.messages.send(raw.into());
    }

    /// Deliver a loading-state transition to all subscribers.
    pub fn emit_loading(&self, loading: bool) {
        let _ = self.loading.send(loading);
    }
}

impl Default for EngineEvents {
    fn default() -> Self {
        Self::new(64)
    }
}
