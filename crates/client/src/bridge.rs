//! Execution bridge: correlated script dispatch with racing settlement
//! triggers, plus the load-state and condition-wait primitives built on it.
//!
//! A dispatch is settled by whichever of three triggers wins: the page's own
//! outcome message, a navigation interrupt, or an optional deadline. The
//! race is decided by a single mutex-guarded check-and-set; losers are
//! silently discarded, never double-applied.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use {
    serde_json::Value,
    tokio::{
        sync::{broadcast, broadcast::error::RecvError, oneshot},
        task::JoinHandle,
        time,
    },
    tracing::{debug, warn},
};

use akocef_engine::{Engine, parse_message};

use crate::{error::ClientError, script};

// ── Outcomes ─────────────────────────────────────────────────────────────────

/// Final state of one dispatched script.
///
/// All four variants are settled outcomes; the caller always receives one of
/// them unless the engine itself failed ([`ClientError::Engine`]).
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptOutcome {
    /// The page called the resolve continuation.
    Resolved(Option<Value>),
    /// The page called the reject continuation, or the fragment threw.
    Rejected(Option<Value>),
    /// A navigation began while the call was outstanding; continuations
    /// anchored in the replaced page can never fire.
    Interrupted,
    /// The deadline elapsed. Host-side only: the page may still be running.
    TimedOut,
}

impl ScriptOutcome {
    /// Collapse into the completion-requiring shape: the resolve payload, or
    /// a typed error for every non-resolved outcome.
    pub fn into_result(self) -> Result<Option<Value>, ClientError> {
        match self {
            Self::Resolved(data) => Ok(data),
            Self::Rejected(data) => Err(ClientError::Rejected { data }),
            Self::Interrupted => Err(ClientError::Interrupted),
            Self::TimedOut => Err(ClientError::TimedOut),
        }
    }
}

// ── Pending requests ─────────────────────────────────────────────────────────

/// One outstanding correlated call: open until exactly one trigger settles
/// it.
struct Pending {
    token: String,
    state: Mutex<PendingState>,
}

struct PendingState {
    outcome: Option<ScriptOutcome>,
    settled_tx: Option<oneshot::Sender<ScriptOutcome>>,
}

impl Pending {
    fn new(token: String) -> (Arc<Self>, oneshot::Receiver<ScriptOutcome>) {
        let (settled_tx, settled_rx) = oneshot::channel();
        let pending = Arc::new(Self {
            token,
            state: Mutex::new(PendingState {
                outcome: None,
                settled_tx: Some(settled_tx),
            }),
        });
        (pending, settled_rx)
    }

    /// Single-writer check-and-set. Returns whether this caller won the
    /// race; a loser's outcome is discarded without side effects.
    fn attempt_settle(&self, outcome: ScriptOutcome) -> bool {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.outcome.is_some() {
            return false;
        }
        debug!(token = %self.token, outcome = ?outcome, "settling request");
        state.outcome = Some(outcome.clone());
        if let Some(tx) = state.settled_tx.take() {
            let _ = tx.send(outcome);
        }
        true
    }
}

/// Aborts the trigger tasks when dropped, so listeners are detached on every
/// dispatch exit path, normal or not. Abort is idempotent; a trigger firing
/// while detach is underway still funnels through `attempt_settle`.
#[derive(Default)]
struct ListenerGuard {
    tasks: Vec<JoinHandle<()>>,
}

impl ListenerGuard {
    fn attach(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

// ── Bridge ───────────────────────────────────────────────────────────────────

/// Drives correlated script execution against one engine instance.
#[derive(Clone)]
pub struct ScriptBridge {
    engine: Arc<dyn Engine>,
    poll_interval_ms: u64,
}

impl ScriptBridge {
    pub fn new(engine: Arc<dyn Engine>, poll_interval_ms: u64) -> Self {
        Self {
            engine,
            poll_interval_ms,
        }
    }

    /// Dispatch a fragment and await its settled outcome.
    ///
    /// The fragment must call `resolve(value)` or `reject(reason)`. With a
    /// `deadline`, the call settles as [`ScriptOutcome::TimedOut`] at expiry;
    /// without one, it waits until the page answers or a navigation
    /// interrupts it.
    pub async fn dispatch(
        &self,
        fragment: &str,
        deadline: Option<Duration>,
    ) -> Result<ScriptOutcome, ClientError> {
        // A unit injected into a page that is still loading would anchor its
        // continuations in a document about to be replaced.
        if self.engine.is_loading() {
            self.await_load_settled().await;
        }

        let token = script::correlation_token();
        let unit = script::wrap_promise(fragment, &token);

        // Subscribe before sending, so an outcome posted immediately after
        // the send cannot be missed.
        let messages = self.engine.subscribe_messages();
        let loading = self.engine.subscribe_loading();

        let (pending, settled) = Pending::new(token.clone());

        let mut listeners = ListenerGuard::default();
        listeners.attach(tokio::spawn(message_trigger(messages, Arc::clone(&pending))));
        listeners.attach(tokio::spawn(navigation_trigger(loading, Arc::clone(&pending))));
        if let Some(deadline) = deadline {
            listeners.attach(tokio::spawn(deadline_trigger(deadline, Arc::clone(&pending))));
        }

        debug!(token, deadline = ?deadline, "dispatching script");
        self.engine.send_script(&unit).await?;

        let outcome = match settled.await {
            Ok(outcome) => outcome,
            // The sender lives in `pending`, which we hold; this arm is
            // unreachable but must not panic under the workspace lints.
            Err(_) => ScriptOutcome::Interrupted,
        };
        debug!(token, outcome = ?outcome, "dispatch settled");
        Ok(outcome)
    }

    /// Poll `condition` inside the page until it holds, best-effort.
    ///
    /// Never raises: rejection, interruption, timeout, and transport failure
    /// all collapse into "gave up", reported at debug level only.
    pub async fn wait_for(&self, condition: &str, deadline: Option<Duration>) {
        let fragment = script::poll_condition(condition, self.poll_interval_ms);
        match self.dispatch(&fragment, deadline).await {
            Ok(ScriptOutcome::Resolved(_)) => {},
            Ok(outcome) => debug!(outcome = ?outcome, "condition wait gave up"),
            Err(e) => debug!(error = %e, "condition wait failed"),
        }
    }

    /// Wait for any in-progress page load to finish. Returns immediately
    /// when the engine is idle.
    pub async fn await_load_settled(&self) {
        if !self.engine.is_loading() {
            return;
        }
        let mut loading = self.engine.subscribe_loading();
        // Re-check after subscribing: the load may have finished in between.
        if !self.engine.is_loading() {
            return;
        }
        loop {
            match loading.recv().await {
                Ok(false) | Err(RecvError::Closed) => return,
                Ok(true) => {},
                Err(RecvError::Lagged(_)) => {
                    if !self.engine.is_loading() {
                        return;
                    }
                },
            }
        }
    }

    /// Issue a navigation and wait for its load to settle.
    pub async fn navigate_and_await(&self, url: &str) -> Result<(), ClientError> {
        validate_url(url)?;
        // Subscribe before issuing the load so the completion event cannot
        // win the race against us.
        let mut loading = self.engine.subscribe_loading();
        self.engine.load(url).await?;
        loop {
            match loading.recv().await {
                Ok(false) | Err(RecvError::Closed) => return Ok(()),
                Ok(true) => {},
                Err(RecvError::Lagged(_)) => {
                    if !self.engine.is_loading() {
                        return Ok(());
                    }
                },
            }
        }
    }
}

// ── Settlement triggers ──────────────────────────────────────────────────────

/// Settle from the page's own outcome message: filter by prefix, parse,
/// match the correlation token.
async fn message_trigger(mut messages: broadcast::Receiver<String>, pending: Arc<Pending>) {
    loop {
        match messages.recv().await {
            Ok(raw) => {
                let Some(message) = parse_message(&raw) else {
                    continue;
                };
                if message.key != pending.token {
                    continue;
                }
                let outcome = if message.value {
                    ScriptOutcome::Resolved(message.data)
                } else {
                    ScriptOutcome::Rejected(message.data)
                };
                pending.attempt_settle(outcome);
                return;
            },
            Err(RecvError::Lagged(skipped)) => {
                warn!(token = %pending.token, skipped, "message stream lagged");
            },
            Err(RecvError::Closed) => {
                // Engine gone: the continuation can never reach us.
                pending.attempt_settle(ScriptOutcome::Interrupted);
                return;
            },
        }
    }
}

/// Settle as interrupted when a navigation begins.
async fn navigation_trigger(mut loading: broadcast::Receiver<bool>, pending: Arc<Pending>) {
    loop {
        match loading.recv().await {
            Ok(true) | Err(RecvError::Closed) => {
                pending.attempt_settle(ScriptOutcome::Interrupted);
                return;
            },
            Ok(false) | Err(RecvError::Lagged(_)) => {},
        }
    }
}

/// Host-side synthetic timeout. It never interrupts work already running in
/// the page; it only stops the host from waiting.
async fn deadline_trigger(deadline: Duration, pending: Arc<Pending>) {
    time::sleep(deadline).await;
    pending.attempt_settle(ScriptOutcome::TimedOut);
}

/// Validate a URL before handing it to the engine: parseable, http(s) only.
fn validate_url(url: &str) -> Result<(), ClientError> {
    if url.is_empty() {
        return Err(ClientError::InvalidUrl("url is empty".to_string()));
    }
    let parsed = url::Url::parse(url)
        .map_err(|e| ClientError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ClientError::InvalidUrl(format!(
            "unsupported scheme '{scheme}', only http/https allowed"
        ))),
    }
}
