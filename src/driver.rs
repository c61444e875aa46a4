// Simulation Driver Module
// Plays keystroke events into a typing sink, one active run per session key.

use crate::events::TypingEvent;
use crate::sink::{SessionKey, TypingIndicator, TypingSink};
use crate::stats::{new_shared_stats, RunOutcome, SharedStats};
use crate::stream::PreviewStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Cancelled)
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Cancelled,
}

impl From<RunStatus> for RunState {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Completed => RunState::Completed,
            RunStatus::Cancelled => RunState::Cancelled,
        }
    }
}

impl From<RunStatus> for RunOutcome {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Completed => RunOutcome::Completed,
            RunStatus::Cancelled => RunOutcome::Cancelled,
        }
    }
}

struct RunEntry {
    id: Uuid,
    cancel: watch::Sender<bool>,
    state: watch::Receiver<RunState>,
}

type Registry = Arc<Mutex<HashMap<SessionKey, RunEntry>>>;

/// A registered run. Dropping it releases the session slot if it still owns it.
struct RunTicket {
    id: Uuid,
    key: SessionKey,
    cancel: watch::Receiver<bool>,
    state: watch::Sender<RunState>,
    predecessor: Option<watch::Receiver<RunState>>,
    registry: Registry,
}

impl Drop for RunTicket {
    fn drop(&mut self) {
        if let Ok(mut runs) = self.registry.lock() {
            if runs.get(&self.key).map(|entry| entry.id) == Some(self.id) {
                runs.remove(&self.key);
            }
        }
    }
}

/// Cancels a run if the future waiting on it is dropped first
struct CancelOnDrop {
    registry: Registry,
    key: SessionKey,
    id: Uuid,
    armed: bool,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(runs) = self.registry.lock() {
            if let Some(entry) = runs.get(&self.key).filter(|entry| entry.id == self.id) {
                tracing::debug!(session = %self.key, run_id = %self.id, "Caller went away, cancelling run");
                entry.cancel.send_replace(true);
            }
        }
    }
}

/// A run spawned onto the tokio runtime
pub struct RunHandle {
    pub id: Uuid,
    pub session_key: SessionKey,
    join: JoinHandle<RunStatus>,
}

impl RunHandle {
    /// Wait for the run to finish. A panicked or aborted task counts as cancelled.
    pub async fn wait(self) -> RunStatus {
        self.join.await.unwrap_or(RunStatus::Cancelled)
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Plays typing simulations against a sink.
///
/// At most one run is active per [`SessionKey`]: starting a new run cancels the
/// previous one and waits for its cleanup before writing anything.
pub struct SimulationDriver {
    runs: Registry,
    stats: SharedStats,
    time_scale: f64,
}

impl SimulationDriver {
    pub fn new() -> Self {
        Self::with_stats(new_shared_stats())
    }

    pub fn with_stats(stats: SharedStats) -> Self {
        Self {
            runs: Arc::new(Mutex::new(HashMap::new())),
            stats,
            time_scale: 1.0,
        }
    }

    /// Multiplier on every event delay (0.0 plays instantly)
    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale.max(0.0);
        self
    }

    pub fn stats(&self) -> &SharedStats {
        &self.stats
    }

    /// Play `events` for `session_key` and wait until the run finishes.
    ///
    /// Sink failures never surface here; the status only tells completion from cancellation.
    /// The run itself lives on a spawned task: dropping this future cancels it, and the
    /// task still clears the indicator.
    pub async fn run(
        self: &Arc<Self>,
        session_key: impl Into<SessionKey>,
        events: Vec<TypingEvent>,
        sink: Arc<dyn TypingSink>,
    ) -> RunStatus {
        let handle = self.start(session_key, events, sink);
        let mut guard = CancelOnDrop {
            registry: Arc::clone(&self.runs),
            key: handle.session_key.clone(),
            id: handle.id,
            armed: true,
        };
        let status = handle.wait().await;
        guard.armed = false;
        status
    }

    /// Register a run now and play it on a spawned task
    pub fn start(
        self: &Arc<Self>,
        session_key: impl Into<SessionKey>,
        events: Vec<TypingEvent>,
        sink: Arc<dyn TypingSink>,
    ) -> RunHandle {
        let ticket = self.register(session_key.into());
        let id = ticket.id;
        let session_key = ticket.key.clone();
        let driver = Arc::clone(self);
        let join = tokio::spawn(async move { driver.play(ticket, events, sink.as_ref()).await });

        RunHandle {
            id,
            session_key,
            join,
        }
    }

    /// Signal the active run for `session_key` to stop.
    ///
    /// Returns true only when this call delivered the cancellation; repeated calls
    /// and calls after completion are no-ops.
    pub fn cancel(&self, session_key: &SessionKey) -> bool {
        let Ok(runs) = self.runs.lock() else {
            return false;
        };
        match runs.get(session_key) {
            Some(entry) => {
                let delivered = !entry.cancel.send_replace(true);
                if delivered {
                    tracing::debug!(session = %session_key, run_id = %entry.id, "Cancelling run");
                }
                delivered
            }
            None => false,
        }
    }

    /// Signal every active run to stop; returns how many were signalled
    pub fn cancel_all(&self) -> usize {
        let Ok(runs) = self.runs.lock() else {
            return 0;
        };
        runs.values()
            .filter(|entry| !entry.cancel.send_replace(true))
            .count()
    }

    pub fn is_active(&self, session_key: &SessionKey) -> bool {
        self.runs
            .lock()
            .map(|runs| runs.contains_key(session_key))
            .unwrap_or(false)
    }

    /// Current state of the run registered for `session_key`
    pub fn state(&self, session_key: &SessionKey) -> Option<RunState> {
        self.runs
            .lock()
            .ok()
            .and_then(|runs| runs.get(session_key).map(|entry| *entry.state.borrow()))
    }

    pub fn active_sessions(&self) -> Vec<SessionKey> {
        let mut keys: Vec<SessionKey> = self
            .runs
            .lock()
            .map(|runs| runs.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn register(&self, key: SessionKey) -> RunTicket {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(RunState::Idle);
        let id = Uuid::new_v4();

        let predecessor = match self.runs.lock() {
            Ok(mut runs) => runs
                .insert(
                    key.clone(),
                    RunEntry {
                        id,
                        cancel: cancel_tx,
                        state: state_rx,
                    },
                )
                .map(|previous| {
                    tracing::debug!(
                        session = %key,
                        previous_run = %previous.id,
                        "Cancelling previous run for session"
                    );
                    previous.cancel.send_replace(true);
                    previous.state
                }),
            Err(_) => None,
        };

        RunTicket {
            id,
            key,
            cancel: cancel_rx,
            state: state_tx,
            predecessor,
            registry: Arc::clone(&self.runs),
        }
    }

    async fn play(
        &self,
        mut ticket: RunTicket,
        events: Vec<TypingEvent>,
        sink: &dyn TypingSink,
    ) -> RunStatus {
        let started = Instant::now();
        self.stats.record_run_start();

        if let Some(mut previous) = ticket.predecessor.take() {
            // A closed channel means the previous run is gone entirely.
            let _ = previous.wait_for(|state| state.is_terminal()).await;
        }

        if *ticket.cancel.borrow() {
            tracing::debug!(session = %ticket.key, run_id = %ticket.id, "Run cancelled before start");
            return self.finish(ticket, RunStatus::Cancelled, started);
        }

        let preview = PreviewStream::new(events).with_time_scale(self.time_scale);
        tracing::info!(
            session = %ticket.key,
            run_id = %ticket.id,
            events = preview.len(),
            sink = sink.name(),
            "Starting typing simulation"
        );
        ticket.state.send_replace(RunState::Running);
        self.write(sink, &ticket.key, TypingIndicator::typing("", 0))
            .await;

        let mut frames = preview.into_stream();

        let status = loop {
            tokio::select! {
                biased;
                _ = ticket.cancel.changed() => break RunStatus::Cancelled,
                frame = frames.next() => match frame {
                    Some(frame) => {
                        if *ticket.cancel.borrow() {
                            break RunStatus::Cancelled;
                        }
                        self.stats.record_event_applied();
                        self.write(sink, &ticket.key, frame.indicator).await;
                    }
                    None => break RunStatus::Completed,
                },
            }
        };
        drop(frames);

        if let Err(e) = sink.upsert(&ticket.key, TypingIndicator::idle()).await {
            self.stats.record_sink_error();
            tracing::warn!(session = %ticket.key, error = %e, "Failed to clear typing indicator");
        }

        self.finish(ticket, status, started)
    }

    async fn write(&self, sink: &dyn TypingSink, key: &SessionKey, indicator: TypingIndicator) {
        if let Err(e) = sink.upsert(key, indicator).await {
            self.stats.record_sink_error();
            tracing::warn!(session = %key, error = %e, "Skipping typing preview update");
        }
    }

    fn finish(&self, ticket: RunTicket, status: RunStatus, started: Instant) -> RunStatus {
        let elapsed = started.elapsed();
        self.stats.record_run_end(status.into(), elapsed);
        tracing::info!(
            session = %ticket.key,
            run_id = %ticket.id,
            status = ?status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Typing simulation finished"
        );
        ticket.state.send_replace(status.into());
        status
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}
