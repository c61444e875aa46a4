//! Statistics module for tracking simulation activity.
//!
//! Thread-safe atomic counters shared by the simulation driver and the
//! HTTP server.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Relaxed ordering for stats - we don't need strict ordering guarantees
const ORDERING: Ordering = Ordering::Relaxed;

/// How a simulation run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

/// Global statistics tracker for typing simulations.
#[derive(Debug)]
pub struct Stats {
    start_time: Instant,

    /// Runs started
    pub runs_started: AtomicU64,
    /// Runs currently playing
    pub active_runs: AtomicU64,
    /// Runs that played every event
    pub runs_completed: AtomicU64,
    /// Runs cancelled by a newer run or an explicit cancel
    pub runs_cancelled: AtomicU64,

    /// Keystroke events applied across all runs
    pub events_applied: AtomicU64,
    /// Failed indicator writes (playback continued)
    pub sink_errors: AtomicU64,

    // Playback time tracking (in milliseconds)
    total_playback_ms: AtomicU64,
    max_playback_ms: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    /// Create a new Stats instance
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            runs_started: AtomicU64::new(0),
            active_runs: AtomicU64::new(0),
            runs_completed: AtomicU64::new(0),
            runs_cancelled: AtomicU64::new(0),
            events_applied: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            total_playback_ms: AtomicU64::new(0),
            max_playback_ms: AtomicU64::new(0),
        }
    }

    /// Record the start of a run
    pub fn record_run_start(&self) {
        self.runs_started.fetch_add(1, ORDERING);
        self.active_runs.fetch_add(1, ORDERING);
    }

    /// Record the end of a run
    pub fn record_run_end(&self, outcome: RunOutcome, elapsed: Duration) {
        self.active_runs.fetch_sub(1, ORDERING);
        match outcome {
            RunOutcome::Completed => self.runs_completed.fetch_add(1, ORDERING),
            RunOutcome::Cancelled => self.runs_cancelled.fetch_add(1, ORDERING),
        };

        let elapsed_ms = elapsed.as_millis() as u64;
        self.total_playback_ms.fetch_add(elapsed_ms, ORDERING);
        self.max_playback_ms.fetch_max(elapsed_ms, ORDERING);
    }

    pub fn record_event_applied(&self) {
        self.events_applied.fetch_add(1, ORDERING);
    }

    pub fn record_sink_error(&self) {
        self.sink_errors.fetch_add(1, ORDERING);
    }

    /// Get the uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average playback time of finished runs in milliseconds
    pub fn avg_playback_ms(&self) -> f64 {
        let finished =
            self.runs_completed.load(ORDERING) + self.runs_cancelled.load(ORDERING);
        if finished == 0 {
            return 0.0;
        }
        self.total_playback_ms.load(ORDERING) as f64 / finished as f64
    }

    /// Get a snapshot of all stats for serialization
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uptime_secs: self.uptime().as_secs(),
            runs_started: self.runs_started.load(ORDERING),
            active_runs: self.active_runs.load(ORDERING),
            runs_completed: self.runs_completed.load(ORDERING),
            runs_cancelled: self.runs_cancelled.load(ORDERING),
            events_applied: self.events_applied.load(ORDERING),
            sink_errors: self.sink_errors.load(ORDERING),
            avg_playback_ms: self.avg_playback_ms(),
            max_playback_ms: self.max_playback_ms.load(ORDERING),
        }
    }
}

/// A serializable snapshot of statistics
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StatsSnapshot {
    pub uptime_secs: u64,
    pub runs_started: u64,
    pub active_runs: u64,
    pub runs_completed: u64,
    pub runs_cancelled: u64,
    pub events_applied: u64,
    pub sink_errors: u64,
    pub avg_playback_ms: f64,
    pub max_playback_ms: u64,
}

/// Shared stats handle for use across threads
pub type SharedStats = Arc<Stats>;

/// Create a new shared stats instance
pub fn new_shared_stats() -> SharedStats {
    Arc::new(Stats::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_basic() {
        let stats = Stats::new();

        stats.record_run_start();
        assert_eq!(stats.runs_started.load(ORDERING), 1);
        assert_eq!(stats.active_runs.load(ORDERING), 1);

        stats.record_event_applied();
        stats.record_event_applied();
        stats.record_run_end(RunOutcome::Completed, Duration::from_millis(1200));
        assert_eq!(stats.active_runs.load(ORDERING), 0);
        assert_eq!(stats.runs_completed.load(ORDERING), 1);
        assert_eq!(stats.events_applied.load(ORDERING), 2);
    }

    #[test]
    fn test_stats_cancelled() {
        let stats = Stats::new();

        stats.record_run_start();
        stats.record_run_end(RunOutcome::Cancelled, Duration::from_millis(10));
        assert_eq!(stats.runs_cancelled.load(ORDERING), 1);
        assert_eq!(stats.runs_completed.load(ORDERING), 0);
    }

    #[test]
    fn test_stats_playback_time() {
        let stats = Stats::new();

        stats.record_run_start();
        stats.record_run_end(RunOutcome::Completed, Duration::from_millis(100));
        stats.record_run_start();
        stats.record_run_end(RunOutcome::Cancelled, Duration::from_millis(300));

        assert_eq!(stats.avg_playback_ms(), 200.0);
        assert_eq!(stats.snapshot().max_playback_ms, 300);
    }

    #[test]
    fn test_sink_errors() {
        let stats = Stats::new();
        stats.record_sink_error();
        assert_eq!(stats.snapshot().sink_errors, 1);
    }
}
