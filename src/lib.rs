//! # Typesim - Typing Simulator
//!
//! Simulates a human typing a chat reply so a live "typing indicator" can
//! show believable progress: realistic per-keystroke timing, punctuation and
//! thinking pauses, and typos that get noticed and corrected.
//!
//! ## Features
//!
//! - Duration estimates for a message at a given typing speed
//! - Keystroke event generation with QWERTY-neighbour typos
//! - Time-of-day speed adjustment
//! - Playback into a typing-indicator sink with per-session cancellation
//! - Injectable randomness for reproducible output
//!
//! ## Usage
//!
//! ### As a CLI
//!
//! ```bash
//! typesim estimate "Thanks for waiting, let me check that for you."
//! typesim serve --port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use typesim::{
//!     estimate_duration, generate_events, MemorySink, SeededRandom, SimulationDriver,
//!     TypingConfig,
//! };
//!
//! # async fn demo() -> Result<(), typesim::ConfigurationError> {
//! let config = TypingConfig::default();
//! let mut rng = SeededRandom::new(7);
//!
//! let estimate = estimate_duration("Hello, world!", &config, &mut rng)?;
//! let events = generate_events("Hello, world!", &config, &mut rng)?;
//!
//! let driver = Arc::new(SimulationDriver::new());
//! let sink = Arc::new(MemorySink::new());
//! driver.run("conversation-1:agent-7", events, sink.clone()).await;
//! # let _ = estimate;
//! # Ok(())
//! # }
//! ```

// Core library modules
pub mod driver;
pub mod errors;
pub mod estimate;
pub mod events;
pub mod generator;
pub mod keyboard;
pub mod profile;
pub mod random;
pub mod sink;
pub mod stats;
pub mod stream;
pub mod timing;

// CLI module (for `typesim serve` command)
pub mod cli;

// Re-export commonly used types
pub use driver::{RunHandle, RunState, RunStatus, SimulationDriver};
pub use errors::{ConfigurationError, SinkWriteError};
pub use estimate::estimate_duration;
pub use events::{replay, Keystroke, TypingBuffer, TypingEvent};
pub use generator::{generate_events, EventGenerator};
pub use profile::TypingConfig;
pub use random::{ConstantRandom, RandomSource, SeededRandom, ThreadRandom};
pub use sink::{MemorySink, SessionKey, TracingSink, TypingIndicator, TypingSink};
pub use stats::{new_shared_stats, SharedStats, Stats, StatsSnapshot};
pub use stream::{PreviewFrame, PreviewStream};
