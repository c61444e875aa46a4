// Application State Module

use super::config::Config;
use crate::random::source_from_seed;
use crate::{
    ConfigurationError, EventGenerator, MemorySink, SharedStats, SimulationDriver, TypingConfig,
    TypingEvent,
};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub config: Config,
    /// Profile used when a request does not bring its own
    pub typing: TypingConfig,
    pub driver: Arc<SimulationDriver>,
    pub sink: Arc<MemorySink>,
    pub stats: SharedStats,
}

impl AppState {
    pub fn new(config: Config, stats: SharedStats) -> Result<Self, ConfigurationError> {
        let typing = config.typing_config()?;
        let driver = SimulationDriver::with_stats(stats.clone())
            .with_time_scale(config.simulation.time_scale);
        Ok(Self {
            config,
            typing,
            driver: Arc::new(driver),
            sink: Arc::new(MemorySink::new()),
            stats,
        })
    }

    /// Generate events with the server defaults filling in whatever the request left out
    pub fn generate(
        &self,
        text: &str,
        typing: Option<TypingConfig>,
        seed: Option<u64>,
        hour: Option<u32>,
    ) -> Result<Vec<TypingEvent>, ConfigurationError> {
        let mut generator = EventGenerator::new(typing.unwrap_or(self.typing))?;
        if let Some(hour) = hour.or(self.config.simulation.hour) {
            if hour > 23 {
                return Err(ConfigurationError::Hour(hour));
            }
            generator = generator.with_hour(hour);
        }
        let mut rng = source_from_seed(seed.or(self.config.simulation.seed));
        Ok(generator.generate(text, &mut rng))
    }
}
