// Typing Profiles Module
// Defines typing speed, jitter and accuracy settings for simulated operators.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Typing profile for simulating a human operator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Target average speed in words per minute (5 characters per word)
    pub words_per_minute: f64,
    /// Fractional jitter applied per character (0.15 = ±15%)
    pub variance_fraction: f64,
    /// Probability that a character is typed correctly on the first attempt
    pub accuracy: f64,
}

impl TypingConfig {
    /// Create a new typing profile with custom values
    pub fn new(words_per_minute: f64, variance_fraction: f64, accuracy: f64) -> Self {
        Self {
            words_per_minute,
            variance_fraction,
            accuracy,
        }
    }

    /// Slow two-finger typist
    pub fn hunt_and_peck() -> Self {
        Self::new(25.0, 0.25, 0.92)
    }

    /// Typical support agent
    pub fn average() -> Self {
        Self::new(55.0, 0.15, 0.97)
    }

    /// Practised touch typist
    pub fn fast() -> Self {
        Self::new(80.0, 0.10, 0.985)
    }

    /// Professional typist, almost no mistakes
    pub fn professional() -> Self {
        Self::new(110.0, 0.08, 0.995)
    }

    /// Resolve a named profile
    pub fn from_name(name: &str) -> Result<Self, ConfigurationError> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "hunt-and-peck" | "slow" => Ok(Self::hunt_and_peck()),
            "average" | "default" => Ok(Self::average()),
            "fast" => Ok(Self::fast()),
            "professional" | "pro" => Ok(Self::professional()),
            _ => Err(ConfigurationError::UnknownProfile(name.to_string())),
        }
    }

    /// Builder pattern methods
    pub fn with_words_per_minute(mut self, wpm: f64) -> Self {
        self.words_per_minute = wpm.max(1.0);
        self
    }

    pub fn with_variance_fraction(mut self, variance: f64) -> Self {
        self.variance_fraction = variance.max(0.0);
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy.clamp(0.0, 1.0);
        self
    }

    /// Check that every field is within its allowed range
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.words_per_minute.is_finite() || self.words_per_minute <= 0.0 {
            return Err(ConfigurationError::WordsPerMinute(self.words_per_minute));
        }
        if !self.variance_fraction.is_finite() || self.variance_fraction < 0.0 {
            return Err(ConfigurationError::VarianceFraction(
                self.variance_fraction,
            ));
        }
        if !(0.0..=1.0).contains(&self.accuracy) {
            return Err(ConfigurationError::Accuracy(self.accuracy));
        }
        Ok(())
    }

    /// Milliseconds per character at the configured speed
    pub fn base_delay_per_char_ms(&self) -> f64 {
        60_000.0 / (self.words_per_minute * crate::timing::CHARS_PER_WORD)
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self::average()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let config = TypingConfig::default();
        assert_eq!(config.words_per_minute, 55.0);
        assert_eq!(config.variance_fraction, 0.15);
        assert_eq!(config.accuracy, 0.97);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_ordering() {
        let slow = TypingConfig::hunt_and_peck();
        let fast = TypingConfig::fast();
        let pro = TypingConfig::professional();
        assert!(slow.words_per_minute < fast.words_per_minute);
        assert!(fast.words_per_minute < pro.words_per_minute);
        assert!(slow.accuracy < pro.accuracy);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            TypingConfig::from_name("hunt_and_peck").unwrap(),
            TypingConfig::hunt_and_peck()
        );
        assert_eq!(
            TypingConfig::from_name("Professional").unwrap(),
            TypingConfig::professional()
        );
        assert!(matches!(
            TypingConfig::from_name("turbo"),
            Err(ConfigurationError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_builder_clamps_values() {
        let config = TypingConfig::default()
            .with_accuracy(1.4)
            .with_variance_fraction(-0.2)
            .with_words_per_minute(0.0);
        assert_eq!(config.accuracy, 1.0);
        assert_eq!(config.variance_fraction, 0.0);
        assert_eq!(config.words_per_minute, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            TypingConfig::new(-5.0, 0.1, 0.9).validate(),
            Err(ConfigurationError::WordsPerMinute(-5.0))
        );
        assert_eq!(
            TypingConfig::new(50.0, -0.1, 0.9).validate(),
            Err(ConfigurationError::VarianceFraction(-0.1))
        );
        assert_eq!(
            TypingConfig::new(50.0, 0.1, 1.5).validate(),
            Err(ConfigurationError::Accuracy(1.5))
        );
        assert!(TypingConfig::new(f64::NAN, 0.1, 0.9).validate().is_err());
    }

    #[test]
    fn test_base_delay_per_char() {
        let config = TypingConfig::new(60.0, 0.0, 1.0);
        // 60 wpm = 300 chars/min = 200ms per char
        assert_eq!(config.base_delay_per_char_ms(), 200.0);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TypingConfig = serde_json::from_str(r#"{"words_per_minute": 70}"#).unwrap();
        assert_eq!(config.words_per_minute, 70.0);
        assert_eq!(config.accuracy, 0.97);
    }
}
