// Duration Estimator Module
// Estimates how long a human would take to type a message.

use crate::errors::ConfigurationError;
use crate::profile::TypingConfig;
use crate::random::RandomSource;
use crate::timing::{
    is_sentence_terminator, CHARS_PER_WORD, COMMA_PAUSE_MS, MIN_DURATION_MS, SENTENCE_PAUSE_MS,
    THINKING_INTERVAL_CHARS, THINKING_PAUSE_MS,
};
use std::time::Duration;

/// Estimate the total time to type `text`, including punctuation and thinking pauses.
///
/// The result never drops below one second.
pub fn estimate_duration<R: RandomSource + ?Sized>(
    text: &str,
    config: &TypingConfig,
    rng: &mut R,
) -> Result<Duration, ConfigurationError> {
    config.validate()?;

    let char_count = text.chars().count();
    let word_count = char_count as f64 / CHARS_PER_WORD;
    let base_ms = word_count / config.words_per_minute * 60_000.0;

    let jitter = 1.0 + (rng.next() - 0.5) * 2.0 * config.variance_fraction;
    let mut total_ms = base_ms * jitter;

    for c in text.chars() {
        if is_sentence_terminator(c) {
            total_ms += rng.uniform(SENTENCE_PAUSE_MS.start, SENTENCE_PAUSE_MS.end);
        } else if c == ',' {
            total_ms += rng.uniform(COMMA_PAUSE_MS.start, COMMA_PAUSE_MS.end);
        }
    }

    for _ in 0..char_count / THINKING_INTERVAL_CHARS {
        total_ms += rng.uniform(THINKING_PAUSE_MS.start, THINKING_PAUSE_MS.end);
    }

    Ok(Duration::from_millis(
        total_ms.max(MIN_DURATION_MS).round() as u64
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ConstantRandom, SeededRandom, ThreadRandom};

    fn steady() -> TypingConfig {
        TypingConfig::new(55.0, 0.0, 1.0)
    }

    #[test]
    fn test_empty_text_returns_floor() {
        let duration = estimate_duration("", &TypingConfig::default(), &mut ThreadRandom).unwrap();
        assert_eq!(duration, Duration::from_millis(1000));
    }

    #[test]
    fn test_short_text_clamped_to_floor() {
        let duration = estimate_duration("ok", &steady(), &mut ConstantRandom::new(0.5)).unwrap();
        assert_eq!(duration.as_millis(), 1000);
    }

    #[test]
    fn test_hello_world_range() {
        // 13 chars = 2.6 words => ~2836ms, plus one comma and one terminator pause
        for _ in 0..200 {
            let ms = estimate_duration("Hello, world!", &steady(), &mut ThreadRandom)
                .unwrap()
                .as_millis();
            assert!((3436..=3836).contains(&ms), "{}ms out of range", ms);
        }
    }

    #[test]
    fn test_hello_world_bounds_exact() {
        let low = estimate_duration("Hello, world!", &steady(), &mut ConstantRandom::new(0.0))
            .unwrap()
            .as_millis();
        assert_eq!(low, 3436);
    }

    #[test]
    fn test_thinking_pauses_scale_with_length() {
        let text = "a".repeat(100);
        let config = TypingConfig::new(60.0, 0.0, 1.0);
        // 100 chars = 20 words = 20s base, plus two thinking pauses of 750ms at r=0
        let ms = estimate_duration(&text, &config, &mut ConstantRandom::new(0.0))
            .unwrap()
            .as_millis();
        assert_eq!(ms, 21_500);
    }

    #[test]
    fn test_variance_jitter_bounds() {
        let text = "abcdefghij".repeat(4);
        let config = TypingConfig::new(60.0, 0.2, 1.0);
        // base = 8 words at 60wpm = 8000ms, jitter within ±20%
        let low = estimate_duration(&text, &config, &mut ConstantRandom::new(0.0))
            .unwrap()
            .as_millis();
        assert_eq!(low, 6400);
        let high = estimate_duration(&text, &config, &mut ConstantRandom::new(1.0))
            .unwrap()
            .as_millis();
        assert!((9599..=9600).contains(&high), "{}", high);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let text = "Thanks for reaching out! Could you share your order number, please?";
        let config = TypingConfig::default();
        let a = estimate_duration(text, &config, &mut SeededRandom::new(9)).unwrap();
        let b = estimate_duration(text, &config, &mut SeededRandom::new(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TypingConfig::new(55.0, 0.1, 2.0);
        let result = estimate_duration("hi", &config, &mut ThreadRandom);
        assert_eq!(result, Err(ConfigurationError::Accuracy(2.0)));
    }

    #[test]
    fn test_minimum_floor_for_many_inputs() {
        let config = TypingConfig::professional();
        for text in ["", " ", "a", "!", "   \t", "hey"] {
            let duration = estimate_duration(text, &config, &mut ThreadRandom).unwrap();
            assert!(duration >= Duration::from_millis(1000));
        }
    }
}
