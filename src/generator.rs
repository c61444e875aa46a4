// Keystroke Generator Module
// Expands a message into timed keystroke events with typos and thinking pauses.

use crate::errors::ConfigurationError;
use crate::events::{Keystroke, TypingEvent};
use crate::keyboard::nearby_key;
use crate::profile::TypingConfig;
use crate::random::RandomSource;
use crate::timing::{
    punctuation_pause, speed_multiplier, BACKSPACE_MS, THINKING_INTERVAL_CHARS,
    THINKING_PAUSE_MS, THINKING_PAUSE_PROBABILITY, TYPO_NOTICE_MS,
};
use chrono::Timelike;
use std::ops::Range;

/// Generates keystroke events for a typing profile
#[derive(Debug, Clone)]
pub struct EventGenerator {
    config: TypingConfig,
    /// Fixed hour of day; the local clock is read when unset
    hour: Option<u32>,
}

impl EventGenerator {
    pub fn new(config: TypingConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config, hour: None })
    }

    /// Pin the hour of day used for the speed multiplier. Hours past 23 wrap around.
    pub fn with_hour(mut self, hour: u32) -> Self {
        self.hour = Some(hour % 24);
        self
    }

    pub fn config(&self) -> &TypingConfig {
        &self.config
    }

    fn current_hour(&self) -> u32 {
        self.hour.unwrap_or_else(|| chrono::Local::now().hour())
    }

    /// Per-character delay after the time-of-day adjustment
    pub fn adjusted_base_delay_ms(&self) -> f64 {
        self.config.base_delay_per_char_ms() / speed_multiplier(self.current_hour())
    }

    /// Expand `text` into an ordered event sequence.
    ///
    /// Replaying the result from an empty buffer yields exactly `text`.
    pub fn generate<R: RandomSource + ?Sized>(&self, text: &str, rng: &mut R) -> Vec<TypingEvent> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut events = Vec::with_capacity(len + len / 8);
        if len == 0 {
            return events;
        }

        let base_delay = self.adjusted_base_delay_ms();
        let mut cursor = 0usize;
        let mut since_pause = 0usize;

        for (i, &c) in chars.iter().enumerate() {
            let mut delay = base_delay * (1.0 + (rng.next() - 0.5) * self.config.variance_fraction);
            if let Some(pause) = punctuation_pause(c) {
                delay += sample(rng, pause);
            }
            let delay = delay.max(0.0).round() as u64;

            if since_pause > THINKING_INTERVAL_CHARS && rng.chance(THINKING_PAUSE_PROBABILITY) {
                events.push(TypingEvent::new(
                    Keystroke::Pause,
                    sample(rng, THINKING_PAUSE_MS).round() as u64,
                    cursor,
                ));
                since_pause = 0;
            }

            // Neither the first nor the last character is ever mistyped.
            if i > 0 && i < len - 1 && rng.next() >= self.config.accuracy {
                if let Some(typo) = nearby_key(c, rng) {
                    events.push(TypingEvent::new(Keystroke::Insert(typo), delay, cursor + 1));
                    events.push(TypingEvent::new(
                        Keystroke::Pause,
                        sample(rng, TYPO_NOTICE_MS).round() as u64,
                        cursor + 1,
                    ));
                    events.push(TypingEvent::new(
                        Keystroke::Backspace,
                        sample(rng, BACKSPACE_MS).round() as u64,
                        cursor,
                    ));
                }
            }

            cursor += 1;
            events.push(TypingEvent::new(Keystroke::Insert(c), delay, cursor));
            since_pause += 1;
        }

        events
    }
}

impl Default for EventGenerator {
    fn default() -> Self {
        Self {
            config: TypingConfig::default(),
            hour: None,
        }
    }
}

fn sample<R: RandomSource + ?Sized>(rng: &mut R, range: Range<f64>) -> f64 {
    rng.uniform(range.start, range.end)
}

/// Generate events for `text` using the local clock for the speed multiplier
pub fn generate_events<R: RandomSource + ?Sized>(
    text: &str,
    config: &TypingConfig,
    rng: &mut R,
) -> Result<Vec<TypingEvent>, ConfigurationError> {
    Ok(EventGenerator::new(*config)?.generate(text, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{replay, TypingBuffer};
    use crate::random::{ConstantRandom, SeededRandom, ThreadRandom};

    const SAMPLE: &str = "Hi there! Thanks for waiting, I've checked your order and it shipped \
                          this morning. You should get a tracking email shortly, okay?";

    fn generator(config: TypingConfig) -> EventGenerator {
        EventGenerator::new(config).unwrap().with_hour(15)
    }

    fn typo_count(events: &[TypingEvent]) -> usize {
        events
            .iter()
            .filter(|e| e.keystroke == Keystroke::Backspace)
            .count()
    }

    #[test]
    fn test_empty_text() {
        let events = generator(TypingConfig::default()).generate("", &mut ThreadRandom);
        assert!(events.is_empty());
    }

    #[test]
    fn test_round_trip_reconstruction() {
        let config = TypingConfig::new(55.0, 0.15, 0.6);
        let inputs = [
            "",
            " ",
            "   ",
            "a",
            "ok",
            "Hello, world!",
            "Wait... what?!",
            "Ünïcödé and emoji 🎉 work too",
            SAMPLE,
        ];
        for input in inputs {
            for seed in 0..20 {
                let events = generator(config).generate(input, &mut SeededRandom::new(seed));
                assert_eq!(replay(&events), input, "seed {}", seed);
            }
        }
    }

    #[test]
    fn test_buffer_length_stays_in_bounds() {
        let config = TypingConfig::new(55.0, 0.15, 0.0);
        let events = generator(config).generate(SAMPLE, &mut ThreadRandom);
        let max = SAMPLE.chars().count();
        let mut buffer = TypingBuffer::new();
        for event in &events {
            assert!(buffer.apply(event.keystroke), "unmatched backspace");
            assert!(buffer.len() <= max);
            assert_eq!(buffer.len(), event.cursor_position);
        }
    }

    #[test]
    fn test_deterministic_with_fixed_randomness() {
        let gen = generator(TypingConfig::new(55.0, 0.15, 0.8));
        let a = gen.generate(SAMPLE, &mut SeededRandom::new(3));
        let b = gen.generate(SAMPLE, &mut SeededRandom::new(3));
        assert_eq!(a, b);

        let c = gen.generate(SAMPLE, &mut ConstantRandom::new(0.4));
        let d = gen.generate(SAMPLE, &mut ConstantRandom::new(0.4));
        assert_eq!(c, d);
    }

    #[test]
    fn test_single_character_never_mistyped() {
        let gen = generator(TypingConfig::new(55.0, 0.15, 0.0));
        for _ in 0..200 {
            let events = gen.generate("k", &mut ThreadRandom);
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].keystroke, Keystroke::Insert('k'));
        }
    }

    #[test]
    fn test_first_and_last_characters_never_mistyped() {
        // accuracy 0 with r=0.5 mistypes every eligible letter
        let gen = generator(TypingConfig::new(55.0, 0.0, 0.0));
        let events = gen.generate("abc", &mut ConstantRandom::new(0.5));
        let keys: Vec<Keystroke> = events.iter().map(|e| e.keystroke).collect();
        assert_eq!(
            keys,
            vec![
                Keystroke::Insert('a'),
                Keystroke::Insert(nearby_key('b', &mut ConstantRandom::new(0.5)).unwrap()),
                Keystroke::Pause,
                Keystroke::Backspace,
                Keystroke::Insert('b'),
                Keystroke::Insert('c'),
            ]
        );
    }

    #[test]
    fn test_typo_triplet_shape() {
        let gen = generator(TypingConfig::new(60.0, 0.0, 0.0));
        let events = gen.generate("aBc", &mut ConstantRandom::new(0.0));
        // typo keeps the case of the original character
        assert_eq!(events[1].keystroke, Keystroke::Insert('V'));
        assert_eq!(events[1].cursor_position, 2);
        assert_eq!(events[2].keystroke, Keystroke::Pause);
        assert_eq!(events[2].delay_ms, 200);
        assert_eq!(events[3].keystroke, Keystroke::Backspace);
        assert_eq!(events[3].delay_ms, 50);
        assert_eq!(events[3].cursor_position, 1);
        assert_eq!(events[4].keystroke, Keystroke::Insert('B'));
        assert_eq!(events[4].cursor_position, 2);
        assert_eq!(events[1].delay_ms, events[4].delay_ms);
    }

    #[test]
    fn test_no_typos_with_perfect_accuracy() {
        let gen = generator(TypingConfig::new(55.0, 0.15, 1.0));
        let events = gen.generate(SAMPLE, &mut ThreadRandom);
        assert_eq!(typo_count(&events), 0);
    }

    #[test]
    fn test_symbols_without_neighbors_are_not_mistyped() {
        let gen = generator(TypingConfig::new(55.0, 0.0, 0.0));
        let events = gen.generate("1234", &mut ConstantRandom::new(0.5));
        assert_eq!(typo_count(&events), 0);
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_base_delay_and_punctuation_pauses() {
        // 60 wpm = 200ms per char, 14:00-18:00 multiplier 1.0, r=0 picks the low end of each range
        let gen = generator(TypingConfig::new(60.0, 0.0, 1.0));
        let events = gen.generate("a, b.", &mut ConstantRandom::new(0.0));
        let delays: Vec<u64> = events.iter().map(|e| e.delay_ms).collect();
        assert_eq!(delays, vec![200, 400, 250, 200, 600]);
    }

    #[test]
    fn test_time_of_day_multiplier() {
        let config = TypingConfig::new(60.0, 0.0, 1.0);
        let morning = EventGenerator::new(config).unwrap().with_hour(7);
        let midday = EventGenerator::new(config).unwrap().with_hour(11);
        let night = EventGenerator::new(config).unwrap().with_hour(2);

        assert!((morning.adjusted_base_delay_ms() - 200.0 / 0.85).abs() < 1e-9);
        assert!((midday.adjusted_base_delay_ms() - 200.0 / 1.1).abs() < 1e-9);
        assert!((night.adjusted_base_delay_ms() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_thinking_pause_after_interval() {
        // r=0 always passes the Bernoulli draw, so a pause follows every 51 typed characters
        let text = "x".repeat(120);
        let gen = generator(TypingConfig::new(60.0, 0.0, 1.0));
        let events = gen.generate(&text, &mut ConstantRandom::new(0.0));
        let pauses: Vec<(usize, &TypingEvent)> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_pause())
            .collect();
        assert_eq!(pauses.len(), 2);
        assert_eq!(pauses[0].0, 51);
        assert_eq!(pauses[0].1.delay_ms, 750);
        assert_eq!(pauses[0].1.cursor_position, 51);
        assert_eq!(replay(&events), text);
    }

    #[test]
    fn test_no_thinking_pause_when_draw_fails() {
        let text = "x".repeat(120);
        let gen = generator(TypingConfig::new(60.0, 0.0, 1.0));
        let events = gen.generate(&text, &mut ConstantRandom::new(0.9));
        assert!(events.iter().all(|e| !e.is_pause()));
        assert_eq!(events.len(), 120);
    }

    #[test]
    fn test_generate_events_validates() {
        let result = generate_events("hi", &TypingConfig::new(0.0, 0.1, 0.9), &mut ThreadRandom);
        assert_eq!(result, Err(ConfigurationError::WordsPerMinute(0.0)));
    }

    #[test]
    fn test_low_accuracy_produces_typos() {
        let gen = generator(TypingConfig::new(55.0, 0.15, 0.5));
        let events = gen.generate(SAMPLE, &mut SeededRandom::new(11));
        assert!(typo_count(&events) > 0);
        assert_eq!(replay(&events), SAMPLE);
    }
}
