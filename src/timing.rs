// Timing Constants Module
// Pause ranges and time-of-day speed bands shared by the estimator and the generator.

use std::ops::Range;

/// Standard typing-speed convention
pub const CHARS_PER_WORD: f64 = 5.0;

/// Pause after `.`, `!` or `?`
pub const SENTENCE_PAUSE_MS: Range<f64> = 400.0..700.0;

/// Pause after `,`
pub const COMMA_PAUSE_MS: Range<f64> = 200.0..300.0;

/// Extra delay on a space
pub const SPACE_PAUSE_MS: Range<f64> = 50.0..150.0;

/// Idle gap mimicking the typist stopping to think
pub const THINKING_PAUSE_MS: Range<f64> = 750.0..2000.0;

/// Characters between thinking pauses
pub const THINKING_INTERVAL_CHARS: usize = 50;

/// Chance of a thinking pause once the interval has elapsed
pub const THINKING_PAUSE_PROBABILITY: f64 = 0.3;

/// Time taken to notice a typo
pub const TYPO_NOTICE_MS: Range<f64> = 200.0..300.0;

/// Delay of the correcting backspace
pub const BACKSPACE_MS: Range<f64> = 50.0..80.0;

/// Floor for any duration estimate
pub const MIN_DURATION_MS: f64 = 1000.0;

pub fn is_sentence_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Speed multiplier for the local hour of day.
///
/// A larger multiplier means faster typing; the per-character delay is divided by it.
pub fn speed_multiplier(hour: u32) -> f64 {
    match hour {
        6..=9 => 0.85,
        10..=13 => 1.1,
        14..=17 => 1.0,
        18..=21 => 0.9,
        _ => 0.8,
    }
}

/// Pause attached to a character on top of its base delay
pub fn punctuation_pause(c: char) -> Option<Range<f64>> {
    if is_sentence_terminator(c) {
        Some(SENTENCE_PAUSE_MS)
    } else if c == ',' {
        Some(COMMA_PAUSE_MS)
    } else if c == ' ' {
        Some(SPACE_PAUSE_MS)
    } else {
        None
    }
}
