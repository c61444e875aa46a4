// Typing Events Module
// Keystroke events produced by the generator and the buffer that replays them.

use serde::{Deserialize, Serialize};

/// Sentinel used in the textual form of a backspace keystroke
pub const BACKSPACE: char = '\u{8}';

/// What a single event does to the preview buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "character", rename_all = "snake_case")]
pub enum Keystroke {
    /// Append a character
    Insert(char),
    /// Idle gap, buffer unchanged
    Pause,
    /// Delete the last character
    Backspace,
}

impl Keystroke {
    /// Textual form: the character, `""` for a pause, the backspace sentinel for a deletion
    pub fn character(&self) -> String {
        match self {
            Keystroke::Insert(c) => c.to_string(),
            Keystroke::Pause => String::new(),
            Keystroke::Backspace => BACKSPACE.to_string(),
        }
    }

    /// Parse the textual form back into a keystroke
    pub fn from_character(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Some(Keystroke::Pause),
            (Some(BACKSPACE), None) => Some(Keystroke::Backspace),
            (Some(c), None) => Some(Keystroke::Insert(c)),
            _ => None,
        }
    }
}

/// One unit of emission in a typing simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingEvent {
    #[serde(flatten)]
    pub keystroke: Keystroke,
    /// Milliseconds to wait before applying this event
    pub delay_ms: u64,
    /// Buffer position once this event is applied
    pub cursor_position: usize,
}

impl TypingEvent {
    pub fn new(keystroke: Keystroke, delay_ms: u64, cursor_position: usize) -> Self {
        Self {
            keystroke,
            delay_ms,
            cursor_position,
        }
    }

    pub fn is_pause(&self) -> bool {
        self.keystroke == Keystroke::Pause
    }
}

/// Accumulating preview text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingBuffer {
    text: String,
    len: usize,
}

impl TypingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a keystroke. Returns false for a backspace on an empty buffer.
    pub fn apply(&mut self, keystroke: Keystroke) -> bool {
        match keystroke {
            Keystroke::Insert(c) => {
                self.text.push(c);
                self.len += 1;
                true
            }
            Keystroke::Pause => true,
            Keystroke::Backspace => {
                if self.text.pop().is_some() {
                    self.len -= 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Replay a whole event sequence from an empty buffer
pub fn replay(events: &[TypingEvent]) -> String {
    let mut buffer = TypingBuffer::new();
    for event in events {
        buffer.apply(event.keystroke);
    }
    buffer.into_string()
}

/// Total of all event delays in milliseconds
pub fn total_delay_ms(events: &[TypingEvent]) -> u64 {
    events.iter().map(|e| e.delay_ms).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_apply() {
        let mut buffer = TypingBuffer::new();
        assert!(buffer.apply(Keystroke::Insert('h')));
        assert!(buffer.apply(Keystroke::Insert('é')));
        assert!(buffer.apply(Keystroke::Pause));
        assert_eq!(buffer.as_str(), "hé");
        assert_eq!(buffer.len(), 2);

        assert!(buffer.apply(Keystroke::Backspace));
        assert_eq!(buffer.as_str(), "h");
        assert!(buffer.apply(Keystroke::Backspace));
        assert!(buffer.is_empty());
        assert!(!buffer.apply(Keystroke::Backspace));
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_replay_with_correction() {
        let events = vec![
            TypingEvent::new(Keystroke::Insert('h'), 100, 1),
            TypingEvent::new(Keystroke::Insert('w'), 100, 2),
            TypingEvent::new(Keystroke::Pause, 250, 2),
            TypingEvent::new(Keystroke::Backspace, 60, 1),
            TypingEvent::new(Keystroke::Insert('i'), 100, 2),
        ];
        assert_eq!(replay(&events), "hi");
        assert_eq!(total_delay_ms(&events), 610);
    }

    #[test]
    fn test_character_form() {
        assert_eq!(Keystroke::Insert('x').character(), "x");
        assert_eq!(Keystroke::Pause.character(), "");
        assert_eq!(Keystroke::Backspace.character(), "\u{8}");

        assert_eq!(Keystroke::from_character(""), Some(Keystroke::Pause));
        assert_eq!(Keystroke::from_character("\u{8}"), Some(Keystroke::Backspace));
        assert_eq!(Keystroke::from_character("q"), Some(Keystroke::Insert('q')));
        assert_eq!(Keystroke::from_character("qq"), None);
    }

    #[test]
    fn test_event_serialization() {
        let event = TypingEvent::new(Keystroke::Insert('a'), 120, 3);
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["kind"], "insert");
        assert_eq!(json["character"], "a");
        assert_eq!(json["delay_ms"], 120);
        assert_eq!(json["cursor_position"], 3);

        let pause = serde_json::to_value(TypingEvent::new(Keystroke::Pause, 900, 3)).unwrap();
        assert_eq!(pause["kind"], "pause");
        assert!(pause.get("character").is_none());
    }
}
