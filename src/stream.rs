// Preview Streaming Module
// Plays typing events back in real time as a stream of indicator frames.

use crate::events::{TypingBuffer, TypingEvent};
use crate::sink::TypingIndicator;
use async_stream::stream;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;

/// A single step of playback: the event just applied and the resulting indicator
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame {
    pub event: TypingEvent,
    pub indicator: TypingIndicator,
}

/// Plays a generated event sequence, waiting out each delay before applying the event
pub struct PreviewStream {
    events: Vec<TypingEvent>,
    /// Multiplier on every delay (0.0 plays instantly)
    time_scale: f64,
}

impl PreviewStream {
    pub fn new(events: Vec<TypingEvent>) -> Self {
        Self {
            events,
            time_scale: 1.0,
        }
    }

    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale.max(0.0);
        self
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Stream of frames; dropping the stream aborts playback mid-delay
    pub fn into_stream(self) -> Pin<Box<dyn Stream<Item = PreviewFrame> + Send>> {
        let events = self.events;
        let time_scale = self.time_scale;

        Box::pin(stream! {
            let mut buffer = TypingBuffer::new();
            for event in events {
                let delay = scaled_delay(event.delay_ms, time_scale);
                if !delay.is_zero() {
                    sleep(delay).await;
                }

                buffer.apply(event.keystroke);
                yield PreviewFrame {
                    event,
                    indicator: TypingIndicator::typing(buffer.as_str(), buffer.len()),
                };
            }
        })
    }
}

fn scaled_delay(delay_ms: u64, time_scale: f64) -> Duration {
    if time_scale == 1.0 {
        Duration::from_millis(delay_ms)
    } else {
        Duration::from_micros((delay_ms as f64 * time_scale * 1000.0).round() as u64)
    }
}

/// Format an indicator as a Server-Sent Event
pub fn format_sse(indicator: &TypingIndicator) -> String {
    let json = serde_json::to_string(indicator).unwrap_or_else(|_| "{}".to_string());
    format!("data: {}\n\n", json)
}
