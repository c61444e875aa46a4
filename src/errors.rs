// Error Types Module
// Configuration and sink failures raised by the typing simulator.

/// Invalid typing configuration values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("words_per_minute must be a positive finite number, got {0}")]
    WordsPerMinute(f64),
    #[error("variance_fraction must be a non-negative finite number, got {0}")]
    VarianceFraction(f64),
    #[error("accuracy must be between 0.0 and 1.0, got {0}")]
    Accuracy(f64),
    #[error("unknown typing profile: {0}")]
    UnknownProfile(String),
    #[error("hour must be between 0 and 23, got {0}")]
    Hour(u32),
}

/// A failed write of a typing indicator to a sink
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to write typing indicator for {session_key}: {message}")]
pub struct SinkWriteError {
    pub session_key: String,
    pub message: String,
}

impl SinkWriteError {
    pub fn new(session_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
            message: message.into(),
        }
    }
}
