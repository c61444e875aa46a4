// API Types Module
// Request and response bodies for the HTTP endpoints.

use crate::{RunState, TypingConfig, TypingEvent, TypingIndicator};
use serde::{Deserialize, Serialize};

/// Longest message accepted by the API, in characters
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Body of `POST /v1/estimate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub text: String,
    #[serde(default)]
    pub config: Option<TypingConfig>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub duration_ms: u64,
    pub characters: usize,
}

/// Body of `POST /v1/events`, `POST /v1/preview` and `POST /v1/sessions/{key}/simulate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    #[serde(default)]
    pub config: Option<TypingConfig>,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Hour of day for the speed multiplier
    #[serde(default)]
    pub hour: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<TypingEvent>,
    pub total_delay_ms: u64,
    pub typo_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateResponse {
    pub run_id: String,
    pub session_key: String,
    pub event_count: usize,
    pub total_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_key: String,
    pub state: Option<RunState>,
    pub indicator: Option<TypingIndicator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub session_key: String,
    pub cancelled: bool,
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                error_type: error_type.into(),
            },
        }
    }
}
