// HTTP Handlers Module
// Implements the estimate, event generation, preview and session endpoints.

use super::state::AppState;
use super::types::{
    CancelResponse, ErrorResponse, EstimateRequest, EstimateResponse, EventsResponse,
    GenerateRequest, SessionResponse, SimulateResponse, MAX_TEXT_CHARS,
};
use crate::events::total_delay_ms;
use crate::random::source_from_seed;
use crate::stream::format_sse;
use crate::{
    estimate_duration, ConfigurationError, Keystroke, PreviewStream, SessionKey, TypingIndicator,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use std::sync::Arc;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "typesim"
    }))
}

/// GET /typesim/stats - Get simulation statistics
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.stats.snapshot())
}

/// POST /v1/estimate
pub async fn estimate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    check_text(&request.text)?;
    let typing = request.config.unwrap_or(state.typing);
    let mut rng = source_from_seed(request.seed.or(state.config.simulation.seed));
    let duration = estimate_duration(&request.text, &typing, &mut rng)?;

    tracing::debug!(
        characters = request.text.chars().count(),
        duration_ms = duration.as_millis() as u64,
        "Estimated typing duration"
    );

    Ok(Json(EstimateResponse {
        duration_ms: duration.as_millis() as u64,
        characters: request.text.chars().count(),
    }))
}

/// POST /v1/events
pub async fn events(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<EventsResponse>, AppError> {
    check_text(&request.text)?;
    let events = state.generate(&request.text, request.config, request.seed, request.hour)?;
    let typo_count = events
        .iter()
        .filter(|e| e.keystroke == Keystroke::Backspace)
        .count();

    Ok(Json(EventsResponse {
        total_delay_ms: total_delay_ms(&events),
        typo_count,
        events,
    }))
}

/// POST /v1/preview - stream indicator frames as Server-Sent Events
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response, AppError> {
    check_text(&request.text)?;
    let events = state.generate(&request.text, request.config, request.seed, request.hour)?;

    tracing::info!(events = events.len(), "Streaming typing preview");

    let frames = PreviewStream::new(events)
        .with_time_scale(state.config.simulation.time_scale)
        .into_stream()
        .map(|frame| format_sse(&frame.indicator))
        .chain(futures::stream::once(async {
            format_sse(&TypingIndicator::idle())
        }))
        .chain(futures::stream::once(async { "data: [DONE]\n\n".to_string() }));

    let body = Body::from_stream(frames.map(Ok::<_, std::io::Error>));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(body)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// POST /v1/sessions/{key}/simulate - start playback into the session's typing indicator
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response, AppError> {
    check_text(&request.text)?;
    let events = state.generate(&request.text, request.config, request.seed, request.hour)?;
    let event_count = events.len();
    let total = total_delay_ms(&events);

    let handle = state
        .driver
        .start(SessionKey::new(key), events, state.sink.clone());

    tracing::info!(
        session = %handle.session_key,
        run_id = %handle.id,
        events = event_count,
        "Simulation started"
    );

    let body = SimulateResponse {
        run_id: handle.id.to_string(),
        session_key: handle.session_key.to_string(),
        event_count,
        total_delay_ms: total,
    };
    Ok((StatusCode::ACCEPTED, Json(body)).into_response())
}

/// GET /v1/sessions/{key}
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_key = SessionKey::new(key);
    let run_state = state.driver.state(&session_key);
    let indicator = state.sink.get(&session_key);

    if run_state.is_none() && indicator.is_none() {
        return Err(AppError::NotFound(format!(
            "No typing session '{}'",
            session_key
        )));
    }

    Ok(Json(SessionResponse {
        session_key: session_key.to_string(),
        state: run_state,
        indicator,
    }))
}

/// DELETE /v1/sessions/{key}
pub async fn cancel_session(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let session_key = SessionKey::new(key);
    let cancelled = state.driver.cancel(&session_key);
    Json(CancelResponse {
        session_key: session_key.to_string(),
        cancelled,
    })
}

fn check_text(text: &str) -> Result<(), AppError> {
    let len = text.chars().count();
    if len > MAX_TEXT_CHARS {
        return Err(AppError::BadRequest(format!(
            "text is {} characters, the limit is {}",
            len, MAX_TEXT_CHARS
        )));
    }
    Ok(())
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<ConfigurationError> for AppError {
    fn from(err: ConfigurationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(msg, "not_found_error"),
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(msg, "invalid_request_error"),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(msg, "internal_error"),
            ),
        };

        let mut response = Json(error_response).into_response();
        *response.status_mut() = status;
        response
    }
}
