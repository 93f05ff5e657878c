//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{
    engine::{sequence::TIMER_PRESETS_SECS, BreathPreset},
    error::AppError,
    state::{AppState, Command, Feature},
};
use super::responses::{
    ApiResponse, HealthResponse, PresetEntry, SetToggleResponse, StatusResponse, WorkoutResponse,
};

/// Body for features configured by a single duration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecondsRequest {
    pub seconds: u64,
}

/// Body of PUT /train
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkoutRequest {
    pub exercises: Vec<String>,
    pub sets: u32,
    /// Optional new rest time between sets
    #[serde(default)]
    pub rest_seconds: Option<u64>,
}

fn decode<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::InvalidBody(e.to_string()))
}

/// Handle GET /session/:feature - Current snapshot of one session
pub async fn session_handler(
    State(state): State<Arc<AppState>>,
    Path(feature): Path<Feature>,
) -> Result<Json<ApiResponse>, AppError> {
    let snapshot = state.snapshot(feature)?;
    Ok(Json(ApiResponse::ok(feature, "Current session".to_string(), snapshot)))
}

/// Handle POST /session/:feature/:command - Start, toggle, pause, resume, reset or restart
pub async fn command_handler(
    State(state): State<Arc<AppState>>,
    Path((feature, command)): Path<(Feature, Command)>,
) -> Result<Json<ApiResponse>, AppError> {
    let snapshot = state.command(feature, command)?;
    Ok(Json(ApiResponse::ok(
        feature,
        format!("{} {}", feature, command.as_str()),
        snapshot,
    )))
}

/// Handle PUT /session/:feature/config - Replace a session's configuration
pub async fn configure_handler(
    State(state): State<Arc<AppState>>,
    Path(feature): Path<Feature>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ApiResponse>, AppError> {
    let snapshot = match feature {
        Feature::Hiit => state.configure_interval(decode(body)?)?,
        Feature::Breath => state.configure_breath(decode(body)?)?,
        Feature::Timer => state.configure_timer(decode::<SecondsRequest>(body)?.seconds)?,
        Feature::Rest => state.configure_rest(decode::<SecondsRequest>(body)?.seconds)?,
    };
    info!("{} reconfigured", feature);
    Ok(Json(ApiResponse::ok(
        feature,
        format!("{} configured", feature),
        snapshot,
    )))
}

/// Handle GET /timer/presets - Preset durations of the simple timer
pub async fn timer_presets_handler() -> Json<Vec<PresetEntry>> {
    Json(TIMER_PRESETS_SECS.into_iter().map(PresetEntry::new).collect())
}

/// Handle POST /timer/trigger - Start the simple timer from a duration
pub async fn timer_trigger_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SecondsRequest>,
) -> Result<Json<ApiResponse>, AppError> {
    let snapshot = state.trigger_timer(request.seconds)?;
    Ok(Json(ApiResponse::ok(
        Feature::Timer,
        format!("Timer started for {}s", request.seconds),
        snapshot,
    )))
}

/// Handle POST /breath/preset/:name - Switch to a named breathing rhythm
pub async fn breath_preset_handler(
    State(state): State<Arc<AppState>>,
    Path(preset): Path<BreathPreset>,
) -> Result<Json<ApiResponse>, AppError> {
    let snapshot = state.apply_breath_preset(preset)?;
    Ok(Json(ApiResponse::ok(
        Feature::Breath,
        format!("Breathing preset {:?} applied", preset),
        snapshot,
    )))
}

/// Handle GET /train - Workout board and rest timer
pub async fn train_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WorkoutResponse>, AppError> {
    let board = state.workout_board()?;
    let rest = state.snapshot(Feature::Rest)?;
    Ok(Json(WorkoutResponse::new(&board, rest)))
}

/// Handle PUT /train - Replace exercises, set count and optionally rest time
pub async fn train_configure_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WorkoutRequest>,
) -> Result<Json<WorkoutResponse>, AppError> {
    let board = state.configure_workout(request.exercises, request.sets)?;
    let rest = match request.rest_seconds {
        Some(seconds) => state.configure_rest(seconds)?,
        None => state.snapshot(Feature::Rest)?,
    };
    Ok(Json(WorkoutResponse::new(&board, rest)))
}

/// Handle POST /train/:exercise/:set/toggle - Mark a set and restart the rest timer
pub async fn train_toggle_handler(
    State(state): State<Arc<AppState>>,
    Path((exercise, set)): Path<(usize, usize)>,
) -> Result<Json<SetToggleResponse>, AppError> {
    let (done, rest) = state.toggle_set(exercise, set)?;
    Ok(Json(SetToggleResponse {
        exercise,
        set,
        done,
        rest,
    }))
}

/// Handle POST /train/clear - Clear the rest timer back to 00:00
pub async fn train_clear_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, AppError> {
    let snapshot = state.command(Feature::Rest, Command::Reset)?;
    Ok(Json(ApiResponse::ok(
        Feature::Rest,
        "Rest timer cleared".to_string(),
        snapshot,
    )))
}

/// Handle GET /status - Return every session's status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, AppError> {
    let sessions = state.snapshots()?;
    let breath_pattern = state.breath_pattern()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        sessions,
        breath_pattern,
        tick_interval_ms: u64::try_from(state.tick_interval.as_millis()).unwrap_or(u64::MAX),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream phase events as Server-Sent Events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Phase event subscriber connected");
    let rx = state.phase_event_tx.subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(feature_event) => {
                    match Event::default()
                        .event(feature_event.feature.as_str())
                        .json_data(&feature_event)
                    {
                        Ok(event) => return Some((Ok::<Event, Infallible>(event), rx)),
                        Err(e) => warn!("Failed to encode phase event: {}", e),
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
