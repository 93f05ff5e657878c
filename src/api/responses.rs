//! API response structures

use std::collections::BTreeMap;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    engine::{BreathPattern, SequenceSnapshot},
    error::AppError,
    state::{Feature, WorkoutBoard},
    utils::format_clock,
};

/// API response structure for session endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub feature: Feature,
    pub session: SequenceSnapshot,
}

impl ApiResponse {
    /// Create a successful session response
    pub fn ok(feature: Feature, message: String, session: SequenceSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            feature,
            session,
        }
    }
}

/// Status of every session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub sessions: BTreeMap<Feature, SequenceSnapshot>,
    pub breath_pattern: BreathPattern,
    pub tick_interval_ms: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// One simple-timer preset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetEntry {
    pub seconds: u64,
    pub display: String,
}

impl PresetEntry {
    pub fn new(seconds: u64) -> Self {
        Self {
            seconds,
            display: format_clock(seconds * 1_000),
        }
    }
}

/// A row of the workout board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRow {
    pub name: String,
    pub done: Vec<bool>,
}

/// Workout board plus the rest timer it drives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutResponse {
    pub exercises: Vec<ExerciseRow>,
    pub sets: u32,
    pub completed_sets: usize,
    pub rest: SequenceSnapshot,
}

impl WorkoutResponse {
    pub fn new(board: &WorkoutBoard, rest: SequenceSnapshot) -> Self {
        Self {
            exercises: board
                .rows()
                .map(|(name, done)| ExerciseRow {
                    name: name.to_string(),
                    done: done.to_vec(),
                })
                .collect(),
            sets: board.sets(),
            completed_sets: board.completed_sets(),
            rest,
        }
    }
}

/// Result of toggling one set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetToggleResponse {
    pub exercise: usize,
    pub set: usize,
    pub done: bool,
    pub rest: SequenceSnapshot,
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = match &self {
            AppError::Config(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownSet { .. } => StatusCode::NOT_FOUND,
            AppError::Lock { .. } => {
                error!("Request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.to_string(),
            timestamp: Utc::now(),
        };
        (code, Json(body)).into_response()
    }
}
