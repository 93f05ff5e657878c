//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/session/:feature", get(session_handler))
        .route("/session/:feature/config", put(configure_handler))
        .route("/session/:feature/:command", post(command_handler))
        .route("/timer/presets", get(timer_presets_handler))
        .route("/timer/trigger", post(timer_trigger_handler))
        .route("/breath/preset/:name", post(breath_preset_handler))
        .route("/train", get(train_handler).put(train_configure_handler))
        .route("/train/clear", post(train_clear_handler))
        .route("/train/:exercise/:set/toggle", post(train_toggle_handler))
        .route("/events", get(events_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
