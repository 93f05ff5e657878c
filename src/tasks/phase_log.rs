//! Phase event logging task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::{engine::PhaseEvent, state::AppState};

/// Background task that logs every phase transition
pub async fn phase_log_task(state: Arc<AppState>) {
    info!("Starting phase event log");

    let mut events = state.phase_event_tx.subscribe();

    loop {
        match events.recv().await {
            Ok(feature_event) => match feature_event.event {
                PhaseEvent::Completed { phase, round } => {
                    info!("{}: {} complete (round {})", feature_event.feature, phase, round);
                }
                PhaseEvent::Entered { phase, round } => {
                    debug!("{}: entered {} (round {})", feature_event.feature, phase, round);
                }
            },
            Err(RecvError::Lagged(skipped)) => {
                warn!("Phase log fell behind, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Phase event channel closed, stopping log");
                return;
            }
        }
    }
}
