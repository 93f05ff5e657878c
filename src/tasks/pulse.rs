//! Scheduling pulse background task

use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that pulses every running session.
///
/// It is the only caller of `tick` and parks on the command channel while
/// nothing is running, so paused or finished sessions cost nothing and no
/// second pulse can ever stack up behind a reconfiguration.
pub async fn pulse_task(state: Arc<AppState>) {
    info!("Starting scheduling pulse every {:?}", state.tick_interval);

    let mut pulse_rx = state.pulse_tx.subscribe();

    loop {
        let _ = pulse_rx.borrow_and_update();

        if !state.any_running() {
            debug!("No session running, pulse idle");
            if pulse_rx.changed().await.is_err() {
                info!("Command channel closed, stopping pulse");
                return;
            }
            continue;
        }

        debug!("Session running, pulse active");
        let mut ticker = interval(state.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if state.tick_all() == 0 {
                break;
            }
        }
    }
}
