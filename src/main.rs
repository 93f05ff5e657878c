//! Breathe Timer - drift-corrected phase timers behind a small HTTP API
//!
//! This is the main entry point for the breathe-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use breathe_timer::{
    api::create_router,
    config::Config,
    engine::TokioClock,
    state::AppState,
    tasks::{phase_log_task, pulse_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("breathe_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting breathe-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, rest={}s, sets={}",
          config.host, config.port, config.tick_ms, config.rest_secs, config.sets);

    // Create application state with every session finished
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.tick_interval(),
        config.session_defaults(),
        Arc::new(TokioClock),
    )?);

    // Start the scheduling pulse and the phase event log
    let pulse = tokio::spawn(pulse_task(Arc::clone(&state)));
    let phase_log = tokio::spawn(phase_log_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /session/:feature          - Snapshot of hiit, breath, timer or rest");
    info!("  POST /session/:feature/:command - start, toggle, pause, resume, reset, restart");
    info!("  PUT  /session/:feature/config   - Replace a session's configuration");
    info!("  POST /timer/trigger             - Start the simple timer");
    info!("  POST /breath/preset/:name       - Apply 4-2-4, 4-7-8 or box");
    info!("  GET  /train                     - Workout board and rest timer");
    info!("  GET  /events                    - Phase events (Server-Sent Events)");
    info!("  GET  /status                    - All sessions");
    info!("  GET  /health                    - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Cancel the pulse so no completion fires after teardown
    pulse.abort();
    phase_log.abort();

    info!("Server shutdown complete");
    Ok(())
}
