//! Breathe Timer - drift-corrected phase timers for breathing, interval
//! training, rest between sets and simple countdowns
//!
//! The [`engine`] is a synchronous phase timer core; the rest of the crate
//! hosts one engine session per feature behind a small HTTP API and pulses
//! them from a background task.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{CountdownTimer, PhaseSequencer, SequenceConfig};
pub use error::{AppError, ConfigError};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
