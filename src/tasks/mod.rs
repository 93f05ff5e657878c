//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod phase_log;
pub mod pulse;

// Re-export main functions
pub use phase_log::phase_log_task;
pub use pulse::pulse_task;
