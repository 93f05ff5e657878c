//! State management module
//!
//! Host-side state: one phase sequencer per feature, the workout board and
//! the channels that carry phase events to subscribers.

pub mod app_state;
pub mod feature;
pub mod workout_board;

// Re-export main types
pub use app_state::{AppState, FeatureEvent, SessionDefaults};
pub use feature::{Command, Feature};
pub use workout_board::WorkoutBoard;
