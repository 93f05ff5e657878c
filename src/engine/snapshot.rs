//! Read-only projection of a sequencer for rendering

use serde::{Deserialize, Serialize};

use super::phase::PhaseName;

/// Everything a view needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceSnapshot {
    pub phase: PhaseName,
    pub round: u32,
    /// `None` for an endless cycle
    pub total_rounds: Option<u32>,
    pub remaining_ms: u64,
    /// Remaining time as `mm:ss`, seconds rounded up
    pub display: String,
    /// Fraction of the current phase already elapsed, in `[0, 1]`
    pub progress: f64,
    pub running: bool,
    pub paused: bool,
}

/// Phase lifecycle notifications, drained by the host after each command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseEvent {
    /// A phase (or the finished sentinel) became current
    Entered { phase: PhaseName, round: u32 },
    /// A phase's countdown ran out
    Completed { phase: PhaseName, round: u32 },
}
