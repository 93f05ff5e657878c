//! Phase timer engine
//!
//! A synchronous, clock-injected core shared by every feature: a
//! drift-corrected [`CountdownTimer`] and a [`PhaseSequencer`] that chains
//! countdowns through a [`SequenceConfig`]. Nothing here sleeps or spawns;
//! the host pulses [`PhaseSequencer::tick`] and reads snapshots.

pub mod clock;
pub mod countdown;
pub mod phase;
pub mod sequence;
pub mod sequencer;
pub mod snapshot;
pub mod transition;

#[cfg(test)]
mod sequencer_tests;

pub use clock::{Clock, ManualClock, TokioClock};
pub use countdown::{CountdownTimer, StartOutcome, TimerStatus};
pub use phase::{Phase, PhaseName, PhaseRole};
pub use sequence::{BreathPattern, BreathPreset, IntervalPlan, ResetPolicy, SequenceConfig};
pub use sequencer::PhaseSequencer;
pub use snapshot::{PhaseEvent, SequenceSnapshot};
pub use transition::{transition, Cursor, Event, Position};
