//! Phase names and their place in a sequence

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a phase.
///
/// `Finished` is the resting sentinel of every sequence and never appears
/// in a phase list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    Finished,
    Warmup,
    Work,
    Rest,
    Cooldown,
    Inhale,
    HoldIn,
    Exhale,
    HoldOut,
    Countdown,
}

/// Where a phase sits relative to the repeated block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseRole {
    /// Runs once before the first round
    LeadIn,
    /// Repeated once per round
    Body,
    /// Runs once after the last round
    LeadOut,
}

impl PhaseName {
    pub fn role(self) -> PhaseRole {
        match self {
            PhaseName::Warmup => PhaseRole::LeadIn,
            PhaseName::Cooldown => PhaseRole::LeadOut,
            _ => PhaseRole::Body,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseName::Finished => "finished",
            PhaseName::Warmup => "warmup",
            PhaseName::Work => "work",
            PhaseName::Rest => "rest",
            PhaseName::Cooldown => "cooldown",
            PhaseName::Inhale => "inhale",
            PhaseName::HoldIn => "hold_in",
            PhaseName::Exhale => "exhale",
            PhaseName::HoldOut => "hold_out",
            PhaseName::Countdown => "countdown",
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named interval with its own duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: PhaseName,
    pub duration_ms: u64,
}

impl Phase {
    pub fn new(name: PhaseName, duration_ms: u64) -> Self {
        Self { name, duration_ms }
    }
}
