//! The timer-backed features hosted by the server

use std::fmt;

use serde::{Deserialize, Serialize};

/// One independently running phase sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Interval training: warmup, work/rest rounds, cooldown
    Hiit,
    /// Looping breathing rhythm
    Breath,
    /// Simple countdown started from a preset
    Timer,
    /// Rest timer between workout sets
    Rest,
}

impl Feature {
    pub const ALL: [Feature; 4] = [Feature::Hiit, Feature::Breath, Feature::Timer, Feature::Rest];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Hiit => "hiit",
            Feature::Breath => "breath",
            Feature::Timer => "timer",
            Feature::Rest => "rest",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session commands shared by every feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Start,
    Toggle,
    Pause,
    Resume,
    Reset,
    Restart,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Toggle => "toggle",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Reset => "reset",
            Command::Restart => "restart",
        }
    }
}
