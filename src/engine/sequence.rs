//! Sequence configuration and the per-feature programs built on it

use serde::{Deserialize, Serialize};

use super::phase::{Phase, PhaseName, PhaseRole};
use crate::error::ConfigError;

/// Upper bound of a single breathing phase, as offered by the settings sliders
pub const MAX_BREATH_PHASE_MS: u64 = 9_900;

/// Preset durations of the simple timer, in seconds
pub const TIMER_PRESETS_SECS: [u64; 5] = [30, 60, 90, 120, 150];

/// What an idle or reset sequence shows on its readout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Show 00:00
    #[default]
    Zero,
    /// Show the first phase's full duration
    FullDuration,
}

/// Ordered phases plus the rules for repeating them.
///
/// Warmup may only lead the list and Cooldown may only close it; every
/// other phase belongs to the repeated body. A linear sequence plays the
/// body `total_rounds` times (default once); a cyclic one loops the body
/// until `total_rounds` is reached, or forever when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub total_rounds: Option<u32>,
    #[serde(default)]
    pub cyclic: bool,
    #[serde(default)]
    pub reset: ResetPolicy,
}

impl SequenceConfig {
    /// Check the configuration, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.phases.is_empty() {
            return Err(ConfigError::NoPhases);
        }
        if self.total_rounds == Some(0) {
            return Err(ConfigError::InvalidRounds);
        }

        let last = self.phases.len() - 1;
        for (index, phase) in self.phases.iter().enumerate() {
            if phase.name == PhaseName::Finished {
                return Err(ConfigError::FinishedPhase { index });
            }
            match phase.name.role() {
                PhaseRole::LeadIn if index != 0 => {
                    return Err(ConfigError::MisplacedLeadIn { name: phase.name, index });
                }
                PhaseRole::LeadOut if index != last => {
                    return Err(ConfigError::MisplacedLeadOut { name: phase.name, index });
                }
                _ => {}
            }
        }

        let (first_body, last_body) = self.body_bounds().ok_or(ConfigError::NoBodyPhase)?;

        // A silent body replays instantly, so only a single pass may have one
        let body_has_time = self.phases[first_body..=last_body]
            .iter()
            .any(|phase| phase.duration_ms > 0);
        let rounds = self.rounds_limit();
        if !body_has_time && rounds != Some(1) {
            return Err(ConfigError::ZeroLengthCycle);
        }

        if rounds.is_none() {
            if let Some(lead_out) = self.lead_out() {
                return Err(ConfigError::UnreachableLeadOut { name: lead_out.name });
            }
        }

        Ok(())
    }

    /// Rounds to play, `None` for an endless cycle
    pub fn rounds_limit(&self) -> Option<u32> {
        if self.cyclic {
            self.total_rounds
        } else {
            Some(self.total_rounds.unwrap_or(1))
        }
    }

    /// Index range of the repeated block, `None` when it is empty
    pub fn body_bounds(&self) -> Option<(usize, usize)> {
        let len = self.phases.len();
        let first = match self.phases.first() {
            Some(phase) if phase.name.role() == PhaseRole::LeadIn => 1,
            Some(_) => 0,
            None => return None,
        };
        let end = match self.phases.last() {
            Some(phase) if phase.name.role() == PhaseRole::LeadOut && len > first => len - 1,
            _ => len,
        };
        (first < end).then(|| (first, end - 1))
    }

    pub fn lead_out(&self) -> Option<&Phase> {
        self.phases
            .last()
            .filter(|phase| phase.name.role() == PhaseRole::LeadOut)
    }

    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    /// A single countdown phase, shown as 00:00 when idle
    pub fn single(name: PhaseName, duration_ms: u64) -> Self {
        Self {
            phases: vec![Phase::new(name, duration_ms)],
            total_rounds: None,
            cyclic: false,
            reset: ResetPolicy::Zero,
        }
    }
}

/// Interval training: warmup, `rounds` × (work, rest), cooldown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalPlan {
    pub warmup_ms: u64,
    pub work_ms: u64,
    pub rest_ms: u64,
    pub cooldown_ms: u64,
    pub rounds: u32,
}

impl Default for IntervalPlan {
    fn default() -> Self {
        Self {
            warmup_ms: 30_000,
            work_ms: 40_000,
            rest_ms: 20_000,
            cooldown_ms: 30_000,
            rounds: 8,
        }
    }
}

impl From<IntervalPlan> for SequenceConfig {
    fn from(plan: IntervalPlan) -> Self {
        Self {
            phases: vec![
                Phase::new(PhaseName::Warmup, plan.warmup_ms),
                Phase::new(PhaseName::Work, plan.work_ms),
                Phase::new(PhaseName::Rest, plan.rest_ms),
                Phase::new(PhaseName::Cooldown, plan.cooldown_ms),
            ],
            total_rounds: Some(plan.rounds),
            cyclic: false,
            reset: ResetPolicy::FullDuration,
        }
    }
}

/// Breathing rhythm: inhale, hold, exhale, hold, looping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathPattern {
    pub inhale_ms: u64,
    pub hold_in_ms: u64,
    pub exhale_ms: u64,
    pub hold_out_ms: u64,
    /// Number of full cycles; unset breathes until stopped
    #[serde(default)]
    pub repeats: Option<u32>,
}

impl BreathPattern {
    pub fn new(inhale_ms: u64, hold_in_ms: u64, exhale_ms: u64, hold_out_ms: u64) -> Self {
        Self {
            inhale_ms,
            hold_in_ms,
            exhale_ms,
            hold_out_ms,
            repeats: None,
        }
    }

    /// Reject phases longer than the sliders allow
    pub fn validate(&self) -> Result<(), ConfigError> {
        let phases = [
            (PhaseName::Inhale, self.inhale_ms),
            (PhaseName::HoldIn, self.hold_in_ms),
            (PhaseName::Exhale, self.exhale_ms),
            (PhaseName::HoldOut, self.hold_out_ms),
        ];
        for (name, duration_ms) in phases {
            if duration_ms > MAX_BREATH_PHASE_MS {
                return Err(ConfigError::PhaseTooLong {
                    name,
                    duration_ms,
                    max_ms: MAX_BREATH_PHASE_MS,
                });
            }
        }
        SequenceConfig::from(*self).validate()
    }
}

impl Default for BreathPattern {
    fn default() -> Self {
        Self::new(4_000, 1_000, 4_000, 1_000)
    }
}

impl From<BreathPattern> for SequenceConfig {
    fn from(pattern: BreathPattern) -> Self {
        Self {
            phases: vec![
                Phase::new(PhaseName::Inhale, pattern.inhale_ms),
                Phase::new(PhaseName::HoldIn, pattern.hold_in_ms),
                Phase::new(PhaseName::Exhale, pattern.exhale_ms),
                Phase::new(PhaseName::HoldOut, pattern.hold_out_ms),
            ],
            total_rounds: pattern.repeats,
            cyclic: true,
            reset: ResetPolicy::Zero,
        }
    }
}

/// Named breathing rhythms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreathPreset {
    #[serde(rename = "4-2-4", alias = "424")]
    FourTwoFour,
    #[serde(rename = "4-7-8", alias = "478")]
    FourSevenEight,
    #[serde(rename = "box")]
    Box,
}

impl BreathPreset {
    /// Derive a pattern from the preset; `Box` squares the current inhale
    pub fn apply(self, current: &BreathPattern) -> BreathPattern {
        let pattern = match self {
            BreathPreset::FourTwoFour => BreathPattern::new(4_000, 2_000, 4_000, 0),
            BreathPreset::FourSevenEight => BreathPattern::new(4_000, 7_000, 8_000, 0),
            BreathPreset::Box => {
                let side = current.inhale_ms;
                BreathPattern::new(side, side, side, side)
            }
        };
        BreathPattern {
            repeats: current.repeats,
            ..pattern
        }
    }
}
