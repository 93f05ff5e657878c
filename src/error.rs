//! Error types

use thiserror::Error;

use crate::engine::PhaseName;

/// Rejected sequence configuration.
///
/// The engine keeps its previous configuration whenever one of these is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a sequence needs at least one phase")]
    NoPhases,

    #[error("round count must be at least 1")]
    InvalidRounds,

    #[error("phase {index} is the finished sentinel, which cannot be configured")]
    FinishedPhase { index: usize },

    #[error("{name} at position {index} must be the first phase")]
    MisplacedLeadIn { name: PhaseName, index: usize },

    #[error("{name} at position {index} must be the last phase")]
    MisplacedLeadOut { name: PhaseName, index: usize },

    #[error("a sequence needs at least one repeatable phase")]
    NoBodyPhase,

    #[error("a repeated body needs at least one phase with a non-zero duration")]
    ZeroLengthCycle,

    #[error("{name} can never be reached after an endless cycle")]
    UnreachableLeadOut { name: PhaseName },

    #[error("{name} lasts {duration_ms}ms, above the {max_ms}ms limit")]
    PhaseTooLong {
        name: PhaseName,
        duration_ms: u64,
        max_ms: u64,
    },

    #[error("a workout needs at least one exercise")]
    NoExercises,

    #[error("exercise names cannot be blank")]
    BlankExercise,

    #[error("set count must be between 1 and {max}, got {sets}")]
    InvalidSets { sets: u32, max: u32 },
}

/// Errors surfaced by the host state
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to lock {what}")]
    Lock { what: &'static str },

    #[error("no set {set} for exercise {exercise}")]
    UnknownSet { exercise: usize, set: usize },

    #[error("invalid request body: {0}")]
    InvalidBody(String),
}
