//! Pure phase transition table
//!
//! `transition` maps a cursor and an event to the next cursor without
//! touching any timer, so the whole table can be checked exhaustively.

use super::{phase::PhaseName, sequence::SequenceConfig};

/// Where a sequence currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Finished,
    At(usize),
}

/// Position plus round bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub position: Position,
    pub round: u32,
}

impl Cursor {
    pub const FINISHED: Cursor = Cursor {
        position: Position::Finished,
        round: 0,
    };

    pub fn is_finished(&self) -> bool {
        self.position == Position::Finished
    }

    /// Name of the phase under the cursor
    pub fn phase_name(&self, config: &SequenceConfig) -> PhaseName {
        match self.position {
            Position::Finished => PhaseName::Finished,
            Position::At(index) => config
                .phase(index)
                .map(|phase| phase.name)
                .unwrap_or(PhaseName::Finished),
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::FINISHED
    }
}

/// Inputs that move a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Explicit request to run from the finished state
    Run,
    /// The current phase's countdown reached zero
    TimerComplete,
}

/// Compute the cursor that follows `cursor` on `event`.
///
/// Entering the first repeated phase increments the round; entering
/// `Finished` clears it. Events that do not apply to the current position
/// leave the cursor unchanged.
pub fn transition(config: &SequenceConfig, cursor: Cursor, event: Event) -> Cursor {
    let Some((first_body, last_body)) = config.body_bounds() else {
        return Cursor::FINISHED;
    };

    let enter_body = |round: u32| Cursor {
        position: Position::At(first_body),
        round: round + 1,
    };

    match (cursor.position, event) {
        (Position::Finished, Event::Run) => {
            if first_body == 0 {
                enter_body(0)
            } else {
                Cursor {
                    position: Position::At(0),
                    round: 0,
                }
            }
        }
        (Position::Finished, Event::TimerComplete) | (Position::At(_), Event::Run) => cursor,
        (Position::At(index), Event::TimerComplete) => {
            if index < first_body {
                enter_body(cursor.round)
            } else if index < last_body {
                Cursor {
                    position: Position::At(index + 1),
                    round: cursor.round,
                }
            } else if index == last_body {
                let more_rounds = config
                    .rounds_limit()
                    .map_or(true, |limit| cursor.round < limit);
                if more_rounds {
                    enter_body(cursor.round)
                } else if config.lead_out().is_some() {
                    Cursor {
                        position: Position::At(last_body + 1),
                        round: cursor.round,
                    }
                } else {
                    Cursor::FINISHED
                }
            } else {
                Cursor::FINISHED
            }
        }
    }
}
