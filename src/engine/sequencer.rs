//! Phase sequencer: chains countdowns into named phases

use std::sync::Arc;

use tracing::{debug, info};

use super::{
    clock::Clock,
    countdown::{CountdownTimer, StartOutcome, TimerStatus},
    phase::PhaseName,
    sequence::{ResetPolicy, SequenceConfig},
    snapshot::{PhaseEvent, SequenceSnapshot},
    transition::{transition, Cursor, Event, Position},
};
use crate::{error::ConfigError, utils::format_clock};

/// Drives one countdown per phase through a validated sequence.
///
/// Commands and pulses push [`PhaseEvent`]s into an outbox; the owner drains
/// it once the call has returned, so anything it does in reaction happens
/// after the transition has fully settled.
#[derive(Debug)]
pub struct PhaseSequencer {
    config: SequenceConfig,
    cursor: Cursor,
    timer: CountdownTimer,
    events: Vec<PhaseEvent>,
}

impl PhaseSequencer {
    pub fn new(config: SequenceConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut sequencer = Self {
            config,
            cursor: Cursor::FINISHED,
            timer: CountdownTimer::new(clock),
            events: Vec::new(),
        };
        sequencer.park_timer();
        Ok(sequencer)
    }

    /// Run from the beginning when finished, otherwise resume
    pub fn start(&mut self) {
        if self.cursor.is_finished() {
            self.apply(Event::Run);
        } else {
            self.resume();
        }
    }

    /// Run when finished, otherwise flip between running and paused
    pub fn toggle_run(&mut self) {
        if self.cursor.is_finished() {
            self.apply(Event::Run);
        } else if self.timer.is_running() {
            self.pause();
        } else {
            self.resume();
        }
    }

    pub fn pause(&mut self) -> bool {
        let paused = self.timer.pause();
        if paused {
            debug!("Paused {} with {}ms left", self.current_phase_name(), self.timer.remaining_ms());
        }
        paused
    }

    pub fn resume(&mut self) -> bool {
        let resumed = self.timer.resume();
        if resumed {
            debug!("Resumed {} with {}ms left", self.current_phase_name(), self.timer.remaining_ms());
        }
        resumed
    }

    /// Return to the finished state, clearing rounds
    pub fn reset(&mut self) {
        self.enter_finished();
    }

    /// Reset and run again from the first phase
    pub fn restart(&mut self) {
        self.reset();
        self.apply(Event::Run);
    }

    /// Replace the configuration and return to the finished state.
    ///
    /// An invalid configuration is rejected and the current one, along with
    /// any run in progress, is left untouched.
    pub fn reconfigure(&mut self, config: SequenceConfig) -> Result<(), ConfigError> {
        config.validate()?;
        info!("Reconfigured sequence with {} phases", config.phases.len());
        self.config = config;
        self.enter_finished();
        Ok(())
    }

    /// Scheduling pulse: advance the countdown and follow any completion
    pub fn tick(&mut self) {
        if self.timer.tick() {
            self.complete_current();
            self.apply(Event::TimerComplete);
        }
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<PhaseEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    pub fn current_phase_name(&self) -> PhaseName {
        self.cursor.phase_name(&self.config)
    }

    pub fn remaining_ms(&self) -> u64 {
        self.timer.remaining_ms()
    }

    pub fn progress(&self) -> f64 {
        self.timer.progress()
    }

    pub fn current_round(&self) -> u32 {
        self.cursor.round
    }

    pub fn total_rounds(&self) -> Option<u32> {
        self.config.rounds_limit()
    }

    pub fn is_running(&self) -> bool {
        !self.cursor.is_finished() && self.timer.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.timer.status() == TimerStatus::Paused
    }

    pub fn snapshot(&self) -> SequenceSnapshot {
        let remaining_ms = self.remaining_ms();
        SequenceSnapshot {
            phase: self.current_phase_name(),
            round: self.current_round(),
            total_rounds: self.total_rounds(),
            remaining_ms,
            display: format_clock(remaining_ms),
            progress: self.progress(),
            running: self.is_running(),
            paused: self.is_paused(),
        }
    }

    /// Follow the transition table from `event` until a phase with time on
    /// its clock is running, or the sequence has finished. Zero-length
    /// phases complete as soon as they are entered.
    fn apply(&mut self, event: Event) {
        let mut event = event;
        loop {
            let next = transition(&self.config, self.cursor, event);
            if next == self.cursor {
                return;
            }
            self.cursor = next;

            let Position::At(index) = next.position else {
                self.park_timer();
                self.push_entered();
                return;
            };

            self.push_entered();
            let duration_ms = self
                .config
                .phase(index)
                .map(|phase| phase.duration_ms)
                .unwrap_or_default();

            match self.timer.restart(duration_ms) {
                StartOutcome::Completed => {
                    self.complete_current();
                    event = Event::TimerComplete;
                }
                StartOutcome::Running | StartOutcome::Ignored => return,
            }
        }
    }

    fn complete_current(&mut self) {
        let phase = self.current_phase_name();
        debug!("Phase {} completed in round {}", phase, self.cursor.round);
        self.events.push(PhaseEvent::Completed {
            phase,
            round: self.cursor.round,
        });
    }

    fn push_entered(&mut self) {
        let phase = self.current_phase_name();
        debug!("Entered {} (round {})", phase, self.cursor.round);
        self.events.push(PhaseEvent::Entered {
            phase,
            round: self.cursor.round,
        });
    }

    fn enter_finished(&mut self) {
        let was_active = !self.cursor.is_finished();
        self.cursor = Cursor::FINISHED;
        self.park_timer();
        if was_active {
            self.push_entered();
        }
    }

    fn park_timer(&mut self) {
        match self.config.reset {
            ResetPolicy::Zero => self.timer.reset(),
            ResetPolicy::FullDuration => {
                let first_ms = self
                    .config
                    .phase(0)
                    .map(|phase| phase.duration_ms)
                    .unwrap_or_default();
                self.timer.rearm(first_ms);
            }
        }
    }
}
