//! Drift-corrected countdown timer
//!
//! A `CountdownTimer` never decrements by a fixed step. While running it
//! remembers the instant it was anchored and how much time was left at that
//! moment; every observation recomputes the remaining time from the clock.
//! Irregular or throttled pulses therefore cost rendering smoothness only,
//! never accuracy.
//!
//! # Lifecycle
//!
//! 1. `start` moves Idle/Completed → Running (zero duration completes at once)
//! 2. `pause`/`resume` move Running ⇄ Paused, preserving the remaining time
//! 3. `tick` moves Running → Completed when the deadline passes, reporting
//!    the completion exactly once
//! 4. `reset`/`rearm` return to Idle from anywhere

use std::{sync::Arc, time::Instant};

use serde::{Deserialize, Serialize};

use super::clock::Clock;

/// Lifecycle state of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Result of asking a countdown to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The countdown is now running
    Running,
    /// Zero duration: the countdown completed on the spot
    Completed,
    /// Already running or paused; nothing changed
    Ignored,
}

/// Wall-clock anchor of a running countdown
#[derive(Debug, Clone, Copy)]
struct Anchor {
    at: Instant,
    remaining_ms: u64,
}

impl Anchor {
    fn remaining_at(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.at).as_millis();
        let elapsed = u64::try_from(elapsed).unwrap_or(u64::MAX);
        self.remaining_ms.saturating_sub(elapsed)
    }
}

/// A single countdown with drift correction and edge-triggered completion
pub struct CountdownTimer {
    clock: Arc<dyn Clock>,
    duration_ms: u64,
    remaining_ms: u64,
    status: TimerStatus,
    anchor: Option<Anchor>,
}

impl CountdownTimer {
    /// Create an idle countdown reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            duration_ms: 0,
            remaining_ms: 0,
            status: TimerStatus::Idle,
            anchor: None,
        }
    }

    /// Start counting down `duration_ms` from now.
    ///
    /// Only valid from Idle or Completed; a running or paused countdown is
    /// left untouched (use [`restart`](Self::restart) to force a fresh run).
    pub fn start(&mut self, duration_ms: u64) -> StartOutcome {
        match self.status {
            TimerStatus::Running | TimerStatus::Paused => return StartOutcome::Ignored,
            TimerStatus::Idle | TimerStatus::Completed => {}
        }

        self.duration_ms = duration_ms;
        self.remaining_ms = duration_ms;

        if duration_ms == 0 {
            self.anchor = None;
            self.status = TimerStatus::Completed;
            return StartOutcome::Completed;
        }

        self.anchor = Some(Anchor {
            at: self.clock.now(),
            remaining_ms: duration_ms,
        });
        self.status = TimerStatus::Running;
        StartOutcome::Running
    }

    /// Reset, then start a fresh run of `duration_ms`
    pub fn restart(&mut self, duration_ms: u64) -> StartOutcome {
        self.reset();
        self.start(duration_ms)
    }

    /// Freeze the remaining time. Returns false unless the timer was running.
    pub fn pause(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        if let Some(anchor) = self.anchor.take() {
            self.remaining_ms = anchor.remaining_at(self.clock.now());
        }
        self.status = TimerStatus::Paused;
        true
    }

    /// Re-anchor the frozen remaining time to now. Returns false unless paused.
    pub fn resume(&mut self) -> bool {
        if self.status != TimerStatus::Paused {
            return false;
        }
        self.anchor = Some(Anchor {
            at: self.clock.now(),
            remaining_ms: self.remaining_ms,
        });
        self.status = TimerStatus::Running;
        true
    }

    /// Return to Idle showing zero; any pending completion is dropped
    pub fn reset(&mut self) {
        self.duration_ms = 0;
        self.remaining_ms = 0;
        self.anchor = None;
        self.status = TimerStatus::Idle;
    }

    /// Return to Idle showing the full `duration_ms`, ready to start
    pub fn rearm(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
        self.remaining_ms = duration_ms;
        self.anchor = None;
        self.status = TimerStatus::Idle;
    }

    /// Advance from the clock.
    ///
    /// Returns true exactly once per running episode: on the pulse that
    /// observes the deadline. Deadlines far in the past (clock jumps, long
    /// suspensions) clamp to zero and complete immediately.
    pub fn tick(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        let Some(anchor) = self.anchor else {
            return false;
        };

        self.remaining_ms = anchor.remaining_at(self.clock.now());
        if self.remaining_ms > 0 {
            return false;
        }

        self.anchor = None;
        self.status = TimerStatus::Completed;
        true
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Remaining time, recomputed from the clock while running
    pub fn remaining_ms(&self) -> u64 {
        match (self.status, self.anchor) {
            (TimerStatus::Running, Some(anchor)) => anchor.remaining_at(self.clock.now()),
            _ => self.remaining_ms,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.duration_ms.saturating_sub(self.remaining_ms())
    }

    /// Fraction of the duration already consumed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        let fraction = 1.0 - self.remaining_ms() as f64 / self.duration_ms as f64;
        fraction.clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for CountdownTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("duration_ms", &self.duration_ms)
            .field("remaining_ms", &self.remaining_ms)
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::ManualClock;

    fn timer() -> (CountdownTimer, ManualClock) {
        let clock = ManualClock::new();
        (CountdownTimer::new(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn irregular_pulses_hit_the_deadline() {
        let (mut timer, clock) = timer();
        timer.start(1_000);

        let mut fired = 0;
        for step in [7, 130, 3, 260, 90, 410, 99] {
            clock.advance(step);
            if timer.tick() {
                fired += 1;
            }
        }
        // 999ms elapsed so far
        assert_eq!(fired, 0);
        assert_eq!(timer.remaining_ms(), 1);

        clock.advance(1);
        assert!(timer.tick());
        assert_eq!(timer.status(), TimerStatus::Completed);
        assert_eq!(timer.remaining_ms(), 0);
    }

    #[test]
    fn remaining_is_not_a_sum_of_pulses() {
        let (mut timer, clock) = timer();
        timer.start(5_000);

        // one late pulse covers what would have been many ticks
        clock.advance(3_217);
        assert!(!timer.tick());
        assert_eq!(timer.remaining_ms(), 1_783);
    }

    #[test]
    fn pause_conserves_remaining_time() {
        let (mut timer, clock) = timer();
        timer.start(2_000);
        clock.advance(600);
        timer.tick();

        assert!(timer.pause());
        assert_eq!(timer.remaining_ms(), 1_400);

        clock.advance(60_000);
        assert!(!timer.tick());
        assert_eq!(timer.remaining_ms(), 1_400);

        assert!(timer.resume());
        clock.advance(1_399);
        assert!(!timer.tick());
        clock.advance(1);
        assert!(timer.tick());
    }

    #[test]
    fn completion_fires_once() {
        let (mut timer, clock) = timer();
        timer.start(100);
        clock.advance(150);

        assert!(timer.tick());
        for _ in 0..50 {
            assert!(!timer.tick());
        }
    }

    #[test]
    fn zero_duration_completes_on_start() {
        let (mut timer, _clock) = timer();
        assert_eq!(timer.start(0), StartOutcome::Completed);
        assert_eq!(timer.status(), TimerStatus::Completed);
        assert!(!timer.tick());
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn start_while_running_is_ignored() {
        let (mut timer, clock) = timer();
        timer.start(1_000);
        clock.advance(400);

        assert_eq!(timer.start(5_000), StartOutcome::Ignored);
        assert_eq!(timer.duration_ms(), 1_000);
        assert_eq!(timer.remaining_ms(), 600);

        assert_eq!(timer.restart(5_000), StartOutcome::Running);
        assert_eq!(timer.remaining_ms(), 5_000);
    }

    #[test]
    fn reset_drops_pending_completion() {
        let (mut timer, clock) = timer();
        timer.start(100);
        timer.reset();
        clock.advance(500);

        assert!(!timer.tick());
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.remaining_ms(), 0);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn rearm_shows_full_duration() {
        let (mut timer, _clock) = timer();
        timer.rearm(5_000);
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.remaining_ms(), 5_000);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let (mut timer, clock) = timer();
        timer.start(4_000);
        clock.advance(1_000);
        assert!((timer.progress() - 0.25).abs() < 1e-9);

        clock.advance(10_000);
        assert_eq!(timer.progress(), 1.0);
        assert_eq!(timer.elapsed_ms(), 4_000);
    }

    #[test]
    fn pause_and_resume_outside_their_states_are_noops() {
        let (mut timer, _clock) = timer();
        assert!(!timer.pause());
        assert!(!timer.resume());

        timer.start(1_000);
        assert!(!timer.resume());
        assert!(timer.pause());
        assert!(!timer.pause());
    }
}
