//! Tests for PhaseSequencer driven by simulated time

use std::sync::Arc;

use super::{
    BreathPattern, IntervalPlan, ManualClock, Phase, PhaseEvent, PhaseName, PhaseSequencer,
    ResetPolicy, SequenceConfig,
};
use crate::error::ConfigError;

fn sequencer(config: impl Into<SequenceConfig>) -> (PhaseSequencer, ManualClock) {
    let clock = ManualClock::new();
    let sequencer = PhaseSequencer::new(config.into(), Arc::new(clock.clone()))
        .expect("valid test configuration");
    (sequencer, clock)
}

fn plan(warmup_ms: u64, work_ms: u64, rest_ms: u64, cooldown_ms: u64, rounds: u32) -> IntervalPlan {
    IntervalPlan {
        warmup_ms,
        work_ms,
        rest_ms,
        cooldown_ms,
        rounds,
    }
}

fn advance(sequencer: &mut PhaseSequencer, clock: &ManualClock, ms: u64) {
    clock.advance(ms);
    sequencer.tick();
}

fn entered(events: &[PhaseEvent]) -> Vec<(PhaseName, u32)> {
    events
        .iter()
        .filter_map(|event| match *event {
            PhaseEvent::Entered { phase, round } => Some((phase, round)),
            PhaseEvent::Completed { .. } => None,
        })
        .collect()
}

fn completed(events: &[PhaseEvent]) -> Vec<PhaseName> {
    events
        .iter()
        .filter_map(|event| match *event {
            PhaseEvent::Completed { phase, .. } => Some(phase),
            PhaseEvent::Entered { .. } => None,
        })
        .collect()
}

#[test]
fn test_interval_walkthrough() {
    let (mut seq, clock) = sequencer(plan(2_000, 2_000, 1_000, 2_000, 2));

    seq.start();
    assert_eq!(seq.current_phase_name(), PhaseName::Warmup);
    assert_eq!(seq.current_round(), 0);
    assert!(seq.is_running());

    let steps = [
        (2_000, PhaseName::Work, 1),
        (2_000, PhaseName::Rest, 1),
        (1_000, PhaseName::Work, 2),
        (2_000, PhaseName::Rest, 2),
        (1_000, PhaseName::Cooldown, 2),
        (2_000, PhaseName::Finished, 0),
    ];
    for (ms, phase, round) in steps {
        advance(&mut seq, &clock, ms);
        assert_eq!(seq.current_phase_name(), phase);
        assert_eq!(seq.current_round(), round);
    }
    assert!(!seq.is_running());
}

#[test]
fn test_round_bookkeeping() {
    let (mut seq, clock) = sequencer(plan(500, 500, 500, 500, 3));

    seq.start();
    for _ in 0..20 {
        advance(&mut seq, &clock, 500);
    }

    use PhaseName::*;
    assert_eq!(
        entered(&seq.drain_events()),
        vec![
            (Warmup, 0),
            (Work, 1),
            (Rest, 1),
            (Work, 2),
            (Rest, 2),
            (Work, 3),
            (Rest, 3),
            (Cooldown, 3),
            (Finished, 0),
        ]
    );
}

#[test]
fn test_completion_fires_once_per_phase() {
    let (mut seq, clock) = sequencer(SequenceConfig::single(PhaseName::Countdown, 1_000));

    seq.start();
    clock.advance(1_500);
    for _ in 0..100 {
        seq.tick();
    }

    assert_eq!(completed(&seq.drain_events()), vec![PhaseName::Countdown]);
    assert_eq!(seq.current_phase_name(), PhaseName::Finished);
    assert_eq!(seq.remaining_ms(), 0);
}

#[test]
fn test_zero_duration_phase_is_skipped() {
    let (mut seq, clock) = sequencer(BreathPattern::new(4_000, 0, 4_000, 1_000));

    seq.start();
    seq.drain_events();
    advance(&mut seq, &clock, 4_000);

    let events = seq.drain_events();
    assert_eq!(
        completed(&events),
        vec![PhaseName::Inhale, PhaseName::HoldIn]
    );
    assert_eq!(
        entered(&events),
        vec![(PhaseName::HoldIn, 1), (PhaseName::Exhale, 1)]
    );
    assert_eq!(seq.current_phase_name(), PhaseName::Exhale);
    assert_eq!(seq.remaining_ms(), 4_000);
    assert_eq!(seq.progress(), 0.0);
}

#[test]
fn test_zero_duration_first_phase_on_start() {
    let (mut seq, _clock) = sequencer(plan(0, 2_000, 1_000, 0, 1));

    seq.start();
    assert_eq!(seq.current_phase_name(), PhaseName::Work);
    assert_eq!(seq.current_round(), 1);
    assert_eq!(completed(&seq.drain_events()), vec![PhaseName::Warmup]);
}

#[test]
fn test_breathing_loops_until_stopped() {
    let (mut seq, clock) = sequencer(BreathPattern::new(1_000, 1_000, 1_000, 1_000));

    seq.start();
    for _ in 0..4 * 10 {
        advance(&mut seq, &clock, 1_000);
    }

    assert_eq!(seq.current_phase_name(), PhaseName::Inhale);
    assert_eq!(seq.current_round(), 11);
    assert_eq!(seq.total_rounds(), None);
    assert!(seq.is_running());
}

#[test]
fn test_bounded_breathing_halts_after_cycle() {
    let (mut seq, clock) = sequencer(BreathPattern {
        repeats: Some(2),
        ..BreathPattern::new(1_000, 0, 1_000, 0)
    });

    seq.start();
    for _ in 0..3 {
        advance(&mut seq, &clock, 1_000);
        assert_ne!(seq.current_phase_name(), PhaseName::Finished);
    }
    advance(&mut seq, &clock, 1_000);
    assert_eq!(seq.current_phase_name(), PhaseName::Finished);
}

#[test]
fn test_pause_preserves_phase_and_time() {
    let (mut seq, clock) = sequencer(plan(2_000, 2_000, 1_000, 2_000, 2));

    seq.start();
    advance(&mut seq, &clock, 2_500);
    assert_eq!(seq.current_phase_name(), PhaseName::Work);

    seq.toggle_run();
    assert!(seq.is_paused());
    let remaining = seq.remaining_ms();

    advance(&mut seq, &clock, 3_600_000);
    assert_eq!(seq.current_phase_name(), PhaseName::Work);
    assert_eq!(seq.remaining_ms(), remaining);

    seq.toggle_run();
    assert!(seq.is_running());
    advance(&mut seq, &clock, remaining);
    assert_eq!(seq.current_phase_name(), PhaseName::Rest);
    assert_eq!(seq.current_round(), 1);
}

#[test]
fn test_long_suspension_completes_once() {
    let (mut seq, clock) = sequencer(BreathPattern::default());

    seq.start();
    seq.drain_events();
    advance(&mut seq, &clock, 3_600_000);

    assert_eq!(completed(&seq.drain_events()), vec![PhaseName::Inhale]);
    assert_eq!(seq.current_phase_name(), PhaseName::HoldIn);
    assert_eq!(seq.remaining_ms(), 1_000);
}

#[test]
fn test_reconfigure_while_running_finishes() {
    let (mut seq, clock) = sequencer(plan(1_000, 1_000, 1_000, 1_000, 4));

    seq.start();
    advance(&mut seq, &clock, 1_500);
    assert_eq!(seq.current_round(), 1);

    seq.reconfigure(plan(5_000, 1_000, 1_000, 1_000, 2).into())
        .expect("valid plan");

    assert_eq!(seq.current_phase_name(), PhaseName::Finished);
    assert_eq!(seq.current_round(), 0);
    assert!(!seq.is_running());
    assert_eq!(seq.remaining_ms(), 5_000);
    assert_eq!(seq.total_rounds(), Some(2));

    // no stale completion from the abandoned countdown
    seq.drain_events();
    advance(&mut seq, &clock, 10_000);
    assert!(seq.drain_events().is_empty());
}

#[test]
fn test_rejected_reconfigure_keeps_running() {
    let (mut seq, clock) = sequencer(plan(1_000, 1_000, 1_000, 1_000, 4));

    seq.start();
    advance(&mut seq, &clock, 1_500);

    let err = seq
        .reconfigure(plan(1_000, 1_000, 1_000, 1_000, 0).into())
        .unwrap_err();
    assert_eq!(err, ConfigError::InvalidRounds);
    assert_eq!(seq.current_phase_name(), PhaseName::Work);
    assert_eq!(seq.total_rounds(), Some(4));
    assert!(seq.is_running());
}

#[test]
fn test_reset_policies() {
    let (mut hiit, _clock) = sequencer(plan(5_000, 1_000, 1_000, 1_000, 1));
    hiit.start();
    hiit.reset();
    assert_eq!(hiit.current_phase_name(), PhaseName::Finished);
    assert_eq!(hiit.snapshot().display, "00:05");

    let (mut timer, clock) = sequencer(SequenceConfig::single(PhaseName::Countdown, 90_000));
    timer.start();
    advance(&mut timer, &clock, 1_000);
    assert_eq!(timer.snapshot().display, "01:29");
    timer.reset();
    assert_eq!(timer.snapshot().display, "00:00");
    assert_eq!(timer.progress(), 0.0);
}

#[test]
fn test_restart_runs_from_full_duration() {
    let (mut seq, clock) = sequencer(SequenceConfig::single(PhaseName::Rest, 3_000));

    seq.start();
    advance(&mut seq, &clock, 2_000);
    seq.restart();

    assert_eq!(seq.current_phase_name(), PhaseName::Rest);
    assert_eq!(seq.remaining_ms(), 3_000);
    assert!(seq.is_running());
}

#[test]
fn test_start_resumes_when_paused() {
    let (mut seq, clock) = sequencer(SequenceConfig::single(PhaseName::Countdown, 3_000));

    seq.start();
    advance(&mut seq, &clock, 1_000);
    assert!(seq.pause());

    seq.start();
    assert!(seq.is_running());
    assert_eq!(seq.remaining_ms(), 2_000);

    // start while running changes nothing
    seq.start();
    assert_eq!(seq.remaining_ms(), 2_000);
}

#[test]
fn test_snapshot_projection() {
    let (mut seq, clock) = sequencer(plan(2_000, 2_000, 1_000, 2_000, 2));

    seq.start();
    advance(&mut seq, &clock, 500);
    let snapshot = seq.snapshot();

    assert_eq!(snapshot.phase, PhaseName::Warmup);
    assert_eq!(snapshot.remaining_ms, 1_500);
    assert_eq!(snapshot.display, "00:02");
    assert!((snapshot.progress - 0.25).abs() < 1e-9);
    assert_eq!(snapshot.total_rounds, Some(2));
    assert!(snapshot.running);
    assert!(!snapshot.paused);
}

#[test]
fn test_silent_repeated_body_is_rejected() {
    let config: SequenceConfig = plan(0, 0, 0, 0, u32::MAX).into();
    let clock = ManualClock::new();
    let err = PhaseSequencer::new(config.clone(), Arc::new(clock.clone())).unwrap_err();
    assert_eq!(err, ConfigError::ZeroLengthCycle);

    let (mut seq, _clock) = sequencer(plan(1_000, 1_000, 1_000, 1_000, 2));
    assert_eq!(seq.reconfigure(config), Err(ConfigError::ZeroLengthCycle));
    assert_eq!(seq.total_rounds(), Some(2));

    seq.start();
    assert_eq!(seq.current_phase_name(), PhaseName::Warmup);
    assert!(seq.is_running());
}

#[test]
fn test_single_silent_pass_runs_through() {
    let (mut seq, _clock) = sequencer(plan(0, 0, 0, 0, 1));

    seq.start();
    assert_eq!(seq.current_phase_name(), PhaseName::Finished);
    assert!(!seq.is_running());

    let events = seq.drain_events();
    assert_eq!(
        completed(&events),
        vec![
            PhaseName::Warmup,
            PhaseName::Work,
            PhaseName::Rest,
            PhaseName::Cooldown
        ]
    );
    assert_eq!(entered(&events).last(), Some(&(PhaseName::Finished, 0)));
}

#[test]
fn test_extreme_durations_stay_total() {
    let config = SequenceConfig {
        phases: vec![
            Phase::new(PhaseName::Inhale, u64::MAX),
            Phase::new(PhaseName::Exhale, 1),
        ],
        total_rounds: None,
        cyclic: true,
        reset: ResetPolicy::Zero,
    };
    let (mut seq, clock) = sequencer(config);

    seq.start();
    advance(&mut seq, &clock, 1_000);
    assert_eq!(seq.current_phase_name(), PhaseName::Inhale);
    assert_eq!(seq.remaining_ms(), u64::MAX - 1_000);

    assert!(seq.pause());
    clock.advance(5_000);
    assert!(seq.resume());
    assert_eq!(seq.remaining_ms(), u64::MAX - 1_000);
    assert!(completed(&seq.drain_events()).is_empty());
}
