//! Main application state management

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::{
    engine::{
        BreathPattern, BreathPreset, Clock, IntervalPlan, PhaseEvent, PhaseName, PhaseSequencer,
        SequenceConfig, SequenceSnapshot,
    },
    error::AppError,
};
use super::{Command, Feature, WorkoutBoard};

/// Phase event tagged with the session that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEvent {
    pub feature: Feature,
    pub event: PhaseEvent,
    pub timestamp: DateTime<Utc>,
}

/// Startup settings for the hosted sessions
#[derive(Debug, Clone)]
pub struct SessionDefaults {
    pub interval: IntervalPlan,
    pub breath: BreathPattern,
    pub timer_secs: u64,
    pub rest_secs: u64,
    pub exercises: Vec<String>,
    pub sets: u32,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        let board = WorkoutBoard::default();
        Self {
            interval: IntervalPlan::default(),
            breath: BreathPattern::default(),
            timer_secs: 0,
            rest_secs: 3,
            exercises: board.exercises().to_vec(),
            sets: board.sets(),
        }
    }
}

/// Owns one phase sequencer per feature plus the workout board.
///
/// Every command runs under the session's lock and drains the sequencer's
/// events before the lock is released; subscribers only ever see settled
/// transitions.
#[derive(Debug)]
pub struct AppState {
    sessions: BTreeMap<Feature, Mutex<PhaseSequencer>>,
    breath_pattern: Mutex<BreathPattern>,
    pub workout: Mutex<WorkoutBoard>,
    /// Scheduling pulse period
    pub tick_interval: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Phase events of every session
    pub phase_event_tx: broadcast::Sender<FeatureEvent>,
    /// Bumped by every command so an idle pulse task wakes up
    pub pulse_tx: watch::Sender<u64>,
}

impl AppState {
    /// Create the state with every session finished and idle
    pub fn new(
        port: u16,
        host: String,
        tick_interval: Duration,
        defaults: SessionDefaults,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let (phase_event_tx, _) = broadcast::channel(100);
        let (pulse_tx, _) = watch::channel(0);

        defaults.breath.validate()?;
        let configs = [
            (Feature::Hiit, SequenceConfig::from(defaults.interval)),
            (Feature::Breath, SequenceConfig::from(defaults.breath)),
            (
                Feature::Timer,
                SequenceConfig::single(PhaseName::Countdown, defaults.timer_secs.saturating_mul(1_000)),
            ),
            (
                Feature::Rest,
                SequenceConfig::single(PhaseName::Rest, defaults.rest_secs.saturating_mul(1_000)),
            ),
        ];

        let mut sessions = BTreeMap::new();
        for (feature, config) in configs {
            let sequencer = PhaseSequencer::new(config, Arc::clone(&clock))?;
            sessions.insert(feature, Mutex::new(sequencer));
        }

        Ok(Self {
            sessions,
            breath_pattern: Mutex::new(defaults.breath),
            workout: Mutex::new(WorkoutBoard::new(defaults.exercises, defaults.sets)?),
            tick_interval,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            phase_event_tx,
            pulse_tx,
        })
    }

    /// Apply `update` to one session, publish its events and return a snapshot
    pub fn update_session<F>(
        &self,
        feature: Feature,
        action: &str,
        update: F,
    ) -> Result<SequenceSnapshot, AppError>
    where
        F: FnOnce(&mut PhaseSequencer) -> Result<(), AppError>,
    {
        let (snapshot, events) = {
            let mut sequencer = self.lock_session(feature)?;
            update(&mut *sequencer)?;
            (sequencer.snapshot(), sequencer.drain_events())
        };

        self.record_action(&format!("{}:{}", feature, action));
        self.publish(feature, events);
        self.pulse_tx.send_modify(|generation| *generation += 1);

        Ok(snapshot)
    }

    /// Run a session command
    pub fn command(&self, feature: Feature, command: Command) -> Result<SequenceSnapshot, AppError> {
        info!("{} command on {}", command.as_str(), feature);
        self.update_session(feature, command.as_str(), |sequencer| {
            match command {
                Command::Start => sequencer.start(),
                Command::Toggle => sequencer.toggle_run(),
                Command::Pause => {
                    sequencer.pause();
                }
                Command::Resume => {
                    sequencer.resume();
                }
                Command::Reset => sequencer.reset(),
                Command::Restart => sequencer.restart(),
            }
            Ok(())
        })
    }

    /// Replace a session's configuration, returning it to finished
    pub fn reconfigure(
        &self,
        feature: Feature,
        config: SequenceConfig,
    ) -> Result<SequenceSnapshot, AppError> {
        self.update_session(feature, "configure", |sequencer| {
            sequencer.reconfigure(config).map_err(|e| {
                warn!("Rejected {} configuration: {}", feature, e);
                AppError::from(e)
            })
        })
    }

    pub fn configure_interval(&self, plan: IntervalPlan) -> Result<SequenceSnapshot, AppError> {
        self.reconfigure(Feature::Hiit, plan.into())
    }

    pub fn configure_breath(&self, pattern: BreathPattern) -> Result<SequenceSnapshot, AppError> {
        pattern.validate()?;
        let mut current = self.lock(&self.breath_pattern, "breath pattern")?;
        let snapshot = self.reconfigure(Feature::Breath, pattern.into())?;
        *current = pattern;
        Ok(snapshot)
    }

    /// Switch the breathing session to a named rhythm
    pub fn apply_breath_preset(&self, preset: BreathPreset) -> Result<SequenceSnapshot, AppError> {
        let current = *self.lock(&self.breath_pattern, "breath pattern")?;
        self.configure_breath(preset.apply(&current))
    }

    pub fn breath_pattern(&self) -> Result<BreathPattern, AppError> {
        Ok(*self.lock(&self.breath_pattern, "breath pattern")?)
    }

    /// Set the simple timer to `seconds` and start it from full duration
    pub fn trigger_timer(&self, seconds: u64) -> Result<SequenceSnapshot, AppError> {
        let config = SequenceConfig::single(PhaseName::Countdown, seconds.saturating_mul(1_000));
        self.update_session(Feature::Timer, "trigger", |sequencer| {
            sequencer.reconfigure(config)?;
            sequencer.start();
            Ok(())
        })
    }

    /// Set the simple timer's duration without starting it
    pub fn configure_timer(&self, seconds: u64) -> Result<SequenceSnapshot, AppError> {
        self.reconfigure(
            Feature::Timer,
            SequenceConfig::single(PhaseName::Countdown, seconds.saturating_mul(1_000)),
        )
    }

    pub fn configure_rest(&self, seconds: u64) -> Result<SequenceSnapshot, AppError> {
        self.reconfigure(
            Feature::Rest,
            SequenceConfig::single(PhaseName::Rest, seconds.saturating_mul(1_000)),
        )
    }

    /// Flip a workout set and restart the rest timer
    pub fn toggle_set(
        &self,
        exercise: usize,
        set: usize,
    ) -> Result<(bool, SequenceSnapshot), AppError> {
        let done = self.lock(&self.workout, "workout board")?.toggle(exercise, set)?;
        debug!("Set {} of exercise {} is now done={}", set, exercise, done);
        let snapshot = self.command(Feature::Rest, Command::Restart)?;
        Ok((done, snapshot))
    }

    pub fn configure_workout(&self, exercises: Vec<String>, sets: u32) -> Result<WorkoutBoard, AppError> {
        let mut board = self.lock(&self.workout, "workout board")?;
        board.reconfigure(exercises, sets)?;
        info!("Workout board set to {} exercises x {} sets", board.exercises().len(), sets);
        Ok(board.clone())
    }

    pub fn workout_board(&self) -> Result<WorkoutBoard, AppError> {
        Ok(self.lock(&self.workout, "workout board")?.clone())
    }

    pub fn snapshot(&self, feature: Feature) -> Result<SequenceSnapshot, AppError> {
        Ok(self.lock_session(feature)?.snapshot())
    }

    pub fn snapshots(&self) -> Result<BTreeMap<Feature, SequenceSnapshot>, AppError> {
        Feature::ALL
            .into_iter()
            .map(|feature| self.snapshot(feature).map(|snapshot| (feature, snapshot)))
            .collect()
    }

    /// Whether any session needs the scheduling pulse
    pub fn any_running(&self) -> bool {
        self.sessions.values().any(|session| {
            session
                .lock()
                .map(|sequencer| sequencer.is_running())
                .unwrap_or(false)
        })
    }

    /// Pulse every running session; returns how many are still running
    pub fn tick_all(&self) -> usize {
        let mut running = 0;
        for (&feature, session) in &self.sessions {
            let events = match session.lock() {
                Ok(mut sequencer) => {
                    if !sequencer.is_running() {
                        continue;
                    }
                    sequencer.tick();
                    if sequencer.is_running() {
                        running += 1;
                    }
                    sequencer.drain_events()
                }
                Err(_) => {
                    warn!("Skipping pulse for {}: session lock poisoned", feature);
                    continue;
                }
            };
            self.publish(feature, events);
        }
        running
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn publish(&self, feature: Feature, events: Vec<PhaseEvent>) {
        for event in events {
            let event = FeatureEvent {
                feature,
                event,
                timestamp: Utc::now(),
            };
            if self.phase_event_tx.send(event).is_err() {
                debug!("No subscribers for {} phase events", feature);
            }
        }
    }

    fn lock_session(&self, feature: Feature) -> Result<MutexGuard<'_, PhaseSequencer>, AppError> {
        let session = self
            .sessions
            .get(&feature)
            .ok_or(AppError::Lock { what: "session" })?;
        self.lock(session, feature.as_str())
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>, what: &'static str) -> Result<MutexGuard<'a, T>, AppError> {
        mutex.lock().map_err(|_| AppError::Lock { what })
    }
}
