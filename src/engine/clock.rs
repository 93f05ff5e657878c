//! Injectable time sources for the engine

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Source of "now" for countdowns.
///
/// The engine never sleeps; it only asks the clock for the current instant
/// whenever it is started, paused, resumed or pulsed.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Clock backed by tokio's time driver.
///
/// Follows real time in production and tokio's paused time in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Hand-driven clock for simulated-time tests.
///
/// Clones share the same offset, so a test can keep one handle and give
/// another to the engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move time forward by `ms` milliseconds
    pub fn advance(&self, ms: u64) {
        self.offset_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Jump to an absolute offset from the origin
    pub fn set(&self, ms: u64) {
        self.offset_ms.store(ms, Ordering::SeqCst);
    }

    /// Milliseconds elapsed since the origin
    pub fn elapsed_ms(&self) -> u64 {
        self.offset_ms.load(Ordering::SeqCst)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.elapsed_ms())
    }
}
