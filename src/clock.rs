// Time sources for response timestamps
//
// Timestamps are seconds as f64. The wall clock matches what most data files expect;
// the monotonic clock is the one to pick for reaction-time measurement.

use crate::models::ClockKind;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A swappable source of timestamps
pub trait Clock: Send + Sync {
    /// Current time in seconds
    fn now(&self) -> f64;
}

impl<F> Clock for F
where
    F: Fn() -> f64 + Send + Sync,
{
    fn now(&self) -> f64 {
        self()
    }
}

/// Seconds since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Seconds since construction, from [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

pub type SharedClock = Arc<dyn Clock>;

/// Build the clock selected in configuration
pub fn from_kind(kind: ClockKind) -> SharedClock {
    match kind {
        ClockKind::Wall => Arc::new(WallClock),
        ClockKind::Monotonic => Arc::new(MonotonicClock::new()),
    }
}
