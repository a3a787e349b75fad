//! Time sources
//!
//! Deferred activations are measured against a [`TimeSource`] instead of
//! wall-clock sleeps, so a host can drive time from its frame loop and tests
//! can advance it explicitly.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time elapsed since the source was created
pub trait TimeSource {
    /// Current time relative to the source's origin
    fn now(&self) -> Duration;
}

/// Wall-clock time source backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    /// Create a clock whose origin is now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced time source
///
/// Clones share the same counter: hand one clone to the pool manager and keep
/// another to advance time from the game loop or a test.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    elapsed: Rc<Cell<Duration>>,
}

impl VirtualClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance time by the given duration
    pub fn advance(&self, delta: Duration) {
        self.elapsed.set(self.elapsed.get() + delta);
    }

    /// Advance time by a frame delta in seconds
    ///
    /// Negative and non-finite deltas are ignored; time never runs backwards.
    pub fn advance_secs(&self, delta_time: f32) {
        if let Ok(delta) = Duration::try_from_secs_f32(delta_time) {
            self.advance(delta);
        }
    }

    /// Current time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.get().as_secs_f32()
    }
}

impl TimeSource for VirtualClock {
    fn now(&self) -> Duration {
        self.elapsed.get()
    }
}
