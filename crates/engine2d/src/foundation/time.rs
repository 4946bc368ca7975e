//! Time management utilities
//!
//! The world never measures time itself. Each frame it is handed a delta
//! from a [`Clock`]; [`Timer`] reads the wall clock, [`FixedClock`] returns a
//! constant step for headless and deterministic runs.

use std::time::{Duration, Instant};

/// Source of per-frame delta time
pub trait Clock {
    /// Advance the clock by one frame and return the elapsed seconds
    fn tick(&mut self) -> f32;
}

/// Wall clock reporting the real time between ticks
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    last_tick: Instant,
    started: Instant,
    ticks: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Start timing from now
    pub fn new() -> Self {
        let now = Instant::now();
        Self { last_tick: now, started: now, ticks: 0 }
    }

    /// Number of ticks handed out
    pub fn frame_count(&self) -> u64 {
        self.ticks
    }

    /// Wall time since the timer was created
    pub fn total_time(&self) -> Duration {
        self.started.elapsed()
    }

    /// Mean ticks per second since creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f64 {
        let seconds = self.total_time().as_secs_f64();
        if seconds > 0.0 {
            self.ticks as f64 / seconds
        } else {
            0.0
        }
    }
}

impl Clock for Timer {
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.ticks += 1;
        dt
    }
}

/// Clock that advances by the same step every frame
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    step: f32,
    elapsed: f64,
}

impl FixedClock {
    /// Create a clock that reports `step` seconds per frame
    pub fn new(step: f32) -> Self {
        Self { step, elapsed: 0.0 }
    }

    /// Create a clock stepping at the given frame rate
    #[allow(clippy::cast_precision_loss)]
    pub fn from_fps(fps: u32) -> Self {
        Self::new(1.0 / fps.max(1) as f32)
    }

    /// Total simulated seconds handed out so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl Clock for FixedClock {
    fn tick(&mut self) -> f32 {
        self.elapsed += f64::from(self.step);
        self.step
    }
}
