//! Frame timing: integer ticks over a variable frame delta.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Converts accumulated frame time into discrete tick numbers.
///
/// Tick `n` fires on the frame whose accumulated time first reaches
/// `n * tick_length`. A frame that crosses several boundaries yields all of
/// them, so the number of ticks run only depends on the total elapsed time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickClock {
    tick_length: f32,
    elapsed: f64,
    tick_count: u64,
}

impl TickClock {
    pub fn new(tick_length: f32) -> Self {
        debug_assert!(tick_length > 0.0);
        Self {
            tick_length,
            elapsed: 0.0,
            tick_count: 0,
        }
    }

    pub fn tick_length(&self) -> f32 {
        self.tick_length
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of ticks fired so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Advance by `delta` seconds and return the tick numbers to run, if any
    pub fn advance(&mut self, delta: f32) -> Option<RangeInclusive<u64>> {
        if delta > 0.0 {
            self.elapsed += delta as f64;
        }
        let target = (self.elapsed / self.tick_length as f64).floor() as u64;
        if target <= self.tick_count {
            return None;
        }
        let first = self.tick_count + 1;
        self.tick_count = target;
        Some(first..=target)
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.tick_count = 0;
    }
}

/// Seconds elapsed since the last restart
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Stopwatch {
    elapsed: f32,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, delta: f32) {
        self.elapsed += delta.max(0.0);
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    /// Restart if at least `interval` seconds passed, reporting whether it did
    pub fn lap(&mut self, interval: f32) -> bool {
        if self.elapsed >= interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}
