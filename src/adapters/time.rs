//! Host clock adapters.
//!
//! - [`SystemClock`] counts milliseconds from construction with
//!   `std::time::Instant`.
//! - [`ReplayClock`] follows recorded frame timestamps and keeps counting
//!   in wall time between them, so ticks injected during a replay stay on
//!   the recording's time axis.

use std::time::Instant;

use crate::app::ports::Clock;

/// Monotonic milliseconds since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Wall clock shifted onto a recording's timeline.
///
/// The shift only ever grows, so readings are monotonic and saturate at
/// `u64::MAX` instead of wrapping.
#[derive(Debug, Clone, Copy)]
pub struct ReplayClock<C: Clock = SystemClock> {
    wall: C,
    shift_ms: u64,
}

impl Default for ReplayClock {
    fn default() -> Self {
        Self::new(SystemClock::new())
    }
}

impl<C: Clock> ReplayClock<C> {
    pub fn new(wall: C) -> Self {
        Self { wall, shift_ms: 0 }
    }

    /// Align to a recorded timestamp.  Never moves time backwards.
    pub fn sync(&mut self, recorded_ms: u64) {
        if recorded_ms > self.now_ms() {
            // recorded > wall + shift >= wall
            self.shift_ms = recorded_ms - self.wall.now_ms();
        }
    }
}

impl<C: Clock> Clock for ReplayClock<C> {
    fn now_ms(&self) -> u64 {
        self.wall.now_ms().saturating_add(self.shift_ms)
    }
}
