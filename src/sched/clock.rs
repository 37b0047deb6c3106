/*!
 * Simulated Clock
 * Logical tick counter with injectable real-time pacing
 */

use crate::core::types::Tick;
use std::thread;
use std::time::Duration;

/// Real-time pacing strategy. The logical clock advances in integer ticks
/// regardless; the pacer only decides how long each tick takes in wall time.
pub trait Pacer {
    fn pace(&mut self, units: u64);
}

/// Sleeps one fixed duration per simulated CPU unit
#[derive(Debug, Clone)]
pub struct WallClock {
    unit: Duration,
}

impl WallClock {
    pub fn new(unit: Duration) -> Self {
        Self { unit }
    }
}

impl Default for WallClock {
    /// One second per CPU unit, matching the classic simulation rate
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Pacer for WallClock {
    fn pace(&mut self, units: u64) {
        thread::sleep(self.unit * units as u32);
    }
}

/// No wall-clock delay; tests run the full scheduling logic instantly
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pace(&mut self, _units: u64) {}
}

/// Monotonic simulated clock, advanced only by the dispatcher
pub struct Clock {
    now: Tick,
    pacer: Box<dyn Pacer>,
}

impl Clock {
    pub fn new(pacer: Box<dyn Pacer>) -> Self {
        Self { now: 0, pacer }
    }

    pub fn unpaced() -> Self {
        Self::new(Box::new(NoPacing))
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    /// Advance the logical clock, pacing for the same number of units
    pub fn advance(&mut self, units: u64) {
        self.pacer.pace(units);
        self.now += units;
    }
}
