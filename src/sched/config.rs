/*!
 * Scheduler Configuration
 * Per-level quanta and the starvation threshold
 */

use crate::pcb::Level;
use serde::Serialize;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Quantum for level {0} must be a positive integer")]
    InvalidQuantum(i32),

    #[error("Starvation threshold must be a positive integer")]
    InvalidThreshold,
}

/// Validated scheduler parameters: one quantum per level plus the
/// starvation threshold W
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerConfig {
    quanta: [u64; 3],
    starvation_threshold: u64,
}

impl SchedulerConfig {
    pub fn new(t0: u64, t1: u64, t2: u64, w: u64) -> Result<Self, ConfigError> {
        for (level, quantum) in Level::ALL.iter().zip([t0, t1, t2]) {
            if quantum == 0 {
                return Err(ConfigError::InvalidQuantum(level.priority()));
            }
        }
        if w == 0 {
            return Err(ConfigError::InvalidThreshold);
        }
        Ok(Self {
            quanta: [t0, t1, t2],
            starvation_threshold: w,
        })
    }

    pub fn quantum(&self, level: Level) -> u64 {
        self.quanta[level.index()]
    }

    pub fn starvation_threshold(&self) -> u64 {
        self.starvation_threshold
    }
}
