/*!
 * PCB Types
 * The process control block and its state machine
 */

use crate::core::types::{JobId, OsPid, Tick};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// PCB operation result
pub type PcbResult<T> = Result<T, PcbError>;

/// PCB errors
#[derive(Error, Debug, Clone)]
pub enum PcbError {
    #[error("Spawn failed for job {id}: {reason}")]
    SpawnFailed { id: JobId, reason: String },

    #[error("Job {0} has no underlying OS process")]
    NoProcess(JobId),

    #[error("Signal delivery failed for job {id}: {reason}")]
    SignalFailed { id: JobId, reason: String },

    #[error("Wait failed for job {id}: {reason}")]
    WaitFailed { id: JobId, reason: String },
}

/// PCB lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Allocated but not yet populated from the job list
    Uninitialized,
    /// Populated and waiting for first dispatch
    Initialized,
    /// Currently holding the CPU
    Running,
    /// Stopped pending a later quantum
    Suspended,
    /// Finished; the OS process has been reaped
    Terminated,
}

/// Priority a freshly created job carries before the job list assigns one
pub const DEFAULT_PRIORITY: i32 = -1;

/// MLFQ priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Zero,
    One,
    Two,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Zero, Level::One, Level::Two];

    /// Map a declared job priority onto a level, if it names one
    pub fn from_priority(priority: i32) -> Option<Self> {
        match priority {
            0 => Some(Level::Zero),
            1 => Some(Level::One),
            2 => Some(Level::Two),
            _ => None,
        }
    }

    /// The queue a job falls to when its quantum expires.
    /// Level 2 is terminal: it rotates back onto itself.
    pub fn demote(self) -> Self {
        match self {
            Level::Zero => Level::One,
            Level::One | Level::Two => Level::Two,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn priority(self) -> i32 {
        self as i32
    }
}

/// Process control block: one job and its runtime state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Job {
    pub id: JobId,
    /// OS handle, absent until the job is first started
    pub os_pid: Option<OsPid>,
    /// Tick at which the job becomes eligible for admission
    pub arrival_time: Tick,
    /// Total CPU ticks required
    pub service_time: u64,
    /// Remaining CPU countdown; starts equal to service time
    pub remaining: u64,
    /// Ticks consumed in the current quantum; resets on every queue transfer
    pub cycle_time: u64,
    /// Tick at which the job most recently entered its current queue
    pub last_queued: Tick,
    /// Declared level (0, 1, or 2); out-of-range values survive parsing so
    /// admission can report them
    pub priority: i32,
    pub status: Status,
}

impl Job {
    /// Create a job in Uninitialized status with zeroed timing fields
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            os_pid: None,
            arrival_time: 0,
            service_time: 0,
            remaining: 0,
            cycle_time: 0,
            last_queued: 0,
            priority: DEFAULT_PRIORITY,
            status: Status::Uninitialized,
        }
    }

    /// Populate from a job-list record and mark Initialized
    pub fn initialize(mut self, arrival_time: Tick, service_time: u64, priority: i32) -> Self {
        self.arrival_time = arrival_time;
        self.service_time = service_time;
        self.remaining = service_time;
        self.priority = priority;
        self.status = Status::Initialized;
        self
    }

    /// Time spent queued, excluding ticks already consumed in the current quantum
    pub fn waiting_since_queued(&self, now: Tick) -> Tick {
        now.saturating_sub(self.last_queued).saturating_sub(self.cycle_time)
    }
}
