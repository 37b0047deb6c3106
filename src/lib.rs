/*!
 * MLFQ Dispatcher
 *
 * Multi-level feedback queue process dispatcher that drives real OS
 * processes through their lifecycle with POSIX signals:
 * - Three priority levels with per-level time quanta
 * - Round-robin demotion between levels, rotation on the terminal level
 * - Starvation aging back to the top level
 * - Turnaround, waiting, and response-time metrics
 */

pub mod core;
pub mod jobs;
pub mod pcb;
pub mod sched;

// Re-export for convenience
pub use crate::core::types::{JobId, OsPid, Tick};
#[cfg(unix)]
pub use pcb::UnixProcessControl;
pub use pcb::{
    Job, JobQueue, Level, MockProcessControl, PcbError, PcbResult, ProcessControl, Status,
};
pub use sched::{
    Dispatcher, MetricsReport, NoPacing, Pacer, SchedulerConfig, SchedulerSnapshot, StepOutcome,
    WallClock,
};
