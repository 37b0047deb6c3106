/*!
 * PCB Module
 * Process control blocks, queues, and OS process control
 */

pub mod control;
pub mod lifecycle;
pub mod queue;
pub mod types;

// Re-export for convenience
pub use control::{ControlOp, MockProcessControl, ProcessControl};
#[cfg(unix)]
pub use control::UnixProcessControl;
pub use queue::JobQueue;
pub use types::{Job, Level, PcbError, PcbResult, Status, DEFAULT_PRIORITY};
