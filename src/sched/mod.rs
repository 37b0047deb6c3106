/*!
 * Scheduler Module
 * The MLFQ engine: admission, aging, dispatch, metrics, and clocking
 */

pub mod admission;
pub mod aging;
pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod metrics;
pub mod snapshot;

// Re-export public API
pub use clock::{Clock, NoPacing, Pacer, WallClock};
pub use config::{ConfigError, SchedulerConfig};
pub use dispatcher::{Dispatcher, StepOutcome};
pub use metrics::{Metrics, MetricsReport};
pub use snapshot::{JobSnapshot, SchedulerSnapshot};
