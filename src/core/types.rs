/*!
 * Core Types
 * Common aliases used across the dispatcher
 */

/// Internal job identity, assigned when a job record is created
pub type JobId = u32;

/// OS-level process ID of a launched job
pub type OsPid = u32;

/// Simulated time in CPU units (one tick per dispatch iteration)
pub type Tick = u64;
