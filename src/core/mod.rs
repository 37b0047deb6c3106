/*!
 * Core Module
 * Shared types used across the dispatcher
 */

pub mod types;

pub use types::{JobId, OsPid, Tick};
