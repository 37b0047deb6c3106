/*!
 * Metrics Accumulator
 * Turnaround, waiting, and response-time totals across one simulation run
 */

use crate::core::types::Tick;
use serde::Serialize;

/// Run-wide counters, updated at well-defined transition points: response
/// at a job's first start, turnaround and waiting at its termination.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Metrics {
    total_turnaround: u64,
    total_waiting: u64,
    total_response: u64,
    completed: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record response time at a job's first transition out of Initialized
    pub fn record_response(&mut self, response: Tick) {
        self.total_response += response;
    }

    /// Record a completed job. Waiting time is turnaround minus service.
    pub fn record_completion(&mut self, turnaround: Tick, service_time: u64) {
        self.total_turnaround += turnaround;
        self.total_waiting += turnaround.saturating_sub(service_time);
        self.completed += 1;
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn report(&self) -> MetricsReport {
        let n = self.completed as f64;
        let avg = |total: u64| if self.completed == 0 { 0.0 } else { total as f64 / n };
        MetricsReport {
            completed: self.completed,
            avg_turnaround: avg(self.total_turnaround),
            avg_waiting: avg(self.total_waiting),
            avg_response: avg(self.total_response),
        }
    }
}

/// Aggregate averages reported once every job has completed
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricsReport {
    pub completed: u64,
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_response: f64,
}
