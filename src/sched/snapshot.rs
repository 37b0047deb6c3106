/*!
 * Queue Snapshots
 * Serializable per-tick views of the four queues, with table rendering
 * for the dispatcher binary
 */

use crate::core::types::{JobId, OsPid, Tick};
use crate::pcb::{Job, JobQueue, Status};
use serde::Serialize;
use std::fmt::Write;

/// One job's visible state at snapshot time
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JobSnapshot {
    pub id: JobId,
    pub os_pid: Option<OsPid>,
    pub arrival_time: Tick,
    pub service_time: u64,
    pub remaining: u64,
    pub cycle_time: u64,
    pub last_queued: Tick,
    pub priority: i32,
    pub status: Status,
}

impl From<&Job> for JobSnapshot {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            os_pid: job.os_pid,
            arrival_time: job.arrival_time,
            service_time: job.service_time,
            remaining: job.remaining,
            cycle_time: job.cycle_time,
            last_queued: job.last_queued,
            priority: job.priority,
            status: job.status,
        }
    }
}

/// All four queues at one tick
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerSnapshot {
    pub tick: Tick,
    pub running: Option<JobId>,
    pub jdq: Vec<JobSnapshot>,
    pub levels: [Vec<JobSnapshot>; 3],
}

impl SchedulerSnapshot {
    pub fn capture(
        tick: Tick,
        jdq: &JobQueue,
        levels: &[JobQueue; 3],
        running: Option<JobId>,
    ) -> Self {
        let view = |queue: &JobQueue| queue.iter().map(JobSnapshot::from).collect();
        Self {
            tick,
            running,
            jdq: view(jdq),
            levels: [view(&levels[0]), view(&levels[1]), view(&levels[2])],
        }
    }

    /// Render the snapshot as the classic fixed-width dispatcher table
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== tick {} ===", self.tick);
        self.render_queue(&mut out, "JDQ", &self.jdq);
        for (level, jobs) in self.levels.iter().enumerate() {
            self.render_queue(&mut out, &format!("Level-{}", level), jobs);
        }
        out
    }

    fn render_queue(&self, out: &mut String, name: &str, jobs: &[JobSnapshot]) {
        if jobs.is_empty() {
            return;
        }
        let _ = writeln!(out, "{}:", name);
        let _ = writeln!(
            out,
            "{:>7} {:>7} {:>8} {:>10} {:>12} {:>9}   {}",
            "pid", "arrive", "service", "cpuremain", "last_queued", "priority", "status"
        );
        for job in jobs {
            let _ = writeln!(
                out,
                "{:>7} {:>7} {:>8} {:>10} {:>12} {:>9}   {}",
                job.os_pid.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                job.arrival_time,
                job.service_time,
                job.remaining,
                job.last_queued,
                job.priority,
                status_label(job.status)
            );
        }
    }
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Uninitialized => "UNINITIALIZED",
        Status::Initialized => "INITIALIZED",
        Status::Running => "RUNNING",
        Status::Suspended => "SUSPENDED",
        Status::Terminated => "TERMINATED",
    }
}
