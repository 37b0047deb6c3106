/*!
 * PCB Lifecycle
 * Drives a job's OS process through start/suspend/resume/terminate and
 * keeps the PCB status in step with it
 */

use super::control::ProcessControl;
use super::types::{Job, PcbResult, Status};
use log::debug;

/// Start (or restart) a job. A job with no OS process yet is spawned; a job
/// that was previously suspended gets a continue signal instead. Returns
/// `true` when this was the job's first run, which is the one moment its
/// response time is measured.
pub fn start(job: &mut Job, ctl: &mut dyn ProcessControl) -> PcbResult<bool> {
    let first_run = job.status == Status::Initialized;

    match job.os_pid {
        None => {
            let os_pid = ctl.start(job.id)?;
            job.os_pid = Some(os_pid);
        }
        Some(os_pid) => {
            debug!("Job {} already has OS PID {}, continuing it", job.id, os_pid);
            ctl.resume(job.id)?;
        }
    }

    job.status = Status::Running;
    Ok(first_run)
}

/// Stop the job's process and wait for the stop to land
pub fn suspend(job: &mut Job, ctl: &mut dyn ProcessControl) -> PcbResult<()> {
    ctl.suspend(job.id)?;
    job.status = Status::Suspended;
    Ok(())
}

/// Continue a previously stopped job
pub fn resume(job: &mut Job, ctl: &mut dyn ProcessControl) -> PcbResult<()> {
    ctl.resume(job.id)?;
    job.status = Status::Running;
    Ok(())
}

/// Interrupt the job's process, wait for it to exit, and mark the PCB
/// Terminated. The caller owns releasing the job record afterward.
pub fn terminate(job: &mut Job, ctl: &mut dyn ProcessControl) -> PcbResult<()> {
    ctl.terminate(job.id)?;
    job.status = Status::Terminated;
    Ok(())
}
