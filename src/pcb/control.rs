/*!
 * Process Control
 * Capability interface over OS-level process control, with a real
 * signal-driven adapter and a recording mock for deterministic tests
 */

use super::types::{PcbError, PcbResult};
use crate::core::types::{JobId, OsPid};
use log::{info, warn};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::process::{Child, Command, Stdio};
use std::rc::Rc;

#[cfg(unix)]
use nix::sys::signal::{kill, Signal};
#[cfg(unix)]
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
#[cfg(unix)]
use nix::unistd::Pid as NixPid;

/// Capability interface the scheduler core depends on. `start` launches the
/// underlying OS process; `suspend` and `terminate` block until the target
/// acknowledges the signal, so queue mutation after them cannot race the
/// process state.
pub trait ProcessControl {
    /// Launch the job's OS process and return its handle
    fn start(&mut self, id: JobId) -> PcbResult<OsPid>;

    /// Deliver a stop signal and block until the process has stopped
    fn suspend(&mut self, id: JobId) -> PcbResult<()>;

    /// Deliver a continue signal
    fn resume(&mut self, id: JobId) -> PcbResult<()>;

    /// Deliver an interrupt signal, block until exit, and reap the process
    fn terminate(&mut self, id: JobId) -> PcbResult<()>;
}

/// Real-process adapter: spawns the configured executable and drives it
/// with SIGTSTP/SIGCONT/SIGINT.
#[cfg(unix)]
pub struct UnixProcessControl {
    command: String,
    children: HashMap<JobId, Child>,
    /// Jobs whose process exited underneath us and was already reaped by
    /// `waitpid`; later signals to them are no-ops, not ESRCH failures
    exited: HashSet<JobId>,
}

#[cfg(unix)]
impl UnixProcessControl {
    /// Each job execs the same fixed executable with no arguments beyond
    /// its own name; the scheduler only observes liveness and exit.
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        info!("Process control initialized: command='{}'", command);
        Self {
            command,
            children: HashMap::new(),
            exited: HashSet::new(),
        }
    }

    fn os_pid(&self, id: JobId) -> PcbResult<OsPid> {
        self.children
            .get(&id)
            .map(|child| child.id())
            .ok_or(PcbError::NoProcess(id))
    }

    fn signal(&self, id: JobId, signal: Signal) -> PcbResult<()> {
        let os_pid = self.os_pid(id)?;
        kill(NixPid::from_raw(os_pid as i32), signal).map_err(|e| PcbError::SignalFailed {
            id,
            reason: format!("{:?} to OS PID {}: {}", signal, os_pid, e),
        })
    }

    /// Block until the child acknowledges a stop (or exits underneath us)
    fn wait_for_stop(&mut self, id: JobId) -> PcbResult<()> {
        let os_pid = self.os_pid(id)?;
        loop {
            match waitpid(NixPid::from_raw(os_pid as i32), Some(WaitPidFlag::WUNTRACED)) {
                Ok(WaitStatus::Stopped(..)) => return Ok(()),
                Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => {
                    // waitpid already reaped it; drop the handle so later
                    // signals don't target a recycled PID
                    warn!("Job {} (OS PID {}) exited while being suspended", id, os_pid);
                    self.children.remove(&id);
                    self.exited.insert(id);
                    return Ok(());
                }
                Ok(_) => continue,
                Err(e) => {
                    return Err(PcbError::WaitFailed {
                        id,
                        reason: e.to_string(),
                    })
                }
            }
        }
    }
}

#[cfg(unix)]
impl ProcessControl for UnixProcessControl {
    fn start(&mut self, id: JobId) -> PcbResult<OsPid> {
        let child = Command::new(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| PcbError::SpawnFailed {
                id,
                reason: format!("{}: {}", self.command, e),
            })?;

        let os_pid = child.id();
        info!("Job {} started (OS PID {})", id, os_pid);
        self.children.insert(id, child);
        Ok(os_pid)
    }

    fn suspend(&mut self, id: JobId) -> PcbResult<()> {
        if self.exited.contains(&id) {
            return Ok(());
        }
        self.signal(id, Signal::SIGTSTP)?;
        self.wait_for_stop(id)
    }

    fn resume(&mut self, id: JobId) -> PcbResult<()> {
        if self.exited.contains(&id) {
            return Ok(());
        }
        self.signal(id, Signal::SIGCONT)
    }

    fn terminate(&mut self, id: JobId) -> PcbResult<()> {
        if self.exited.remove(&id) {
            info!("Job {} already exited, nothing to terminate", id);
            return Ok(());
        }
        self.signal(id, Signal::SIGINT)?;
        let mut child = self
            .children
            .remove(&id)
            .ok_or(PcbError::NoProcess(id))?;
        let status = child.wait().map_err(|e| PcbError::WaitFailed {
            id,
            reason: e.to_string(),
        })?;
        info!("Job {} terminated ({})", id, status);
        Ok(())
    }
}

/// Control operation observed by the mock adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOp {
    Start(JobId),
    Suspend(JobId),
    Resume(JobId),
    Terminate(JobId),
}

/// Mock adapter: records every operation and hands out synthetic PIDs so
/// the full scheduling logic runs without spawning anything. Clones share
/// the same recorder, so a test can keep a handle to the adapter it moved
/// into the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct MockProcessControl {
    inner: Rc<RefCell<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    live: HashMap<JobId, OsPid>,
    next_pid: OsPid,
    ops: Vec<ControlOp>,
}

impl MockProcessControl {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(MockInner {
                live: HashMap::new(),
                next_pid: 1000,
                ops: Vec::new(),
            })),
        }
    }

    /// Every operation in the order it was issued
    pub fn ops(&self) -> Vec<ControlOp> {
        self.inner.borrow().ops.clone()
    }

    /// Operations issued against one job
    pub fn ops_for(&self, id: JobId) -> Vec<ControlOp> {
        self.inner
            .borrow()
            .ops
            .iter()
            .copied()
            .filter(|op| match op {
                ControlOp::Start(j)
                | ControlOp::Suspend(j)
                | ControlOp::Resume(j)
                | ControlOp::Terminate(j) => *j == id,
            })
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.inner.borrow().live.len()
    }
}

impl ProcessControl for MockProcessControl {
    fn start(&mut self, id: JobId) -> PcbResult<OsPid> {
        let mut inner = self.inner.borrow_mut();
        inner.next_pid += 1;
        let os_pid = inner.next_pid;
        inner.live.insert(id, os_pid);
        inner.ops.push(ControlOp::Start(id));
        Ok(os_pid)
    }

    fn suspend(&mut self, id: JobId) -> PcbResult<()> {
        let mut inner = self.inner.borrow_mut();
        if !inner.live.contains_key(&id) {
            return Err(PcbError::NoProcess(id));
        }
        inner.ops.push(ControlOp::Suspend(id));
        Ok(())
    }

    fn resume(&mut self, id: JobId) -> PcbResult<()> {
        let mut inner = self.inner.borrow_mut();
        if !inner.live.contains_key(&id) {
            return Err(PcbError::NoProcess(id));
        }
        inner.ops.push(ControlOp::Resume(id));
        Ok(())
    }

    fn terminate(&mut self, id: JobId) -> PcbResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.live.remove(&id).is_none() {
            return Err(PcbError::NoProcess(id));
        }
        inner.ops.push(ControlOp::Terminate(id));
        Ok(())
    }
}
