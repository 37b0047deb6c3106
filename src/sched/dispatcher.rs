/*!
 * Level Dispatcher
 * The per-tick MLFQ dispatch loop: admission, aging, strict-priority level
 * selection, quantum demotion, and termination
 */

use super::admission;
use super::aging;
use super::clock::{Clock, Pacer};
use super::config::SchedulerConfig;
use super::metrics::{Metrics, MetricsReport};
use super::snapshot::SchedulerSnapshot;
use crate::core::types::{JobId, Tick};
use crate::pcb::{lifecycle, JobQueue, Level, PcbResult, ProcessControl, Status};
use log::{debug, error, info};

/// What one dispatch tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No job was ready; the clock idled forward one unit
    Idle,
    /// The job ran for one tick (and may have been demoted or rotated)
    Ran(JobId),
    /// The job's remaining CPU time ran out and it was terminated
    Finished(JobId),
    /// JDQ and all level queues are empty; the run is over
    Complete,
}

/// The logical running job: at most one at any instant. The job itself
/// stays positioned in its level queue until it terminates or transfers.
#[derive(Debug, Clone, Copy)]
struct Current {
    id: JobId,
    level: Level,
}

/// MLFQ dispatcher. Owns the four queues, the simulated clock, the metrics
/// accumulator, and the process-control capability; a single mutator drives
/// everything, so no locking exists anywhere in the engine.
pub struct Dispatcher {
    jdq: JobQueue,
    levels: [JobQueue; 3],
    current: Option<Current>,
    clock: Clock,
    config: SchedulerConfig,
    metrics: Metrics,
    control: Box<dyn ProcessControl>,
}

impl Dispatcher {
    pub fn new(
        jdq: JobQueue,
        config: SchedulerConfig,
        control: Box<dyn ProcessControl>,
        pacer: Box<dyn Pacer>,
    ) -> Self {
        info!(
            "Dispatcher initialized: {} jobs queued, quanta=({}, {}, {}), W={}",
            jdq.len(),
            config.quantum(Level::Zero),
            config.quantum(Level::One),
            config.quantum(Level::Two),
            config.starvation_threshold()
        );
        Self {
            jdq,
            levels: [JobQueue::new(), JobQueue::new(), JobQueue::new()],
            current: None,
            clock: Clock::new(pacer),
            config,
            metrics: Metrics::new(),
            control,
        }
    }

    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// True once the JDQ and every level queue are empty and nothing runs
    pub fn is_complete(&self) -> bool {
        self.current.is_none()
            && self.jdq.is_empty()
            && self.levels.iter().all(|queue| queue.is_empty())
    }

    /// Serializable view of all four queues at the current tick
    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot::capture(
            self.clock.now(),
            &self.jdq,
            &self.levels,
            self.current.map(|c| c.id),
        )
    }

    /// Run the dispatch loop to completion and report aggregate averages
    pub fn run(&mut self) -> PcbResult<MetricsReport> {
        while self.step()? != StepOutcome::Complete {}
        Ok(self.metrics.report())
    }

    /// One dispatch tick: admit arrivals, run the aging check, then give
    /// the lowest-numbered non-empty level one CPU unit.
    pub fn step(&mut self) -> PcbResult<StepOutcome> {
        if self.is_complete() {
            return Ok(StepOutcome::Complete);
        }

        let now = self.clock.now();
        admission::admit(&mut self.jdq, &mut self.levels, now);

        // One promotion sweep at most, before dispatch. A sweep can move
        // the current job to level 0, so re-home the reference.
        if let Some(sweep) =
            aging::age_check(&mut self.levels, now, self.config.starvation_threshold())
        {
            if let Some(current) = &mut self.current {
                if sweep.covers(current.level) {
                    current.level = Level::Zero;
                }
            }
        }

        let Some(active) = self.lowest_ready_level() else {
            // Jobs still pending in the JDQ but none ready: idle one unit
            self.clock.advance(1);
            return Ok(StepOutcome::Idle);
        };

        self.select(active)?;
        let id = match self.current {
            Some(current) => current.id,
            None => return Ok(StepOutcome::Idle),
        };

        // A job admitted with zero service time terminates on its very
        // first dispatch tick, before the clock moves
        let remaining = self.levels[active.index()]
            .head()
            .map(|job| job.remaining)
            .unwrap_or(0);
        if remaining == 0 {
            self.finish(active)?;
            return Ok(StepOutcome::Finished(id));
        }

        // Run one simulated CPU unit
        self.clock.advance(1);
        let quantum = self.config.quantum(active);
        let (remaining, cycle) = {
            let Some(job) = self.levels[active.index()].head_mut() else {
                // Contract violation: the reference outlived its job
                error!("Running job {} not found in any queue", id);
                self.current = None;
                return Ok(StepOutcome::Idle);
            };
            job.cycle_time += 1;
            job.remaining -= 1;
            (job.remaining, job.cycle_time)
        };

        // Termination takes precedence over demotion
        if remaining == 0 {
            self.finish(active)?;
            return Ok(StepOutcome::Finished(id));
        }
        if cycle >= quantum {
            self.transfer(active)?;
        }
        Ok(StepOutcome::Ran(id))
    }

    fn lowest_ready_level(&self) -> Option<Level> {
        Level::ALL
            .into_iter()
            .find(|level| !self.levels[level.index()].is_empty())
    }

    /// Ensure the head of the active level is the running job. A current
    /// job that is no longer that head has been outranked; it is suspended
    /// in place (it is already positioned in its queue) and the head takes
    /// over. Preemption is strictly by queue priority.
    fn select(&mut self, active: Level) -> PcbResult<()> {
        let head_id = match self.levels[active.index()].head() {
            Some(head) => head.id,
            None => return Ok(()),
        };

        match self.current {
            Some(current) if current.id == head_id => {
                // Revisited without re-selection; resume if a sweep left it stopped
                let Some(job) = self.levels[active.index()].head_mut() else {
                    return Ok(());
                };
                if job.status == Status::Suspended {
                    lifecycle::resume(job, self.control.as_mut())?;
                }
                self.current = Some(Current { id: head_id, level: active });
                Ok(())
            }
            Some(current) => {
                match self.levels[current.level.index()].get_mut(current.id) {
                    Some(job) if job.status == Status::Running => {
                        debug!(
                            "Job {} outranked by job {} at level {}",
                            current.id,
                            head_id,
                            active.priority()
                        );
                        lifecycle::suspend(job, self.control.as_mut())?;
                    }
                    Some(_) => {}
                    None => {
                        // Contract violation: the reference outlived its job
                        error!("Running job {} not found in any queue", current.id);
                    }
                }
                self.start_head(active)
            }
            None => self.start_head(active),
        }
    }

    fn start_head(&mut self, active: Level) -> PcbResult<()> {
        let now = self.clock.now();
        let Some(job) = self.levels[active.index()].head_mut() else {
            return Ok(());
        };
        let first_run = lifecycle::start(job, self.control.as_mut())?;
        if first_run {
            let response = now.saturating_sub(job.arrival_time);
            debug!("Job {} first dispatched at tick {} (response {})", job.id, now, response);
            self.metrics.record_response(response);
        }
        self.current = Some(Current { id: job.id, level: active });
        Ok(())
    }

    /// Terminate the head of `level`: reap the OS process, accumulate
    /// turnaround and waiting time, and release the job record.
    fn finish(&mut self, level: Level) -> PcbResult<()> {
        let Some(mut job) = self.levels[level.index()].dequeue() else {
            return Ok(());
        };
        lifecycle::terminate(&mut job, self.control.as_mut())?;
        let turnaround = self.clock.now().saturating_sub(job.arrival_time);
        self.metrics.record_completion(turnaround, job.service_time);
        info!(
            "Job {} completed at tick {}: turnaround={}, service={}",
            job.id,
            self.clock.now(),
            turnaround,
            job.service_time
        );
        self.current = None;
        Ok(())
    }

    /// Quantum expired: demote the head one level down, or rotate it to its
    /// own tail on the terminal level. Cycle time resets on the transfer.
    fn transfer(&mut self, from: Level) -> PcbResult<()> {
        let to = from.demote();
        let now = self.clock.now();

        {
            let Some(job) = self.levels[from.index()].head_mut() else {
                return Ok(());
            };
            job.cycle_time = 0;
            lifecycle::suspend(job, self.control.as_mut())?;
        }

        let Some(mut job) = self.levels[from.index()].dequeue() else {
            return Ok(());
        };
        job.last_queued = now;
        job.priority = to.priority();
        if from == to {
            debug!("Job {} rotated to the tail of level {}", job.id, to.priority());
        } else {
            debug!(
                "Job {} demoted from level {} to level {}",
                job.id,
                from.priority(),
                to.priority()
            );
        }
        self.levels[to.index()].enqueue(job);
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcb::{Job, MockProcessControl};
    use crate::sched::clock::NoPacing;

    fn dispatcher(jobs: Vec<Job>, config: SchedulerConfig) -> Dispatcher {
        let mut jdq = JobQueue::new();
        for job in jobs {
            jdq.enqueue(job);
        }
        Dispatcher::new(
            jdq,
            config,
            Box::new(MockProcessControl::new()),
            Box::new(NoPacing),
        )
    }

    fn job(id: u32, arrival: Tick, service: u64, priority: i32) -> Job {
        Job::new(id).initialize(arrival, service, priority)
    }

    fn config(t0: u64, t1: u64, t2: u64, w: u64) -> SchedulerConfig {
        SchedulerConfig::new(t0, t1, t2, w).unwrap()
    }

    #[test]
    fn test_empty_run_completes_immediately() {
        let mut d = dispatcher(vec![], config(2, 2, 2, 10));
        assert_eq!(d.step().unwrap(), StepOutcome::Complete);
        assert_eq!(d.now(), 0);
    }

    #[test]
    fn test_single_job_runs_to_termination() {
        let mut d = dispatcher(vec![job(1, 0, 2, 0)], config(4, 4, 4, 10));

        assert_eq!(d.step().unwrap(), StepOutcome::Ran(1));
        assert_eq!(d.step().unwrap(), StepOutcome::Finished(1));
        assert_eq!(d.step().unwrap(), StepOutcome::Complete);
        assert_eq!(d.now(), 2);
        assert_eq!(d.metrics().completed(), 1);
    }

    #[test]
    fn test_zero_service_job_terminates_on_first_dispatch() {
        let mut d = dispatcher(vec![job(1, 0, 0, 0)], config(2, 2, 2, 10));

        assert_eq!(d.step().unwrap(), StepOutcome::Finished(1));
        // Clock never moved: turnaround and response are both zero
        assert_eq!(d.now(), 0);
        let report = d.metrics().report();
        assert_eq!(report.avg_turnaround, 0.0);
        assert_eq!(report.avg_response, 0.0);
    }

    #[test]
    fn test_quantum_exhaustion_demotes() {
        let mut d = dispatcher(vec![job(1, 0, 5, 0)], config(2, 2, 2, 100));

        d.step().unwrap();
        d.step().unwrap();
        // Two ticks at level 0 with t0=2: now sitting in level 1
        assert_eq!(d.levels[0].len(), 0);
        assert_eq!(d.levels[1].len(), 1);
        let demoted = d.levels[1].head().unwrap();
        assert_eq!(demoted.priority, 1);
        assert_eq!(demoted.cycle_time, 0);
        assert_eq!(demoted.last_queued, 2);
        assert_eq!(demoted.remaining, 3);
        assert_eq!(demoted.status, Status::Suspended);
    }

    #[test]
    fn test_level_two_rotates_to_own_tail() {
        let mut d = dispatcher(
            vec![job(1, 0, 4, 2), job(2, 0, 4, 2)],
            config(1, 1, 1, 100),
        );

        assert_eq!(d.step().unwrap(), StepOutcome::Ran(1));
        // Quantum of 1 expired: job 1 rotated behind job 2, same level
        let order: Vec<u32> = d.levels[2].iter().map(|j| j.id).collect();
        assert_eq!(order, vec![2, 1]);
        assert_eq!(d.levels[2].iter().map(|j| j.priority).max(), Some(2));

        assert_eq!(d.step().unwrap(), StepOutcome::Ran(2));
        let order: Vec<u32> = d.levels[2].iter().map(|j| j.id).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn test_strict_level_priority() {
        // Level-2 job arrives first; a level-0 job lands at tick 1 and
        // must preempt at the next re-evaluation
        let mut d = dispatcher(
            vec![job(1, 0, 5, 2), job(2, 1, 2, 0)],
            config(4, 4, 4, 100),
        );

        assert_eq!(d.step().unwrap(), StepOutcome::Ran(1));
        // Tick 1: job 2 admitted to level 0 and outranks job 1
        assert_eq!(d.step().unwrap(), StepOutcome::Ran(2));
        assert_eq!(d.levels[2].head().map(|j| j.status), Some(Status::Suspended));
        assert_eq!(d.step().unwrap(), StepOutcome::Finished(2));
        // Level 0 drained: job 1 resumes
        assert_eq!(d.step().unwrap(), StepOutcome::Ran(1));
    }

    #[test]
    fn test_idle_until_first_arrival() {
        let mut d = dispatcher(vec![job(1, 3, 1, 0)], config(2, 2, 2, 10));

        assert_eq!(d.step().unwrap(), StepOutcome::Idle);
        assert_eq!(d.step().unwrap(), StepOutcome::Idle);
        assert_eq!(d.step().unwrap(), StepOutcome::Idle);
        assert_eq!(d.step().unwrap(), StepOutcome::Finished(1));
        assert_eq!(d.now(), 4);
    }

    #[test]
    fn test_remaining_decrements_by_one_per_tick() {
        let mut d = dispatcher(vec![job(1, 0, 3, 0)], config(10, 10, 10, 100));

        d.step().unwrap();
        assert_eq!(d.levels[0].head().map(|j| j.remaining), Some(2));
        d.step().unwrap();
        assert_eq!(d.levels[0].head().map(|j| j.remaining), Some(1));
    }

    #[test]
    fn test_at_most_one_running() {
        let mut d = dispatcher(
            vec![job(1, 0, 4, 0), job(2, 0, 4, 0), job(3, 0, 4, 1)],
            config(2, 2, 2, 100),
        );

        for _ in 0..6 {
            d.step().unwrap();
            let running: usize = d
                .levels
                .iter()
                .map(|q| q.iter().filter(|j| j.status == Status::Running).count())
                .sum();
            assert!(running <= 1);
        }
    }

    #[test]
    fn test_starvation_sweep_reaches_dispatch() {
        // One long level-0 job keeps level 1 starved until W trips
        let mut d = dispatcher(
            vec![job(1, 0, 10, 0), job(2, 0, 1, 1)],
            config(100, 100, 100, 3),
        );

        assert_eq!(d.step().unwrap(), StepOutcome::Ran(1));
        assert_eq!(d.step().unwrap(), StepOutcome::Ran(1));
        assert_eq!(d.step().unwrap(), StepOutcome::Ran(1));
        // Tick 3: job 2 has waited 3 >= W, promoted behind job 1 at level 0
        assert_eq!(d.step().unwrap(), StepOutcome::Ran(1));
        assert_eq!(d.levels[1].len(), 0);
        let ids: Vec<u32> = d.levels[0].iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(d.levels[0].get_mut(2).map(|j| j.priority), Some(0));
    }
}
