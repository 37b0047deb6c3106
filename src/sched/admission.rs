/*!
 * Queue Admission
 * Moves arrived jobs from the job dispatch queue into their level queues
 */

use crate::core::types::Tick;
use crate::pcb::{JobQueue, Level};
use log::{debug, warn};

/// Admit every JDQ job whose arrival time has elapsed, routing it to the
/// level its declared priority names. A job with an unrecognized priority
/// is returned to the JDQ tail rather than dropped; the scan is bounded by
/// the queue length at entry so such a job cannot spin the loop. Idempotent
/// per tick: with no newly eligible arrivals this is a no-op.
pub fn admit(jdq: &mut JobQueue, levels: &mut [JobQueue; 3], now: Tick) -> usize {
    let mut admitted = 0;

    for _ in 0..jdq.len() {
        match jdq.head() {
            Some(head) if head.arrival_time <= now => {}
            _ => break,
        }

        let Some(mut job) = jdq.dequeue() else { break };
        match Level::from_priority(job.priority) {
            Some(level) => {
                job.last_queued = now;
                debug!("Job {} admitted to level {} at tick {}", job.id, job.priority, now);
                levels[level.index()].enqueue(job);
                admitted += 1;
            }
            None => {
                warn!(
                    "Job {} declares unrecognized priority {}, returning to JDQ",
                    job.id, job.priority
                );
                jdq.enqueue(job);
            }
        }
    }

    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcb::Job;

    fn queues() -> [JobQueue; 3] {
        [JobQueue::new(), JobQueue::new(), JobQueue::new()]
    }

    fn job(id: u32, arrival: Tick, priority: i32) -> Job {
        Job::new(id).initialize(arrival, 5, priority)
    }

    #[test]
    fn test_routes_by_priority() {
        let mut jdq = JobQueue::new();
        let mut levels = queues();
        jdq.enqueue(job(1, 0, 0));
        jdq.enqueue(job(2, 0, 2));
        jdq.enqueue(job(3, 0, 1));

        assert_eq!(admit(&mut jdq, &mut levels, 0), 3);
        assert_eq!(levels[0].head().map(|j| j.id), Some(1));
        assert_eq!(levels[1].head().map(|j| j.id), Some(3));
        assert_eq!(levels[2].head().map(|j| j.id), Some(2));
        assert!(jdq.is_empty());
    }

    #[test]
    fn test_stops_at_unarrived_head() {
        let mut jdq = JobQueue::new();
        let mut levels = queues();
        jdq.enqueue(job(1, 5, 0));
        jdq.enqueue(job(2, 0, 0)); // arrived, but behind an unarrived head

        assert_eq!(admit(&mut jdq, &mut levels, 2), 0);
        assert_eq!(jdq.len(), 2);
        assert_eq!(jdq.head().map(|j| j.id), Some(1));
    }

    #[test]
    fn test_stamps_last_queued() {
        let mut jdq = JobQueue::new();
        let mut levels = queues();
        jdq.enqueue(job(1, 0, 1));

        admit(&mut jdq, &mut levels, 7);
        assert_eq!(levels[1].head().map(|j| j.last_queued), Some(7));
    }

    #[test]
    fn test_unrecognized_priority_returns_to_tail() {
        let mut jdq = JobQueue::new();
        let mut levels = queues();
        jdq.enqueue(job(1, 0, 9));
        jdq.enqueue(job(2, 0, 0));

        // Bad job cycles to the tail, good job is admitted, loop terminates
        assert_eq!(admit(&mut jdq, &mut levels, 0), 1);
        assert_eq!(jdq.len(), 1);
        assert_eq!(jdq.head().map(|j| j.id), Some(1));
        assert_eq!(levels[0].head().map(|j| j.id), Some(2));
    }

    #[test]
    fn test_idempotent_within_a_tick() {
        let mut jdq = JobQueue::new();
        let mut levels = queues();
        jdq.enqueue(job(1, 0, 0));
        jdq.enqueue(job(2, 4, 1));

        assert_eq!(admit(&mut jdq, &mut levels, 1), 1);
        // Re-invoking with no new arrivals changes nothing
        assert_eq!(admit(&mut jdq, &mut levels, 1), 0);
        assert_eq!(jdq.len(), 1);
        assert_eq!(levels[0].len(), 1);
        assert_eq!(levels[1].len(), 0);
    }
}
