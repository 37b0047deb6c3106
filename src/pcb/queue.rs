/*!
 * Job Queue
 * Owned FIFO queue of process control blocks
 */

use super::types::Job;
use crate::core::types::JobId;
use std::collections::VecDeque;

/// FIFO queue of jobs. A job is owned by exactly one queue at a time;
/// moving it elsewhere is a dequeue followed by an enqueue of the owned
/// value, so the single-owner invariant holds by construction.
#[derive(Debug, Default)]
pub struct JobQueue {
    jobs: VecDeque<Job>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self {
            jobs: VecDeque::new(),
        }
    }

    /// Append to the tail
    pub fn enqueue(&mut self, job: Job) {
        self.jobs.push_back(job);
    }

    /// Remove and return the head; `None` when empty
    pub fn dequeue(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    pub fn head(&self) -> Option<&Job> {
        self.jobs.front()
    }

    pub fn head_mut(&mut self) -> Option<&mut Job> {
        self.jobs.front_mut()
    }

    pub fn get_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|j| j.id == id)
    }

    /// Remove every job, preserving FIFO order
    pub fn drain(&mut self) -> impl Iterator<Item = Job> + '_ {
        self.jobs.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
