/*!
 * Job List Input
 * Parses the comma-separated job description list into the JDQ
 */

use crate::pcb::{Job, JobQueue};
use log::{info, warn};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Job list errors
#[derive(Error, Debug)]
pub enum JobsError {
    #[error("Could not read job list {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Load a job list: one `arrival, service, priority` integer triple per
/// record, in file order. Malformed records are skipped with a warning,
/// mirroring the lenient scan of the original format. An unreadable file
/// is fatal to the run.
pub fn load(path: impl AsRef<Path>) -> Result<JobQueue, JobsError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| JobsError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;

    let mut jdq = JobQueue::new();
    let mut next_id = 0;
    for (lineno, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(line) {
            Some((arrival, service, priority)) => {
                next_id += 1;
                jdq.enqueue(Job::new(next_id).initialize(arrival, service, priority));
            }
            None => {
                warn!(
                    "Skipping malformed job record at {}:{}: {:?}",
                    path.display(),
                    lineno + 1,
                    line
                );
            }
        }
    }

    info!("Loaded {} jobs from {}", jdq.len(), path.display());
    Ok(jdq)
}

fn parse_record(line: &str) -> Option<(u64, u64, i32)> {
    let mut fields = line.split(',').map(str::trim);
    let arrival = fields.next()?.parse().ok()?;
    let service = fields.next()?.parse().ok()?;
    let priority = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((arrival, service, priority))
}
