/*!
 * Starvation Aging Monitor
 * Promotes long-waiting lower-level backlogs back to level 0
 */

use crate::core::types::Tick;
use crate::pcb::{Job, JobQueue, Level};
use log::info;

/// One promotion sweep: the level whose starved head triggered it and how
/// many jobs moved to level 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    pub from: Level,
    pub moved: usize,
}

impl Sweep {
    /// Whether the sweep emptied the given level into level 0
    pub fn covers(&self, level: Level) -> bool {
        match self.from {
            Level::One => level == Level::One || level == Level::Two,
            _ => level == self.from,
        }
    }
}

/// Run the once-per-tick aging check, before dispatch. If level-1's head
/// has waited at least `threshold`, every level-1 and level-2 job moves to
/// level 0; otherwise, if level-2's head has, every level-2 job moves.
/// Level-1 starvation takes precedence: at most one sweep per tick.
pub fn age_check(levels: &mut [JobQueue; 3], now: Tick, threshold: u64) -> Option<Sweep> {
    let starved = |queue: &JobQueue| {
        queue
            .head()
            .map(|job| job.waiting_since_queued(now) >= threshold)
            .unwrap_or(false)
    };

    let from = if starved(&levels[Level::One.index()]) {
        Level::One
    } else if starved(&levels[Level::Two.index()]) {
        Level::Two
    } else {
        return None;
    };

    let mut promoted: Vec<Job> = Vec::new();
    if from == Level::One {
        promoted.extend(levels[Level::One.index()].drain());
    }
    promoted.extend(levels[Level::Two.index()].drain());

    let moved = promoted.len();
    for mut job in promoted {
        job.priority = Level::Zero.priority();
        job.last_queued = now;
        // Queued jobs already carry a zero cycle count; the one exception
        // is a swept running job, which starts a fresh quantum at level 0
        job.cycle_time = 0;
        levels[Level::Zero.index()].enqueue(job);
    }

    info!(
        "Starvation sweep at tick {}: {} jobs promoted from level {} and below",
        now,
        moved,
        from.priority()
    );

    Some(Sweep { from, moved })
}
