/*!
 * MLFQ Dispatcher - Main Entry Point
 *
 * Reads a job list, prompts for the per-level quanta and the starvation
 * threshold, then drives the jobs through the three-level feedback queue
 * as real OS processes.
 */

use std::env;
use std::error::Error;
use std::io::{self, Write};

use log::info;
use mlfq_dispatcher::{jobs, Dispatcher, SchedulerConfig, StepOutcome, UnixProcessControl, WallClock};

/// Every job execs this fixed executable with no arguments beyond its name
const WORKER_COMMAND: &str = "./process";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        let program = args.first().map(String::as_str).unwrap_or("dispatcher");
        return Err(format!("USAGE: {} <JOBSFILE>", program).into());
    }

    let (t0, t1, t2, w) = prompt_parameters()?;
    let config = SchedulerConfig::new(t0, t1, t2, w)?;

    let jdq = jobs::load(&args[1])?;
    info!("Dispatching {} jobs", jdq.len());

    let mut dispatcher = Dispatcher::new(
        jdq,
        config,
        Box::new(UnixProcessControl::new(WORKER_COMMAND)),
        Box::new(WallClock::default()),
    );

    loop {
        print!("{}", dispatcher.snapshot().render());
        if dispatcher.step()? == StepOutcome::Complete {
            break;
        }
    }

    let report = dispatcher.metrics().report();
    println!("Completed jobs:          {}", report.completed);
    println!("Average turnaround time: {:.2}", report.avg_turnaround);
    println!("Average waiting time:    {:.2}", report.avg_waiting);
    println!("Average response time:   {:.2}", report.avg_response);

    Ok(())
}

/// Interactively collect t0, t1, t2, and W, re-prompting until each is a
/// positive integer
fn prompt_parameters() -> io::Result<(u64, u64, u64, u64)> {
    let t0 = prompt_positive("time quantum for Level-0 (t0)")?;
    let t1 = prompt_positive("time quantum for Level-1 (t1)")?;
    let t2 = prompt_positive("time quantum for Level-2 (t2)")?;
    let w = prompt_positive("starvation prevention time (W)")?;
    Ok((t0, t1, t2, w))
}

fn prompt_positive(label: &str) -> io::Result<u64> {
    loop {
        print!("Enter {}: ", label);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed before all parameters were provided",
            ));
        }
        match line.trim().parse::<u64>() {
            Ok(value) if value > 0 => return Ok(value),
            _ => eprintln!("ERROR: Enter a positive integer"),
        }
    }
}
