use anyhow::{Context, Result};
use std::process::ExitCode;
use velnorm::cmdline::parse_args;
use velnorm::interrupt::attach_ctrl_c_handler;
use velnorm::telemetry::init_tracing;
use velnorm::worker::{Worker, WorkerEvent};

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn print_event(event: &WorkerEvent) {
    match event {
        WorkerEvent::Started { input } => println!("Processing {}...", input.display()),
        WorkerEvent::Line(line) => println!("{}", line),
        WorkerEvent::Finished(_) => println!("Done."),
        WorkerEvent::Stopped { remaining } => {
            eprintln!("Stopped, {} file(s) left unprocessed", remaining)
        }
    }
}

fn run() -> Result<bool> {
    let jobs = parse_args().into_jobs()?;
    let stop = attach_ctrl_c_handler().context("Can't install the Ctrl-C handler")?;
    let summary = Worker::spawn(jobs, stop).wait(print_event);
    if summary.panicked {
        eprintln!("Error: the worker thread panicked");
    }
    Ok(summary.is_success())
}
