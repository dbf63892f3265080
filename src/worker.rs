use crate::{
    job::{Job, JobOutcome},
    ops::Status,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};
use tracing::debug;

/// Progress of a batch, as seen from the foreground
#[derive(Clone, Debug, PartialEq)]
pub enum WorkerEvent {
    Started { input: PathBuf },
    Line(String),
    Finished(JobOutcome),
    /// The stop flag was raised. `remaining` jobs were never started.
    Stopped { remaining: usize },
}

/// Runs jobs one after another on a background thread and streams their
/// transcripts back over a channel
pub struct Worker {
    events: Receiver<WorkerEvent>,
    handle: JoinHandle<()>,
}

impl Worker {
    /// Starts working through `jobs`. `stop` is checked before each job; a job
    /// that has started always runs to completion.
    pub fn spawn(jobs: Vec<Job>, stop: Arc<AtomicBool>) -> Self {
        let (tx, rx) = unbounded();
        let handle = thread::spawn(move || run_jobs(jobs, &stop, &tx));
        Self { events: rx, handle }
    }

    /// Blocks until the batch is done, handing every event to `on_event`
    pub fn wait(self, mut on_event: impl FnMut(&WorkerEvent)) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for event in self.events.iter() {
            summary.record(&event);
            on_event(&event);
        }
        if self.handle.join().is_err() {
            summary.panicked = true;
        }
        summary
    }
}

fn run_jobs(jobs: Vec<Job>, stop: &AtomicBool, tx: &Sender<WorkerEvent>) {
    let total = jobs.len();
    for (done, job) in jobs.into_iter().enumerate() {
        if stop.load(Ordering::SeqCst) {
            debug!(remaining = total - done, "batch stopped");
            let _ = tx.send(WorkerEvent::Stopped {
                remaining: total - done,
            });
            return;
        }
        let started = WorkerEvent::Started {
            input: job.input().to_path_buf(),
        };
        if tx.send(started).is_err() {
            // nobody is listening any more
            return;
        }
        let outcome = job.run();
        for line in outcome.report.lines() {
            let _ = tx.send(WorkerEvent::Line(line.clone()));
        }
        let _ = tx.send(WorkerEvent::Finished(outcome));
    }
}

/// Tally of job statuses over a batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub empty: usize,
    pub failed: usize,
    pub skipped: usize,
    pub panicked: bool,
}

impl BatchSummary {
    pub fn record(&mut self, event: &WorkerEvent) {
        match event {
            WorkerEvent::Finished(outcome) => match outcome.status {
                Status::Completed => self.completed += 1,
                Status::EmptyInput => self.empty += 1,
                Status::LoadFailure | Status::SaveFailure => self.failed += 1,
            },
            WorkerEvent::Stopped { remaining } => self.skipped += remaining,
            WorkerEvent::Started { .. } | WorkerEvent::Line(_) => {}
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && !self.panicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{options::EqualizeOptions, test_helpers::*};

    fn equalize_job(input: PathBuf) -> Job {
        Job::equalize(input, None, EqualizeOptions::default()).unwrap()
    }

    #[test]
    fn streams_transcripts_in_job_order() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_midi(dir.path(), "good.mid", phantom_tracks());
        let missing = dir.path().join("missing.mid");
        let worker = Worker::spawn(
            vec![equalize_job(missing.clone()), equalize_job(good.clone())],
            Arc::new(AtomicBool::new(false)),
        );

        let mut events = vec![];
        let summary = worker.wait(|event| events.push(event.clone()));

        assert_eq!(
            summary,
            BatchSummary {
                completed: 1,
                failed: 1,
                ..Default::default()
            }
        );
        assert!(!summary.is_success());
        assert_eq!(events[0], WorkerEvent::Started { input: missing });
        assert!(matches!(&events[1], WorkerEvent::Line(line) if line.starts_with("Error loading")));
        assert!(matches!(&events[2], WorkerEvent::Finished(outcome) if outcome.status == Status::LoadFailure));
        assert_eq!(events[3], WorkerEvent::Started { input: good });
        let lines = events
            .iter()
            .filter_map(|event| match event {
                WorkerEvent::Line(line) => Some(line.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert!(lines.contains(&"Target Level: 80% (Factor: 0.80)"));
        assert!(lines.last().unwrap().starts_with("Successfully saved equalized MIDI to: "));
        assert!(matches!(events.last(), Some(WorkerEvent::Finished(outcome)) if outcome.status == Status::Completed));
    }

    #[test]
    fn raised_stop_flag_skips_remaining_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_midi(dir.path(), "song.mid", phantom_tracks());
        let worker = Worker::spawn(
            vec![equalize_job(input.clone()), equalize_job(input)],
            Arc::new(AtomicBool::new(true)),
        );
        let mut events = vec![];
        let summary = worker.wait(|event| events.push(event.clone()));
        assert_eq!(events, vec![WorkerEvent::Stopped { remaining: 2 }]);
        assert_eq!(summary.skipped, 2);
        assert!(summary.is_success());
        assert!(!dir.path().join("song_equalized.mid").exists());
    }

    #[test]
    fn empty_batch_finishes_immediately() {
        let worker = Worker::spawn(vec![], Arc::new(AtomicBool::new(false)));
        assert_eq!(worker.wait(|_| {}), BatchSummary::default());
    }
}
