//! Fixed-size worker pool with per-task result handles.
//!
//! Tasks are queued on an unbounded channel and picked up by whichever worker
//! is free. Each submission returns a [`PendingResult`]; awaiting those handles
//! in submission order yields results in submission order regardless of the
//! order in which workers finish.

use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use thiserror::Error;
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Why a submitted task produced no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskFailure {
    #[error("task panicked: {0}")]
    Panicked(String),
    #[error("worker pool shut down before the task completed")]
    Disconnected,
}

/// Handle to the eventual result of a submitted task.
#[derive(Debug)]
pub struct PendingResult<T> {
    receiver: Receiver<Result<T, TaskFailure>>,
}

impl<T> PendingResult<T> {
    /// Block until the task finishes.
    pub fn wait(self) -> Result<T, TaskFailure> {
        self.receiver
            .recv()
            .unwrap_or(Err(TaskFailure::Disconnected))
    }
}

/// A bounded set of threads executing submitted closures.
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers. A size of zero is treated as one.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let (sender, receiver) = unbounded::<Job>();
        let workers = (0..size)
            .filter_map(|index| spawn_worker(index, receiver.clone()))
            .collect::<Vec<_>>();
        debug!(workers = workers.len(), "worker pool started");
        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Number of live workers.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a task without waiting for it.
    ///
    /// Panics inside the task are caught and surface as
    /// [`TaskFailure::Panicked`] from [`PendingResult::wait`].
    pub fn submit<T, F>(&self, task: F) -> PendingResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (result_tx, result_rx) = bounded(1);
        let job: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task))
                .map_err(|payload| TaskFailure::Panicked(panic_message(payload.as_ref())));
            // The caller may have stopped waiting; that is not an error here.
            let _ = result_tx.send(outcome);
        });
        if self.workers.is_empty() {
            job();
        } else if let Some(sender) = &self.sender
            && sender.send(job).is_err()
        {
            warn!("worker pool queue closed; task dropped");
        }
        PendingResult {
            receiver: result_rx,
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the queue lets workers finish outstanding jobs and exit.
        self.sender.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("worker thread terminated abnormally");
            }
        }
    }
}

/// Host parallelism, or one when it cannot be determined.
pub fn available_parallelism() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn spawn_worker(index: usize, receiver: Receiver<Job>) -> Option<JoinHandle<()>> {
    let spawned = thread::Builder::new()
        .name(format!("flattx-worker-{index}"))
        .spawn(move || {
            while let Ok(job) = receiver.recv() {
                job();
            }
        });
    match spawned {
        Ok(handle) => Some(handle),
        Err(error) => {
            warn!(index, %error, "failed to spawn worker thread");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn results_come_back_in_submission_order() {
        let pool = WorkerPool::new(4);
        let pending: Vec<_> = (0..16u64)
            .map(|i| {
                pool.submit(move || {
                    thread::sleep(Duration::from_millis((16 - i) % 5));
                    i * 10
                })
            })
            .collect();
        let results: Vec<u64> = pending.into_iter().map(|p| p.wait().unwrap()).collect();
        assert_eq!(results, (0..16).map(|i| i * 10).collect::<Vec<_>>());
    }

    #[test]
    fn panics_are_contained() {
        let pool = WorkerPool::new(1);
        let failed = pool.submit(|| -> u8 { panic!("boom") });
        let ok = pool.submit(|| 7u8);
        assert_eq!(failed.wait(), Err(TaskFailure::Panicked("boom".to_string())));
        assert_eq!(ok.wait(), Ok(7));
    }

    #[test]
    fn zero_size_still_runs_tasks() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.submit(|| "done").wait(), Ok("done"));
    }
}
