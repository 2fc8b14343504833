//! Fixed-size pool of verification workers fed through a bounded queue.
//!
//! Every job carries its own result sink, so callers can route each result
//! back to whoever asked for it. [`WorkerPool::submit`] blocks while the queue
//! is full. [`WorkerPool::shutdown`] closes the queue and waits until every
//! queued job has been processed.

mod error;

pub use error::PoolError;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::verifier::{VerificationResult, Verifier};

/// Where a worker delivers the result of one job.
pub type ResultSink = mpsc::Sender<VerificationResult>;

struct Job {
    email: String,
    sink: ResultSink,
}

type JobQueue = Arc<Mutex<Receiver<Job>>>;

pub struct WorkerPool {
    sender: Option<SyncSender<Job>>,
    workers: Vec<JoinHandle<()>>,
    completed: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Spawns `worker_count` threads sharing a queue of `queue_capacity` jobs.
    pub fn start(
        verifier: Arc<Verifier>,
        worker_count: usize,
        queue_capacity: usize,
    ) -> Result<Self, PoolError> {
        if worker_count == 0 {
            return Err(PoolError::InvalidConfig("worker count must be at least 1"));
        }
        if queue_capacity == 0 {
            return Err(PoolError::InvalidConfig("queue capacity must be at least 1"));
        }

        let (sender, receiver) = mpsc::sync_channel(queue_capacity);
        let queue: JobQueue = Arc::new(Mutex::new(receiver));
        let completed = Arc::new(AtomicUsize::new(0));

        let mut workers = Vec::with_capacity(worker_count);
        for id in 0..worker_count {
            let worker = Worker {
                id,
                verifier: Arc::clone(&verifier),
                queue: Arc::clone(&queue),
                completed: Arc::clone(&completed),
            };
            let spawned = thread::Builder::new()
                .name(format!("mailnull-worker-{id}"))
                .spawn(move || worker.run());
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(source) => {
                    drop(sender);
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(PoolError::Spawn { source });
                }
            }
        }

        info!(
            workers = worker_count,
            queue_capacity,
            mode = %verifier.mode(),
            "worker pool started"
        );
        Ok(Self {
            sender: Some(sender),
            workers,
            completed,
        })
    }

    /// Enqueues `email`; its result is sent to `sink`. Blocks while the queue
    /// is full.
    pub fn submit(&self, email: impl Into<String>, sink: ResultSink) -> Result<(), PoolError> {
        let sender = self.sender.as_ref().ok_or(PoolError::Closed)?;
        let job = Job {
            email: email.into(),
            sink,
        };
        sender.send(job).map_err(|_| PoolError::Closed)
    }

    /// Number of jobs processed so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Closes the queue, waits for every worker to drain it and exit, and
    /// returns the number of processed jobs.
    pub fn shutdown(mut self) -> usize {
        self.close();
        self.completed()
    }

    fn close(&mut self) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        drop(sender);
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("worker thread terminated abnormally");
            }
        }
        info!(completed = self.completed(), "worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close();
    }
}

struct Worker {
    id: usize,
    verifier: Arc<Verifier>,
    queue: JobQueue,
    completed: Arc<AtomicUsize>,
}

impl Worker {
    fn run(self) {
        debug!(worker = self.id, "worker started");
        // The lock is released before the job runs.
        while let Ok(job) = self.next_job() {
            self.process(job);
        }
        debug!(worker = self.id, "queue closed, worker exiting");
    }

    fn next_job(&self) -> Result<Job, mpsc::RecvError> {
        self.queue.lock().recv()
    }

    fn process(&self, job: Job) {
        let Job { email, sink } = job;
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.verifier.verify(&email)))
            .unwrap_or_else(|_| {
                error!(worker = self.id, %email, "verification panicked");
                VerificationResult::internal_failure(&email)
            });
        self.completed.fetch_add(1, Ordering::SeqCst);
        if sink.send(result).is_err() {
            warn!(worker = self.id, %email, "result receiver dropped, discarding result");
        }
    }
}
