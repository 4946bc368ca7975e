//! Worker pool for parallel entity dispatch
//!
//! A fixed set of named worker threads pull boxed jobs from a shared
//! crossbeam channel. [`WorkerPool::for_each_partitioned`] splits a member
//! list into one contiguous chunk per worker and blocks on a wait group
//! until every chunk has been processed.

use crossbeam::channel::{unbounded, Receiver, Sender};
use crossbeam::sync::WaitGroup;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use super::entity::Entity;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size pool of worker threads
pub struct WorkerPool {
    workers: Vec<Worker>,
    sender: Option<Sender<Job>>,
}

impl WorkerPool {
    /// Spawn `size` workers
    ///
    /// `size` must be at least one; config validation rejects zero before
    /// the pool is built.
    pub fn new(size: usize) -> io::Result<Self> {
        if size == 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "worker pool needs at least one thread"));
        }

        let (sender, receiver) = unbounded::<Job>();
        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            workers.push(Worker::spawn(id, receiver.clone())?);
        }

        log::debug!("Started worker pool with {size} threads");
        Ok(Self { workers, sender: Some(sender) })
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Run `task` over contiguous chunks of `items`, one chunk per worker,
    /// and return once every chunk is done
    ///
    /// A panicking chunk is logged and counted as done, so the barrier
    /// always releases.
    pub fn for_each_partitioned<F>(&self, items: Vec<Entity>, task: F)
    where
        F: Fn(&[Entity]) + Send + Sync + 'static,
    {
        if items.is_empty() {
            return;
        }

        let items: Arc<[Entity]> = items.into();
        let task = Arc::new(task);
        let chunk_size = items.len().div_ceil(self.workers.len());
        let barrier = WaitGroup::new();

        let mut start = 0;
        while start < items.len() {
            let end = (start + chunk_size).min(items.len());
            let items = Arc::clone(&items);
            let task = Arc::clone(&task);
            let done = barrier.clone();
            let job: Job = Box::new(move || {
                task(&items[start..end]);
                drop(done);
            });

            match &self.sender {
                Some(sender) => {
                    if let Err(failed) = sender.send(job) {
                        log::warn!("Worker pool closed, running chunk on the calling thread");
                        (failed.into_inner())();
                    }
                }
                None => job(),
            }
            start = end;
        }

        barrier.wait();
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the channel ends every worker loop
        drop(self.sender.take());

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    log::error!("Worker {} terminated abnormally", worker.id);
                }
            }
        }
    }
}

struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn spawn(id: usize, receiver: Receiver<Job>) -> io::Result<Self> {
        let thread = thread::Builder::new()
            .name(format!("engine2d-worker-{id}"))
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        log::error!("System update panicked on worker {id}");
                    }
                }
                log::trace!("Worker {id} shutting down");
            })?;

        Ok(Self { id, thread: Some(thread) })
    }
}
