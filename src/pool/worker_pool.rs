//! # Fixed-size worker pool.
//!
//! [`WorkerPool`] owns a set of persistent OS threads draining one FIFO
//! [`TaskQueue`](super::queue::TaskQueue).
//!
//! ## Architecture
//! ```text
//! submit(f) ──► wrap f (catch_unwind + result slot) ──► TaskQueue::push ──► notify_one
//!                                                             │
//!                                   ┌─────────────────────────┼──────────────────────┐
//!                                   ▼                         ▼                      ▼
//!                               worker 0                  worker 1      ...      worker N-1
//!                                   │
//!                                   └──► job() ──► result slot ──► TaskHandle::join / .await
//! ```
//!
//! ## Rules
//! - Dequeue order is submission order; completion order is not.
//! - A panicking task never takes its worker down; the panic lands in its handle.
//! - After [`shutdown`](WorkerPool::shutdown) starts, submissions fail with
//!   [`PoolError::Closed`] and queued tasks are dropped unexecuted; their
//!   handles resolve to [`TaskError::Discarded`](crate::TaskError::Discarded).
//!
//! ## Example
//! ```rust
//! use taskbus::WorkerPool;
//!
//! let pool = WorkerPool::new(2)?;
//! let (a, b) = (1, 2);
//! let sum = pool.submit(move || a + b)?;
//! assert_eq!(sum.join()?, 3);
//! pool.shutdown();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;

use super::handle::TaskHandle;
use super::queue::Job;
use super::worker::{self, Shared};
use crate::config::PoolConfig;
use crate::error::{PoolError, TaskError, panic_message};

/// Fixed set of worker threads executing submitted closures.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_ids: Vec<ThreadId>,
}

impl WorkerPool {
    /// Creates a pool with `workers` threads (`0` = hardware parallelism).
    ///
    /// All workers are started before this returns.
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        Self::with_config(PoolConfig::with_workers(workers))
    }

    /// Creates a pool from a full [`PoolConfig`].
    ///
    /// If a worker thread cannot be spawned, the workers started so far are
    /// shut down and [`PoolError::Spawn`] is returned.
    pub fn with_config(cfg: PoolConfig) -> Result<Self, PoolError> {
        let count = cfg.worker_count();
        let shared = Arc::new(Shared::new());
        let mut pool = Self {
            shared,
            workers: Mutex::new(Vec::with_capacity(count)),
            worker_ids: Vec::with_capacity(count),
        };

        for index in 0..count {
            let mut builder = thread::Builder::new().name(format!("{}-{index}", cfg.thread_name));
            if let Some(size) = cfg.stack_size {
                builder = builder.stack_size(size);
            }
            let shared = Arc::clone(&pool.shared);
            match builder.spawn(move || worker::run(&shared, index)) {
                Ok(handle) => {
                    pool.worker_ids.push(handle.thread().id());
                    pool.workers.get_mut().push(handle);
                }
                Err(source) => {
                    tracing::error!(worker = index, error = %source, "failed to spawn worker");
                    pool.shutdown();
                    return Err(PoolError::Spawn { index, source });
                }
            }
        }
        Ok(pool)
    }

    /// Submits a closure and returns a handle to its result.
    ///
    /// Arguments are bound by capturing them in the closure. The call never
    /// blocks on the task itself.
    ///
    /// ### Failure capture
    /// - A panic inside `f` becomes [`TaskError::Panicked`] in the handle.
    /// - A closure returning `Result<T, E>` hands that `Result` through unchanged.
    pub fn submit<F, R>(&self, f: F) -> Result<TaskHandle<R>, PoolError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, handle) = TaskHandle::channel();
        self.enqueue(Box::new(move || {
            let res = panic::catch_unwind(AssertUnwindSafe(f))
                .map_err(|payload| TaskError::from_panic(&*payload));
            // The submitter may have dropped its handle; the result is then unobserved.
            let _ = tx.send(res);
        }))?;
        Ok(handle)
    }

    /// Submits a closure whose result nobody waits for.
    ///
    /// A panic inside `f` is caught and logged.
    pub fn execute<F>(&self, f: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(Box::new(move || {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
                tracing::error!(panic = %panic_message(&*payload), "detached task panicked");
            }
        }))
    }

    fn enqueue(&self, job: Job) -> Result<(), PoolError> {
        if self.shared.queue.push(job).is_err() {
            tracing::warn!("task submitted after shutdown; rejected");
            return Err(PoolError::Closed);
        }
        self.shared.notify_one();
        Ok(())
    }

    /// Stops the pool and joins every worker.
    ///
    /// 1. Flips the running flag and closes the queue (queued tasks are dropped)
    /// 2. Wakes all workers
    /// 3. Joins them; tasks already running finish first
    ///
    /// ### Notes
    /// - Idempotent, and safe to call from several threads at once: every caller
    ///   returns after the workers are joined.
    /// - Called from inside one of this pool's tasks, it stops the pool but does
    ///   not wait for the workers.
    pub fn shutdown(&self) {
        if self.shared.stop() {
            let discarded = self.shared.queue.close();
            if discarded > 0 {
                tracing::debug!(discarded, "queued tasks discarded on shutdown");
            }
            self.shared.notify_all();
        }

        if self.worker_ids.contains(&thread::current().id()) {
            return;
        }

        let mut workers = self.workers.lock();
        for handle in workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }
    }

    /// Number of worker threads this pool was started with.
    pub fn worker_count(&self) -> usize {
        self.worker_ids.len()
    }

    /// Number of tasks waiting in the queue.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    /// Number of tasks currently running.
    pub fn active(&self) -> usize {
        self.shared.active()
    }

    /// Number of tasks run to completion so far.
    pub fn completed(&self) -> u64 {
        self.shared.completed()
    }

    /// Returns `false` once shutdown has started.
    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.worker_count())
            .field("pending", &self.pending())
            .field("active", &self.active())
            .field("running", &self.is_running())
            .finish()
    }
}
