//! # Worker loop.
//!
//! Each worker thread runs [`run`] until the pool stops.
//!
//! ```text
//! WAITING ── job popped ──► RUNNING (one job, to completion) ──► WAITING
//!    └──── running == false ──► exit
//! ```
//!
//! Waiting happens on `Shared::available` while holding `Shared::signal`;
//! the queue keeps its own lock. Submitters push first, then take `signal`
//! before notifying, so a worker between its empty-check and its wait
//! cannot miss the wake-up.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::{Condvar, Mutex};

use super::queue::TaskQueue;

/// State shared by the pool handle and all its workers.
pub(crate) struct Shared {
    pub(crate) queue: TaskQueue,
    running: AtomicBool,
    signal: Mutex<()>,
    available: Condvar,
    active: AtomicUsize,
    completed: AtomicU64,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            queue: TaskQueue::new(),
            running: AtomicBool::new(true),
            signal: Mutex::new(()),
            available: Condvar::new(),
            active: AtomicUsize::new(0),
            completed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Flips the running flag; returns `true` for the caller that actually stopped it.
    pub(crate) fn stop(&self) -> bool {
        self.running.swap(false, Ordering::AcqRel)
    }

    /// Wakes one idle worker after a push.
    pub(crate) fn notify_one(&self) {
        let _signal = self.signal.lock();
        self.available.notify_one();
    }

    /// Wakes every worker, used on shutdown.
    pub(crate) fn notify_all(&self) {
        let _signal = self.signal.lock();
        self.available.notify_all();
    }

    pub(crate) fn active(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    pub(crate) fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }
}

/// Body of a worker thread.
///
/// Jobs are expected to contain their own panic handling (see `WorkerPool::submit`),
/// so a job returning always brings the worker back to `WAITING`.
pub(crate) fn run(shared: &Shared, index: usize) {
    tracing::debug!(worker = index, "worker started");
    loop {
        let job = {
            let mut signal = shared.signal.lock();
            loop {
                if !shared.is_running() {
                    tracing::debug!(worker = index, "worker stopped");
                    return;
                }
                if let Some(job) = shared.queue.pop() {
                    break job;
                }
                shared.available.wait(&mut signal);
            }
        };

        shared.active.fetch_add(1, Ordering::Relaxed);
        job();
        shared.active.fetch_sub(1, Ordering::Relaxed);
        shared.completed.fetch_add(1, Ordering::Relaxed);
    }
}
