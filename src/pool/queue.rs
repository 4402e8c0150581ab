//! # FIFO task queue.
//!
//! [`TaskQueue`] stores boxed jobs behind a single mutex. It never blocks:
//! [`TaskQueue::pop`] reports `None` on an empty queue, and waiting for work
//! is composed by the worker loop with its own condition variable.
//!
//! ## Rules
//! - Jobs are popped in the order they were pushed.
//! - Once [`TaskQueue::close`] ran, pushes are refused and the job is handed back.
//! - Closing drops every pending job without running it.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;

/// A unit of work: a closure that already captured its arguments and result slot.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

struct State {
    jobs: VecDeque<Job>,
    closed: bool,
}

/// Thread-safe FIFO of [`Job`]s.
pub struct TaskQueue {
    state: Mutex<State>,
}

impl TaskQueue {
    /// Creates an empty, open queue.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                jobs: VecDeque::new(),
                closed: false,
            }),
        }
    }

    /// Appends a job at the back.
    ///
    /// Returns the job back as `Err` if the queue is closed.
    pub fn push(&self, job: Job) -> Result<(), Job> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(job);
        }
        state.jobs.push_back(job);
        Ok(())
    }

    /// Removes the front job, or returns `None` if the queue is empty.
    pub fn pop(&self) -> Option<Job> {
        self.state.lock().jobs.pop_front()
    }

    /// Number of jobs waiting.
    pub fn len(&self) -> usize {
        self.state.lock().jobs.len()
    }

    /// Returns `true` if no job is waiting.
    pub fn is_empty(&self) -> bool {
        self.state.lock().jobs.is_empty()
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Refuses further pushes and drops all pending jobs.
    ///
    /// Returns how many jobs were discarded. Calling it again returns `0`.
    pub fn close(&self) -> usize {
        let discarded = {
            let mut state = self.state.lock();
            state.closed = true;
            std::mem::take(&mut state.jobs)
        };
        // Dropped outside the lock: a job's captures may run arbitrary `Drop` code.
        discarded.len()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TaskQueue")
            .field("len", &state.jobs.len())
            .field("closed", &state.closed)
            .finish()
    }
}
