//! # Timer thread for delayed publishes.
//!
//! [`Timer`] owns a min-heap of `(deadline, seq, job)` entries and one thread
//! that fires them in deadline order.
//!
//! ## State machine
//! ```text
//! IDLE   (heap empty)     ── wait for schedule()/stop()
//! ARMED  (heap non-empty) ── earliest due?  pop + fire (lock released), loop
//!                           └─ not yet      wait until deadline (preemptible)
//! STOPPED                 ── exit; remaining entries are discarded by stop()
//! ```
//!
//! ## Rules
//! - Entries fire in increasing deadline order; equal deadlines fire in schedule order.
//! - A fired job runs on the timer thread with the heap unlocked and must be short.
//!   The dispatcher's jobs only hand the event to the worker pool; if the pool is
//!   already closed the event is dropped with a `tracing` warning, and no
//!   subscriber runs on this thread.
//! - After stop, `schedule` refuses new entries.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::pool::Job;

struct Entry {
    deadline: Instant,
    seq: u64,
    job: Job,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so `BinaryHeap` (a max-heap) pops the earliest deadline first.
    fn cmp(&self, other: &Self) -> CmpOrdering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct Heap {
    entries: BinaryHeap<Entry>,
    next_seq: u64,
}

struct TimerShared {
    heap: Mutex<Heap>,
    wake: Condvar,
    stopped: AtomicBool,
}

impl TimerShared {
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Deadline-ordered scheduler backed by one thread.
pub(crate) struct Timer {
    shared: Arc<TimerShared>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Timer {
    /// Starts the timer thread.
    pub(crate) fn start(thread_name: String) -> io::Result<Self> {
        let shared = Arc::new(TimerShared {
            heap: Mutex::new(Heap::default()),
            wake: Condvar::new(),
            stopped: AtomicBool::new(false),
        });
        let worker = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(thread_name)
            .spawn(move || run(&worker))?;
        Ok(Self {
            shared,
            thread: Mutex::new(Some(handle)),
        })
    }

    /// Schedules `job` to run on the timer thread at `deadline`.
    ///
    /// Returns the job back as `Err` if the timer is stopped.
    pub(crate) fn schedule(&self, deadline: Instant, job: Job) -> Result<(), Job> {
        let mut heap = self.shared.heap.lock();
        if self.shared.is_stopped() {
            return Err(job);
        }
        let seq = heap.next_seq;
        heap.next_seq += 1;
        heap.entries.push(Entry { deadline, seq, job });
        self.shared.wake.notify_one();
        Ok(())
    }

    /// Number of entries waiting for their deadline.
    pub(crate) fn pending(&self) -> usize {
        self.shared.heap.lock().entries.len()
    }

    /// Stops and joins the timer thread, then drops every pending entry.
    ///
    /// Returns the number of discarded entries. Idempotent: later calls return `0`.
    pub(crate) fn stop(&self) -> usize {
        {
            let _heap = self.shared.heap.lock();
            self.shared.stopped.store(true, Ordering::Release);
            self.shared.wake.notify_all();
        }

        if let Some(handle) = self.thread.lock().take() {
            if handle.thread().id() == thread::current().id() {
                // Stopped from a fired job; the loop exits once the job returns.
            } else if handle.join().is_err() {
                tracing::error!("timer thread panicked");
            }
        }

        let discarded = std::mem::take(&mut self.shared.heap.lock().entries);
        discarded.len()
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("pending", &self.pending())
            .field("stopped", &self.shared.is_stopped())
            .finish()
    }
}

fn run(shared: &TimerShared) {
    let mut heap = shared.heap.lock();
    loop {
        if shared.is_stopped() {
            return;
        }
        let Some(deadline) = heap.entries.peek().map(|e| e.deadline) else {
            shared.wake.wait(&mut heap);
            continue;
        };
        if deadline <= Instant::now() {
            if let Some(entry) = heap.entries.pop() {
                MutexGuard::unlocked(&mut heap, entry.job);
            }
        } else {
            let _ = shared.wake.wait_until(&mut heap, deadline);
        }
    }
}
