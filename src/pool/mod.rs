//! # Worker pool: queue, workers, and result handles.
//!
//! - [`TaskQueue`]: non-blocking FIFO of boxed jobs
//! - [`WorkerPool`]: fixed set of OS threads draining the queue
//! - [`TaskHandle`]: one-shot result of a submitted task (blocking `join` or `.await`)
//!
//! Blocking on "work available" lives in the worker loop (`worker.rs`), not in the queue.

mod handle;
mod queue;
mod worker;
mod worker_pool;

pub use handle::TaskHandle;
pub use queue::{Job, TaskQueue};
pub use worker_pool::WorkerPool;
