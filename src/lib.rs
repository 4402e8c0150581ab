//! # taskbus
//!
//! **Taskbus** is a small concurrency toolkit: a fixed-size worker pool with
//! awaitable task handles, and a typed publish/subscribe dispatcher that can
//! deliver events synchronously, on the pool, or after a delay.
//!
//! ## Architecture
//! ```text
//!   submit(f) ──► TaskQueue (FIFO) ──► worker 0..N ──► f() ──► TaskHandle<R>
//!                                                              (join / .await)
//!
//!   Dispatcher
//!   ├─ Registry: EventKey ─► [S1, S2, ...]   (registration order)
//!   ├─ publish(&ev)          ─► S1, S2 ... on the caller's thread
//!   ├─ publish_async(ev)     ─► WorkerPool ─► S1, S2 ... on a worker
//!   └─ publish_delayed(ev,d) ─► Timer (min-heap by deadline) ─► publish_async(ev)
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types                                  |
//! |-----------------|----------------------------------------------------------|--------------------------------------------|
//! | **Pool**        | Persistent workers, FIFO queue, panic-isolated tasks.    | [`WorkerPool`], [`TaskHandle`], [`TaskQueue`] |
//! | **Dispatch**    | Typed subscribers, sync/async/delayed publish, stop.     | [`Dispatcher`], [`Subscribe`]              |
//! | **Diagnostics** | Failures with no caller to return to, as events.         | [`RuntimeEvent`], [`RuntimeEventKind`]     |
//! | **Sync**        | Busy-waiting mutual exclusion for tiny critical sections.| [`SpinLock`], [`SpinLockGuard`]            |
//! | **Errors**      | Typed errors per surface.                                | [`PoolError`], [`TaskError`], [`DispatchError`] |
//! | **Configuration** | Worker counts and thread naming.                       | [`PoolConfig`], [`DispatcherConfig`]       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskbus::{Dispatcher, WorkerPool};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = WorkerPool::new(4)?;
//!     let handles: Vec<_> = (1..=3u64)
//!         .map(|n| pool.submit(move || n * n))
//!         .collect::<Result<_, _>>()?;
//!     let squares: Vec<u64> = handles
//!         .into_iter()
//!         .map(|h| h.join())
//!         .collect::<Result<_, _>>()?;
//!     assert_eq!(squares, vec![1, 4, 9]);
//!     pool.shutdown();
//!
//!     #[derive(Debug)]
//!     struct Tick(u32);
//!
//!     let bus = Dispatcher::new()?;
//!     bus.subscribe(|t: &Tick| println!("tick {}", t.0));
//!     bus.publish(&Tick(1))?;
//!     bus.publish_delayed(Tick(2), Duration::from_millis(5))?;
//!     std::thread::sleep(Duration::from_millis(50));
//!     bus.stop();
//!     Ok(())
//! }
//! ```
mod config;
mod dispatch;
mod error;
mod events;
mod pool;
mod subscribers;
mod sync;

// ---- Public re-exports ----

pub use config::{DispatcherConfig, PoolConfig};
pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use error::{DispatchError, PoolError, SubscriberFailure, TaskError};
pub use events::{Event, EventKey, RuntimeEvent, RuntimeEventKind};
pub use pool::{Job, TaskHandle, TaskQueue, WorkerPool};
pub use subscribers::Subscribe;
pub use sync::{SpinLock, SpinLockGuard};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
