//! # Runtime configuration.
//!
//! Provides [`PoolConfig`] for a standalone [`WorkerPool`](crate::WorkerPool)
//! and [`DispatcherConfig`] for a [`Dispatcher`](crate::Dispatcher).
//!
//! ## Sentinel values
//! - `workers = 0` → one worker per available hardware thread
//! - `stack_size = None` → platform default stack size

use std::num::NonZeroUsize;
use std::thread;

/// Configuration for a [`WorkerPool`](crate::WorkerPool).
///
/// ## Field semantics
/// - `workers`: number of persistent worker threads (`0` = hardware parallelism)
/// - `thread_name`: prefix for worker thread names (`{thread_name}-{index}`)
/// - `stack_size`: optional stack size in bytes for each worker
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads spawned at construction.
    ///
    /// - `0` = [`std::thread::available_parallelism`] (falls back to 1)
    /// - `n > 0` = exactly `n` workers
    pub workers: usize,

    /// Prefix used to name worker threads.
    pub thread_name: String,

    /// Stack size for each worker thread, in bytes.
    pub stack_size: Option<usize>,
}

impl PoolConfig {
    /// Creates a config with `workers` threads and default naming.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    /// Returns the effective number of workers, resolving the `0` sentinel.
    #[inline]
    pub fn worker_count(&self) -> usize {
        resolve_workers(self.workers)
    }
}

impl Default for PoolConfig {
    /// Default configuration:
    ///
    /// - `workers = 0` (hardware parallelism)
    /// - `thread_name = "taskbus-worker"`
    /// - `stack_size = None`
    fn default() -> Self {
        Self {
            workers: 0,
            thread_name: "taskbus-worker".to_string(),
            stack_size: None,
        }
    }
}

/// Configuration for a [`Dispatcher`](crate::Dispatcher).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Workers backing asynchronous and delayed delivery (`0` = hardware parallelism).
    pub workers: usize,

    /// Prefix for the dispatcher's thread names.
    ///
    /// Workers are named `{thread_name}-worker-{index}`, the timer thread
    /// `{thread_name}-timer`.
    pub thread_name: String,
}

impl DispatcherConfig {
    /// Returns the effective number of workers, resolving the `0` sentinel.
    #[inline]
    pub fn worker_count(&self) -> usize {
        resolve_workers(self.workers)
    }

    /// Derives the configuration of the internal worker pool.
    pub(crate) fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            workers: self.workers,
            thread_name: format!("{}-worker", self.thread_name),
            stack_size: None,
        }
    }

    /// Name of the timer thread.
    pub(crate) fn timer_thread_name(&self) -> String {
        format!("{}-timer", self.thread_name)
    }
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `workers = 4`
    /// - `thread_name = "taskbus-dispatch"`
    fn default() -> Self {
        Self {
            workers: 4,
            thread_name: "taskbus-dispatch".to_string(),
        }
    }
}

fn resolve_workers(workers: usize) -> usize {
    if workers == 0 {
        thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    } else {
        workers
    }
}
