//! Error types used by the worker pool and the dispatcher.
//!
//! This module defines three enums:
//!
//! - [`PoolError`]: the pool refused or failed to accept work.
//! - [`TaskError`]: a submitted task did not produce a value.
//! - [`DispatchError`]: publishing an event failed.
//!
//! All of them provide `as_label` for logs/metrics.

use std::io;

use thiserror::Error;

/// # Errors produced by the worker pool itself.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PoolError {
    /// The pool has been shut down; the work was not enqueued.
    #[error("worker pool is closed")]
    Closed,

    /// The OS refused to create a worker thread.
    #[error("failed to spawn worker thread {index}: {source}")]
    Spawn {
        /// Index of the worker that could not be started.
        index: usize,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl PoolError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskbus::PoolError;
    ///
    /// assert_eq!(PoolError::Closed.as_label(), "pool_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PoolError::Closed => "pool_closed",
            PoolError::Spawn { .. } => "pool_spawn_failed",
        }
    }
}

/// # Errors observed when reading a [`TaskHandle`](crate::TaskHandle).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The task panicked; the worker survived and the panic message was captured.
    #[error("task panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// The task was still queued when the pool shut down and never ran.
    #[error("task discarded before it ran")]
    Discarded,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskbus::TaskError;
    ///
    /// assert_eq!(TaskError::Discarded.as_label(), "task_discarded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Discarded => "task_discarded",
        }
    }

    /// Builds a [`TaskError::Panicked`] from a payload returned by `catch_unwind`.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        TaskError::Panicked {
            message: panic_message(payload),
        }
    }
}

/// A subscriber that panicked while handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberFailure {
    /// Subscriber name (see [`Subscribe::name`](crate::Subscribe::name)).
    pub subscriber: &'static str,
    /// Panic payload rendered as text.
    pub message: String,
}

/// # Errors produced by the dispatcher.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The dispatcher was stopped; the event was not scheduled.
    #[error("dispatcher is stopped; {event} dropped")]
    Stopped {
        /// Type name of the dropped event.
        event: &'static str,
    },

    /// One or more subscribers panicked. Every other subscriber was still invoked.
    #[error("{} subscriber(s) panicked while handling {event}", .failures.len())]
    SubscriberPanicked {
        /// Type name of the event being delivered.
        event: &'static str,
        /// Failed subscribers in registration order.
        failures: Vec<SubscriberFailure>,
    },

    /// The dispatcher's worker pool could not be created.
    #[error("dispatcher pool: {0}")]
    Pool(#[from] PoolError),

    /// The timer thread could not be created.
    #[error("failed to spawn timer thread: {0}")]
    TimerSpawn(#[source] io::Error),
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskbus::DispatchError;
    ///
    /// let err = DispatchError::Stopped { event: "Ping" };
    /// assert_eq!(err.as_label(), "dispatch_stopped");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Stopped { .. } => "dispatch_stopped",
            DispatchError::SubscriberPanicked { .. } => "dispatch_subscriber_panicked",
            DispatchError::Pool(_) => "dispatch_pool",
            DispatchError::TimerSpawn(_) => "dispatch_timer_spawn",
        }
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
