//! # Result handle for submitted tasks.
//!
//! [`TaskHandle`] is the reading side of a one-shot result slot. The worker
//! writes exactly once; the submitter reads once, either by blocking
//! ([`TaskHandle::join`]) or by awaiting the handle.
//!
//! ## States
//! ```text
//! Pending(rx) ──is_finished()──► Ready(result) ──join()/await──► Taken
//!      └──────────────join()/await──────────────────────────────► Taken
//! ```
//!
//! If the task is dropped unexecuted (pool shutdown), the sender side is
//! dropped with it and the handle resolves to [`TaskError::Discarded`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::error::TaskError;

pub(crate) type ResultSender<R> = oneshot::Sender<Result<R, TaskError>>;

enum Slot<R> {
    Pending(oneshot::Receiver<Result<R, TaskError>>),
    Ready(Result<R, TaskError>),
    Taken,
}

/// Handle to the eventual result of a task submitted to a [`WorkerPool`](crate::WorkerPool).
///
/// ### Reading
/// - [`join`](Self::join) blocks the calling thread. Do not call it from async code.
/// - `handle.await` suspends the calling task instead.
/// - [`is_finished`](Self::is_finished) polls without blocking; an observed
///   result is cached and returned by the later read.
///
/// There is no built-in timeout; async callers can wrap the handle in
/// `tokio::time::timeout`.
#[must_use = "dropping a TaskHandle discards the task's result"]
pub struct TaskHandle<R> {
    slot: Slot<R>,
}

// The result is never pinned in place; it is only moved out.
impl<R> Unpin for TaskHandle<R> {}

impl<R> TaskHandle<R> {
    pub(crate) fn channel() -> (ResultSender<R>, Self) {
        let (tx, rx) = oneshot::channel();
        (
            tx,
            Self {
                slot: Slot::Pending(rx),
            },
        )
    }

    /// Returns `true` once the result is available, without blocking.
    pub fn is_finished(&mut self) -> bool {
        if let Slot::Pending(rx) = &mut self.slot {
            match rx.try_recv() {
                Ok(res) => self.slot = Slot::Ready(res),
                Err(TryRecvError::Closed) => self.slot = Slot::Ready(Err(TaskError::Discarded)),
                Err(TryRecvError::Empty) => return false,
            }
        }
        true
    }

    /// Blocks the current thread until the task finished and returns its result.
    ///
    /// # Panics
    /// Panics if called from within an asynchronous execution context; await the
    /// handle there instead.
    pub fn join(self) -> Result<R, TaskError> {
        match self.slot {
            Slot::Pending(rx) => rx.blocking_recv().unwrap_or(Err(TaskError::Discarded)),
            Slot::Ready(res) => res,
            Slot::Taken => Err(TaskError::Discarded),
        }
    }
}

impl<R> Future for TaskHandle<R> {
    type Output = Result<R, TaskError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match std::mem::replace(&mut this.slot, Slot::Taken) {
            Slot::Pending(mut rx) => match rx.poll_unpin(cx) {
                Poll::Ready(res) => Poll::Ready(res.unwrap_or(Err(TaskError::Discarded))),
                Poll::Pending => {
                    this.slot = Slot::Pending(rx);
                    Poll::Pending
                }
            },
            Slot::Ready(res) => Poll::Ready(res),
            Slot::Taken => panic!("`TaskHandle` polled after completion"),
        }
    }
}

impl<R> fmt::Debug for TaskHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.slot {
            Slot::Pending(_) => "pending",
            Slot::Ready(_) => "ready",
            Slot::Taken => "taken",
        };
        f.debug_struct("TaskHandle").field("state", &state).finish()
    }
}
