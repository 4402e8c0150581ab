//! # Diagnostics emitted by the dispatcher about itself.
//!
//! The dispatcher publishes [`RuntimeEvent`]s through its own registry, so
//! anyone can observe them with `dispatcher.subscribe(|ev: &RuntimeEvent| ..)`.
//! They cover failures that have no caller to return an error to.
//!
//! ## Ordering guarantees
//! Each event carries a process-wide sequence number (`seq`) that increases
//! monotonically; use it to restore order across threads.
//!
//! ## Example
//! ```rust
//! use taskbus::{RuntimeEvent, RuntimeEventKind};
//!
//! let ev = RuntimeEvent::new(RuntimeEventKind::SubscriberPanicked)
//!     .with_event("app::Ping")
//!     .with_subscriber("metrics")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, RuntimeEventKind::SubscriberPanicked);
//! assert_eq!(ev.subscriber, Some("metrics"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for runtime event ordering.
static RUNTIME_EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeEventKind {
    /// A subscriber panicked while handling an event. Delivery continued.
    ///
    /// Sets:
    /// - `event`: payload type name
    /// - `subscriber`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// An asynchronous or delayed publish arrived after stop and was dropped.
    ///
    /// Sets:
    /// - `event`: payload type name
    /// - `reason`: `"stopped"`
    PublishRejected,

    /// Pending delayed events were discarded by stop.
    ///
    /// Sets:
    /// - `count`: number of discarded timer entries
    TimersDiscarded,

    /// The dispatcher finished stopping (pool and timer thread joined).
    DispatcherStopped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`RuntimeEventKind`]
#[derive(Debug, Clone)]
pub struct RuntimeEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: RuntimeEventKind,
    /// Type name of the payload involved, if any.
    pub event: Option<&'static str>,
    /// Subscriber name, if any.
    pub subscriber: Option<&'static str>,
    /// Human-readable reason (panic message, rejection cause).
    pub reason: Option<Arc<str>>,
    /// Item count (discarded timers).
    pub count: Option<usize>,
}

impl RuntimeEvent {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: RuntimeEventKind) -> Self {
        Self {
            seq: RUNTIME_EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            event: None,
            subscriber: None,
            reason: None,
            count: None,
        }
    }

    /// Attaches the payload type name.
    #[inline]
    pub fn with_event(mut self, event: &'static str) -> Self {
        self.event = Some(event);
        self
    }

    /// Attaches a subscriber name.
    #[inline]
    pub fn with_subscriber(mut self, subscriber: &'static str) -> Self {
        self.subscriber = Some(subscriber);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an item count.
    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(event: &'static str, subscriber: &'static str, info: String) -> Self {
        RuntimeEvent::new(RuntimeEventKind::SubscriberPanicked)
            .with_event(event)
            .with_subscriber(subscriber)
            .with_reason(info)
    }

    /// Creates a publish-rejected event.
    #[inline]
    pub fn publish_rejected(event: &'static str) -> Self {
        RuntimeEvent::new(RuntimeEventKind::PublishRejected)
            .with_event(event)
            .with_reason("stopped")
    }

    /// Returns `true` for [`RuntimeEventKind::SubscriberPanicked`].
    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, RuntimeEventKind::SubscriberPanicked)
    }
}
