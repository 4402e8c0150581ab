//! # Typed event subscriber trait.
//!
//! Provides [`Subscribe`], the object form of a subscriber. Plain closures are
//! registered with [`Dispatcher::subscribe`](crate::Dispatcher::subscribe);
//! implement this trait when the subscriber carries state or needs a readable
//! name in diagnostics.
//!
//! ## Rules
//! - `on_event` runs on the publisher's thread for synchronous publishes and on
//!   a pool worker for asynchronous and delayed ones.
//! - Subscribers of one event type are invoked in registration order.
//! - A panic is caught and reported as
//!   [`RuntimeEventKind::SubscriberPanicked`](crate::RuntimeEventKind::SubscriberPanicked);
//!   the remaining subscribers still run.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use taskbus::{Dispatcher, Subscribe};
//!
//! struct Ping;
//!
//! #[derive(Default)]
//! struct Counter(AtomicUsize);
//!
//! impl Subscribe<Ping> for Counter {
//!     fn on_event(&self, _ev: &Ping) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//!
//!     fn name(&self) -> &'static str { "counter" }
//! }
//!
//! let bus = Dispatcher::new()?;
//! let counter = Arc::new(Counter::default());
//! bus.subscribe_with(Arc::clone(&counter));
//! bus.publish(&Ping)?;
//! assert_eq!(counter.0.load(Ordering::Relaxed), 1);
//! # Ok::<(), taskbus::DispatchError>(())
//! ```

use crate::events::Event;

/// Subscriber for payloads of type `E`.
///
/// ### Implementation requirements
/// - Keep `on_event` short when events are published asynchronously; it
///   occupies a pool worker while it runs.
/// - Handle errors internally; do not panic.
pub trait Subscribe<E: Event>: Send + Sync + 'static {
    /// Handles a single event.
    fn on_event(&self, event: &E);

    /// Returns the subscriber name used in logs and panic reports.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose; override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
