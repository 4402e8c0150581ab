//! # Type-keyed subscriber registry.
//!
//! Maps [`EventKey`] → ordered list of type-erased [`Handler`]s. Each handler
//! closes over a concrete `Subscribe<E>` and downcasts the `&dyn Any` payload
//! back to `E` before calling it.
//!
//! ## Rules
//! - Lists are created lazily on the first subscription and only ever grow.
//! - [`Registry::snapshot`] copies the list under the lock; delivery runs unlocked,
//!   so a subscription racing a publish may or may not see that publish.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::events::{Event, EventKey};
use crate::subscribers::Subscribe;

type ErasedFn = dyn Fn(&dyn Any) + Send + Sync;

/// Type-erased subscriber.
#[derive(Clone)]
pub(crate) struct Handler {
    name: &'static str,
    call: Arc<ErasedFn>,
}

impl Handler {
    pub(crate) fn from_subscriber<E, S>(sub: Arc<S>) -> Self
    where
        E: Event,
        S: Subscribe<E> + ?Sized,
    {
        let name = sub.name();
        Self {
            name,
            call: Arc::new(move |payload: &dyn Any| {
                // Keys and closures share the same `E`, so the downcast cannot miss.
                if let Some(ev) = payload.downcast_ref::<E>() {
                    sub.on_event(ev);
                } else {
                    tracing::error!(subscriber = name, "payload type does not match subscriber");
                }
            }),
        }
    }

    pub(crate) fn from_fn<E, F>(f: F) -> Self
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let name = std::any::type_name::<F>();
        Self {
            name,
            call: Arc::new(move |payload: &dyn Any| {
                if let Some(ev) = payload.downcast_ref::<E>() {
                    f(ev);
                } else {
                    tracing::error!(subscriber = name, "payload type does not match subscriber");
                }
            }),
        }
    }

    #[inline]
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub(crate) fn call(&self, payload: &dyn Any) {
        (self.call)(payload)
    }
}

/// Subscriber lists per payload type, behind one mutex.
#[derive(Default)]
pub(crate) struct Registry {
    handlers: Mutex<HashMap<EventKey, Vec<Handler>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the list for `key`.
    pub(crate) fn add(&self, key: EventKey, handler: Handler) {
        self.handlers.lock().entry(key).or_default().push(handler);
    }

    /// Copy of the current list for `key`, in registration order.
    pub(crate) fn snapshot(&self, key: &EventKey) -> Vec<Handler> {
        self.handlers
            .lock()
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of subscribers for `key`.
    pub(crate) fn count(&self, key: &EventKey) -> usize {
        self.handlers.lock().get(key).map_or(0, Vec::len)
    }
}
