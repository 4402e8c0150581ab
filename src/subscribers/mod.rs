//! # Subscribers.
//!
//! This module provides the [`Subscribe`] trait and, with the `logging`
//! feature, the built-in [`LogWriter`] for [`RuntimeEvent`](crate::RuntimeEvent)s.
//!
//! ## Subscriber kinds
//! - **Closures** - registered with `Dispatcher::subscribe(|ev: &E| ..)`
//! - **Objects** - types implementing [`Subscribe<E>`], registered with
//!   `Dispatcher::subscribe_with(Arc<S>)`; one type may subscribe to several payloads

#[cfg(feature = "logging")]
mod log;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
