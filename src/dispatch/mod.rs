//! Typed publish/subscribe dispatching.
//!
//! ## Contents
//! - [`Dispatcher`]: subscribe, synchronous/asynchronous/delayed publish, stop
//! - [`DispatcherBuilder`]: configuration and up-front subscribers
//!
//! Internals: a type-keyed registry of erased handlers and a single timer
//! thread ordering delayed publishes by deadline.

mod builder;
mod dispatcher;
mod registry;
mod timer;

pub use builder::DispatcherBuilder;
pub use dispatcher::Dispatcher;
