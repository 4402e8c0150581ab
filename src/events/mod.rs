//! Event payload typing and runtime diagnostics.
//!
//! ## Contents
//! - [`Event`], [`EventKey`]: what can be published and how it is keyed
//! - [`RuntimeEvent`], [`RuntimeEventKind`]: diagnostics the dispatcher publishes
//!   about its own failures
//!
//! ## Quick reference
//! - **Publishers of runtime events**: `Dispatcher` (subscriber panics,
//!   rejected publishes, discarded timers, stop).
//! - **Consumers**: any subscriber of `RuntimeEvent`, e.g. `LogWriter`.

mod key;
mod runtime;

pub use key::{Event, EventKey};
pub use runtime::{RuntimeEvent, RuntimeEventKind};
