//! Low-level synchronization primitives.
//!
//! - [`SpinLock`] / [`SpinLockGuard`]: busy-waiting lock for tiny critical sections.

mod spin;

pub use spin::{SpinLock, SpinLockGuard};
