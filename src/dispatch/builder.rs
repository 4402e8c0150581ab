use std::sync::Arc;

use super::dispatcher::Dispatcher;
use crate::config::DispatcherConfig;
use crate::error::DispatchError;
use crate::events::Event;
use crate::subscribers::Subscribe;

type Registration = Box<dyn FnOnce(&Dispatcher) + Send>;

/// Builder for constructing a [`Dispatcher`] with subscribers attached up front.
pub struct DispatcherBuilder {
    cfg: DispatcherConfig,
    registrations: Vec<Registration>,
}

impl DispatcherBuilder {
    /// Creates a builder with [`DispatcherConfig::default`].
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Creates a builder starting from the given configuration.
    pub fn with_config(cfg: DispatcherConfig) -> Self {
        Self {
            cfg,
            registrations: Vec::new(),
        }
    }

    /// Sets the number of asynchronous delivery workers (`0` = available parallelism).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.cfg.workers = workers;
        self
    }

    /// Sets the thread name prefix for workers and the timer thread.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.cfg.thread_name = name.into();
        self
    }

    /// Registers `sub` for events of type `E` once the dispatcher is built.
    ///
    /// Subscribers added here come before any added later through
    /// [`Dispatcher::subscribe`], in the order given.
    pub fn with_subscriber<E, S>(mut self, sub: Arc<S>) -> Self
    where
        E: Event,
        S: Subscribe<E> + ?Sized,
    {
        self.registrations
            .push(Box::new(move |bus: &Dispatcher| bus.subscribe_with::<E, S>(sub)));
        self
    }

    /// Builds the dispatcher, starting its threads and attaching the subscribers.
    pub fn build(self) -> Result<Dispatcher, DispatchError> {
        let dispatcher = Dispatcher::with_config(self.cfg)?;
        for register in self.registrations {
            register(&dispatcher);
        }
        Ok(dispatcher)
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
