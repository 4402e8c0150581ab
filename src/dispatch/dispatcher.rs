//! # Dispatcher: typed publish/subscribe over a worker pool and a timer thread.
//!
//! ## Architecture
//! ```text
//! publish(&ev) ─────────► Registry::snapshot ──► S1.on_event ─► S2.on_event ─► ...   (caller's thread)
//!
//! publish_async(ev) ────► WorkerPool::execute ──► worker: publish(&ev)
//!
//! publish_delayed(ev, d) ► Timer::schedule(now + d) ──► timer thread (deadline reached)
//!                                                          └─► publish_async(ev)
//! ```
//!
//! ## Rules
//! - Subscribers of one type run in registration order within a single publish.
//! - Each subscriber is isolated: a panic is caught, logged, published as a
//!   [`RuntimeEvent`], and the next subscriber still runs. The caller of
//!   `publish` then gets [`DispatchError::SubscriberPanicked`].
//! - Panics inside `RuntimeEvent` subscribers are logged but not re-published.
//! - After [`stop`](Dispatcher::stop), async and delayed publishes fail with
//!   [`DispatchError::Stopped`]; synchronous `publish` keeps working.
//! - Stop order: worker pool first (queued deliveries discarded), then the
//!   timer thread (pending timers discarded).
//! - Handlers never run on the timer thread. A delayed event that comes due
//!   after the pool closed is only logged.

use std::any::type_name;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use super::builder::DispatcherBuilder;
use super::registry::{Handler, Registry};
use super::timer::Timer;
use crate::config::DispatcherConfig;
use crate::error::{DispatchError, SubscriberFailure, panic_message};
use crate::events::{Event, EventKey, RuntimeEvent, RuntimeEventKind};
use crate::pool::WorkerPool;
use crate::subscribers::Subscribe;

/// Upper bound for a single delay; longer requests are clamped.
const MAX_DELAY: Duration = Duration::from_secs(60 * 60 * 24 * 365);

static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();

/// Registry plus pool: everything a delivery job needs.
pub(crate) struct Core {
    registry: Registry,
    pool: WorkerPool,
}

impl Core {
    /// Synchronous delivery to a snapshot of the subscribers of `E`.
    fn deliver<E: Event>(&self, event: &E) -> Result<usize, DispatchError> {
        let key = EventKey::of::<E>();
        let handlers = self.registry.snapshot(&key);

        let mut failures = Vec::new();
        for handler in &handlers {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| handler.call(event))) {
                let message = panic_message(&*payload);
                tracing::error!(
                    event = key.name(),
                    subscriber = handler.name(),
                    panic = %message,
                    "subscriber panicked"
                );
                failures.push(SubscriberFailure {
                    subscriber: handler.name(),
                    message,
                });
            }
        }

        if failures.is_empty() {
            return Ok(handlers.len());
        }

        // Prevents loops: failures while delivering runtime events are only logged.
        if !key.is::<RuntimeEvent>() {
            for failure in &failures {
                let ev = RuntimeEvent::subscriber_panicked(
                    key.name(),
                    failure.subscriber,
                    failure.message.clone(),
                );
                let _ = self.deliver(&ev);
            }
        }
        Err(DispatchError::SubscriberPanicked {
            event: key.name(),
            failures,
        })
    }

    /// Pool job performing the synchronous delivery of `event` on a worker.
    fn delivery_job<E: Event>(self: &Arc<Self>, event: E) -> impl FnOnce() + Send + 'static + use<E> {
        let core = Arc::clone(self);
        move || {
            if let Err(err) = core.deliver(&event) {
                tracing::debug!(error = %err, "asynchronous delivery finished with failures");
            }
        }
    }

    /// Hands `event` to the pool; a worker performs the synchronous delivery.
    fn deliver_async<E: Event>(self: &Arc<Self>, event: E) -> Result<(), DispatchError> {
        match self.pool.execute(self.delivery_job(event)) {
            Ok(()) => Ok(()),
            Err(_) => Err(self.rejected::<E>()),
        }
    }

    /// Timer-side forwarding of a due event to the pool.
    ///
    /// Runs on the timer thread, so a closed pool is only logged: no
    /// subscriber (not even a `RuntimeEvent` one) runs here.
    fn forward_due<E: Event>(self: &Arc<Self>, event: E) {
        if self.pool.execute(self.delivery_job(event)).is_err() {
            tracing::warn!(event = type_name::<E>(), "delayed event fired after stop; dropped");
        }
    }

    /// Logs and reports a publish that arrived after stop.
    fn rejected<E: Event>(&self) -> DispatchError {
        let event = type_name::<E>();
        tracing::warn!(event, "publish after stop; event dropped");
        let _ = self.deliver(&RuntimeEvent::publish_rejected(event));
        DispatchError::Stopped { event }
    }
}

/// Typed publish/subscribe dispatcher.
///
/// Construct one per composition root and share it (`Arc<Dispatcher>` or a
/// reference); [`Dispatcher::global`] offers a lazily created process-wide
/// instance for callers that want one.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
/// use taskbus::Dispatcher;
///
/// #[derive(Debug)]
/// struct Login { user: String }
///
/// let bus = Dispatcher::builder().with_workers(2).build()?;
/// let seen = Arc::new(AtomicUsize::new(0));
/// {
///     let seen = Arc::clone(&seen);
///     bus.subscribe(move |ev: &Login| {
///         assert!(!ev.user.is_empty());
///         seen.fetch_add(1, Ordering::SeqCst);
///     });
/// }
///
/// bus.publish(&Login { user: "alice".into() })?;             // runs here
/// bus.publish_async(Login { user: "bob".into() })?;          // runs on a worker
/// bus.publish_delayed(Login { user: "carol".into() }, Duration::from_millis(10))?;
///
/// std::thread::sleep(Duration::from_millis(200));
/// assert_eq!(seen.load(Ordering::SeqCst), 3);
/// bus.stop();
/// # Ok::<(), taskbus::DispatchError>(())
/// ```
pub struct Dispatcher {
    core: Arc<Core>,
    timer: Timer,
    stopped: AtomicBool,
    cfg: DispatcherConfig,
}

impl Dispatcher {
    /// Creates a dispatcher with [`DispatcherConfig::default`].
    pub fn new() -> Result<Self, DispatchError> {
        Self::with_config(DispatcherConfig::default())
    }

    /// Returns a builder for a customized dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Creates a dispatcher and starts its worker and timer threads.
    pub fn with_config(cfg: DispatcherConfig) -> Result<Self, DispatchError> {
        let pool = WorkerPool::with_config(cfg.pool_config())?;
        let timer = Timer::start(cfg.timer_thread_name()).map_err(DispatchError::TimerSpawn)?;
        tracing::debug!(workers = pool.worker_count(), "dispatcher started");
        Ok(Self {
            core: Arc::new(Core {
                registry: Registry::new(),
                pool,
            }),
            timer,
            stopped: AtomicBool::new(false),
            cfg,
        })
    }

    /// Process-wide dispatcher, created with default settings on first access.
    ///
    /// It lives until the process exits and is never dropped; call
    /// [`stop`](Self::stop) explicitly to drain it.
    pub fn global() -> Result<&'static Dispatcher, DispatchError> {
        if let Some(dispatcher) = GLOBAL.get() {
            return Ok(dispatcher);
        }
        let candidate = Dispatcher::new()?;
        // A losing racer's candidate is dropped (and stopped) here.
        Ok(GLOBAL.get_or_init(|| candidate))
    }

    /// Registers a closure for every later publish of `E`.
    pub fn subscribe<E, F>(&self, f: F)
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.core
            .registry
            .add(EventKey::of::<E>(), Handler::from_fn(f));
    }

    /// Registers a [`Subscribe`] implementation for every later publish of `E`.
    pub fn subscribe_with<E, S>(&self, sub: Arc<S>)
    where
        E: Event,
        S: Subscribe<E> + ?Sized,
    {
        self.core
            .registry
            .add(EventKey::of::<E>(), Handler::from_subscriber(sub));
    }

    /// Delivers `event` to every subscriber of `E` on the calling thread.
    ///
    /// Returns the number of subscribers invoked. If any of them panicked, the
    /// others were still invoked and [`DispatchError::SubscriberPanicked`] lists
    /// the failures.
    pub fn publish<E: Event>(&self, event: &E) -> Result<usize, DispatchError> {
        self.core.deliver(event)
    }

    /// Queues delivery of `event` on the worker pool and returns immediately.
    pub fn publish_async<E: Event>(&self, event: E) -> Result<(), DispatchError> {
        if self.is_stopped() {
            return Err(self.core.rejected::<E>());
        }
        self.core.deliver_async(event)
    }

    /// Schedules `event` for asynchronous delivery once `delay` has elapsed.
    ///
    /// The timer thread only forwards the event to the pool; handlers never
    /// run on it. Delays above one year are clamped.
    pub fn publish_delayed<E: Event>(&self, event: E, delay: Duration) -> Result<(), DispatchError> {
        if self.is_stopped() {
            return Err(self.core.rejected::<E>());
        }
        let deadline = Instant::now() + delay.min(MAX_DELAY);
        let core = Arc::clone(&self.core);
        let job = Box::new(move || core.forward_due(event));
        self.timer
            .schedule(deadline, job)
            .map_err(|_| self.core.rejected::<E>())
    }

    /// Stops the dispatcher.
    ///
    /// 1. Shuts down the worker pool (queued deliveries are discarded)
    /// 2. Stops and joins the timer thread (pending timers are discarded)
    /// 3. Publishes `TimersDiscarded` (if any) and `DispatcherStopped` synchronously
    ///
    /// Idempotent and safe to call concurrently; every caller returns after the
    /// threads are joined. Called from one of the dispatcher's own workers, it
    /// does not wait for that worker.
    pub fn stop(&self) {
        let first = !self.stopped.swap(true, Ordering::AcqRel);

        self.core.pool.shutdown();
        let discarded = self.timer.stop();

        if discarded > 0 {
            tracing::debug!(discarded, "pending timers discarded on stop");
            let ev = RuntimeEvent::new(RuntimeEventKind::TimersDiscarded).with_count(discarded);
            let _ = self.core.deliver(&ev);
        }
        if first {
            tracing::debug!("dispatcher stopped");
            let _ = self
                .core
                .deliver(&RuntimeEvent::new(RuntimeEventKind::DispatcherStopped));
        }
    }

    /// Returns `true` once [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Number of subscribers registered for `E`.
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.core.registry.count(&EventKey::of::<E>())
    }

    /// Number of delayed events waiting for their deadline.
    pub fn pending_timers(&self) -> usize {
        self.timer.pending()
    }

    /// Number of workers serving asynchronous delivery.
    pub fn worker_count(&self) -> usize {
        self.core.pool.worker_count()
    }

    /// Configuration this dispatcher was built with.
    pub fn config(&self) -> &DispatcherConfig {
        &self.cfg
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("workers", &self.worker_count())
            .field("pending_timers", &self.pending_timers())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    struct Ping;

    #[derive(Debug, Clone, PartialEq)]
    struct Tagged(&'static str);

    fn dispatcher() -> Dispatcher {
        Dispatcher::builder()
            .with_workers(2)
            .with_thread_name("test-dispatch")
            .build()
            .expect("dispatcher")
    }

    fn counter(bus: &Dispatcher) -> Arc<AtomicUsize> {
        let n = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&n);
        bus.subscribe(move |_: &Ping| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        n
    }

    fn runtime_log(bus: &Dispatcher) -> Arc<Mutex<Vec<RuntimeEvent>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = Arc::clone(&log);
        bus.subscribe(move |ev: &RuntimeEvent| l.lock().push(ev.clone()));
        log
    }

    #[test]
    fn test_sync_publish_is_visible_immediately() {
        let bus = dispatcher();
        let n = counter(&bus);
        for _ in 0..3 {
            assert_eq!(bus.publish(&Ping).expect("publish"), 1);
        }
        assert_eq!(n.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_publish_without_subscribers_delivers_to_nobody() {
        let bus = dispatcher();
        assert_eq!(bus.publish(&Tagged("lonely")).expect("publish"), 0);
        assert_eq!(bus.subscriber_count::<Tagged>(), 0);
    }

    #[test]
    fn test_subscribers_run_in_registration_order() {
        let bus = dispatcher();
        let order = Arc::new(Mutex::new(Vec::new()));
        for name in ["S1", "S2", "S3"] {
            let order = Arc::clone(&order);
            bus.subscribe(move |_: &Ping| order.lock().push(name));
        }
        bus.publish(&Ping).expect("publish");
        assert_eq!(*order.lock(), vec!["S1", "S2", "S3"]);
        assert_eq!(bus.subscriber_count::<Ping>(), 3);
    }

    #[test]
    fn test_types_are_routed_separately() {
        let bus = dispatcher();
        let pings = counter(&bus);
        let tags = Arc::new(Mutex::new(Vec::new()));
        {
            let tags = Arc::clone(&tags);
            bus.subscribe(move |t: &Tagged| tags.lock().push(t.0));
        }
        bus.publish(&Tagged("a")).expect("publish");
        bus.publish(&Ping).expect("publish");
        assert_eq!(pings.load(Ordering::SeqCst), 1);
        assert_eq!(*tags.lock(), vec!["a"]);
    }

    #[test]
    fn test_async_publish_runs_on_a_worker() {
        let bus = dispatcher();
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        bus.subscribe(move |t: &Tagged| {
            let name = thread::current().name().map(str::to_owned);
            let _ = tx.lock().send((t.0, name));
        });

        bus.publish_async(Tagged("async")).expect("publish_async");
        let (tag, thread_name) = rx.recv_timeout(Duration::from_secs(2)).expect("delivered");
        assert_eq!(tag, "async");
        let thread_name = thread_name.expect("workers are named");
        assert!(thread_name.starts_with("test-dispatch-worker-"), "{thread_name}");
    }

    #[test]
    fn test_delayed_publish_is_delivered_on_a_worker_not_the_timer() {
        let bus = dispatcher();
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        bus.subscribe(move |t: &Tagged| {
            let name = thread::current().name().map(str::to_owned);
            let _ = tx.lock().send((t.0, name));
        });

        bus.publish_delayed(Tagged("delayed"), Duration::from_millis(10))
            .expect("publish_delayed");
        let (tag, thread_name) = rx.recv_timeout(Duration::from_secs(2)).expect("delivered");
        assert_eq!(tag, "delayed");
        let thread_name = thread_name.expect("workers are named");
        assert!(thread_name.starts_with("test-dispatch-worker-"), "{thread_name}");
        assert!(!thread_name.starts_with("test-dispatch-timer"), "{thread_name}");
    }

    #[test]
    fn test_due_event_into_closed_pool_runs_no_subscriber() {
        let core = Arc::new(Core {
            registry: Registry::new(),
            pool: WorkerPool::new(1).expect("pool"),
        });
        let calls = Arc::new(AtomicUsize::new(0));
        for key in [EventKey::of::<Ping>(), EventKey::of::<RuntimeEvent>()] {
            let calls = Arc::clone(&calls);
            let handler = if key.is::<Ping>() {
                Handler::from_fn(move |_: &Ping| {
                    calls.fetch_add(1, Ordering::SeqCst);
                })
            } else {
                Handler::from_fn(move |_: &RuntimeEvent| {
                    calls.fetch_add(1, Ordering::SeqCst);
                })
            };
            core.registry.add(key, handler);
        }
        core.pool.shutdown();

        core.forward_due(Ping);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // The caller-facing path still reports the rejection.
        assert!(core.deliver_async(Ping).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delayed_events_fire_in_deadline_order() {
        let bus = dispatcher();
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        bus.subscribe(move |t: &Tagged| {
            let _ = tx.lock().send((t.0, Instant::now()));
        });

        let start = Instant::now();
        bus.publish_delayed(Tagged("first-50ms"), Duration::from_millis(50))
            .expect("delayed");
        bus.publish_delayed(Tagged("second-10ms"), Duration::from_millis(10))
            .expect("delayed");
        assert_eq!(bus.pending_timers(), 2);

        let a = rx.recv_timeout(Duration::from_secs(2)).expect("first receipt");
        let b = rx.recv_timeout(Duration::from_secs(2)).expect("second receipt");
        assert_eq!(a.0, "second-10ms");
        assert_eq!(b.0, "first-50ms");
        assert!(a.1 < b.1);
        assert!(a.1.duration_since(start) >= Duration::from_millis(10));
        assert!(b.1.duration_since(start) >= Duration::from_millis(50));
    }

    #[test]
    fn test_delayed_fire_order_with_counter() {
        let bus = Dispatcher::builder().with_workers(1).build().expect("dispatcher");
        let seq = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let (seq, seen) = (Arc::clone(&seq), Arc::clone(&seen));
            bus.subscribe(move |t: &Tagged| {
                let n = seq.fetch_add(1, Ordering::SeqCst);
                seen.lock().push((n, t.0));
            });
        }
        bus.publish_delayed(Tagged("d2"), Duration::from_millis(40)).expect("delayed");
        bus.publish_delayed(Tagged("d1"), Duration::from_millis(20)).expect("delayed");

        let deadline = Instant::now() + Duration::from_secs(2);
        while seen.lock().len() < 2 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(*seen.lock(), vec![(0, "d1"), (1, "d2")]);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let bus = dispatcher();
        let runtime = runtime_log(&bus);
        bus.subscribe(|_: &Ping| panic!("bad subscriber"));
        let n = counter(&bus);

        let err = bus.publish(&Ping).expect_err("panic surfaces");
        match err {
            DispatchError::SubscriberPanicked { event, failures } => {
                assert!(event.ends_with("Ping"));
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].message, "bad subscriber");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(n.load(Ordering::SeqCst), 1, "later subscriber still ran");

        let runtime = runtime.lock();
        assert_eq!(runtime.len(), 1);
        assert!(runtime[0].is_subscriber_panic());
        assert_eq!(runtime[0].reason.as_deref(), Some("bad subscriber"));
    }

    #[test]
    fn test_panicking_runtime_subscriber_does_not_recurse() {
        let bus = dispatcher();
        let calls = Arc::new(AtomicUsize::new(0));
        {
            let calls = Arc::clone(&calls);
            bus.subscribe(move |_: &RuntimeEvent| {
                calls.fetch_add(1, Ordering::SeqCst);
                panic!("diagnostics are broken");
            });
        }
        bus.subscribe(|_: &Ping| panic!("bad subscriber"));

        assert!(bus.publish(&Ping).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_async_and_delayed_are_rejected_after_stop() {
        let bus = dispatcher();
        let runtime = runtime_log(&bus);
        let n = counter(&bus);
        bus.stop();
        assert!(bus.is_stopped());

        assert!(matches!(
            bus.publish_async(Ping),
            Err(DispatchError::Stopped { .. })
        ));
        assert!(matches!(
            bus.publish_delayed(Ping, Duration::from_millis(1)),
            Err(DispatchError::Stopped { .. })
        ));
        assert_eq!(bus.publish(&Ping).expect("sync still works"), 1);
        assert_eq!(n.load(Ordering::SeqCst), 1);

        let kinds: Vec<_> = runtime.lock().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RuntimeEventKind::DispatcherStopped,
                RuntimeEventKind::PublishRejected,
                RuntimeEventKind::PublishRejected,
            ]
        );
    }

    #[test]
    fn test_stop_discards_pending_timers() {
        let bus = dispatcher();
        let runtime = runtime_log(&bus);
        let n = counter(&bus);
        bus.publish_delayed(Ping, Duration::from_secs(60)).expect("delayed");
        bus.publish_delayed(Ping, Duration::from_secs(60)).expect("delayed");
        bus.stop();

        assert_eq!(bus.pending_timers(), 0);
        assert_eq!(n.load(Ordering::SeqCst), 0);
        let runtime = runtime.lock();
        let discarded = runtime
            .iter()
            .find(|e| e.kind == RuntimeEventKind::TimersDiscarded)
            .expect("timers discarded event");
        assert_eq!(discarded.count, Some(2));
    }

    #[test]
    fn test_stop_is_idempotent_and_concurrent_safe() {
        let bus = Arc::new(dispatcher());
        let runtime = runtime_log(&bus);
        for _ in 0..50 {
            bus.publish_async(Ping).expect("publish_async");
        }
        let stoppers: Vec<_> = (0..4)
            .map(|_| {
                let bus = Arc::clone(&bus);
                thread::spawn(move || bus.stop())
            })
            .collect();
        for s in stoppers {
            s.join().expect("stopper");
        }
        bus.stop();
        assert!(bus.is_stopped());
        let stopped = runtime
            .lock()
            .iter()
            .filter(|e| e.kind == RuntimeEventKind::DispatcherStopped)
            .count();
        assert_eq!(stopped, 1);
    }

    #[test]
    fn test_stop_from_async_subscriber_does_not_deadlock() {
        let bus = Arc::new(dispatcher());
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        {
            let weak = Arc::downgrade(&bus);
            bus.subscribe(move |_: &Ping| {
                if let Some(bus) = weak.upgrade() {
                    bus.stop();
                }
                let _ = tx.lock().send(());
            });
        }
        bus.publish_async(Ping).expect("publish_async");
        rx.recv_timeout(Duration::from_secs(2)).expect("subscriber ran");
        bus.stop();
        assert!(bus.is_stopped());
    }

    #[test]
    fn test_concurrent_subscribe_and_publish() {
        let bus = Arc::new(dispatcher());
        let hits = Arc::new(AtomicUsize::new(0));
        let subscribers: Vec<_> = (0..4)
            .map(|_| {
                let bus = Arc::clone(&bus);
                let hits = Arc::clone(&hits);
                thread::spawn(move || {
                    for _ in 0..25 {
                        let hits = Arc::clone(&hits);
                        bus.subscribe(move |_: &Ping| {
                            hits.fetch_add(1, Ordering::Relaxed);
                        });
                    }
                })
            })
            .collect();
        let publisher = {
            let bus = Arc::clone(&bus);
            thread::spawn(move || {
                for _ in 0..100 {
                    bus.publish(&Ping).expect("publish");
                }
            })
        };
        for s in subscribers {
            s.join().expect("subscriber thread");
        }
        publisher.join().expect("publisher thread");

        assert_eq!(bus.subscriber_count::<Ping>(), 100);
        let before = hits.load(Ordering::Relaxed);
        assert_eq!(bus.publish(&Ping).expect("publish"), 100);
        assert_eq!(hits.load(Ordering::Relaxed), before + 100);
    }

    #[test]
    fn test_subscribe_with_trait_object() {
        struct Recorder(Mutex<Vec<&'static str>>);
        impl Subscribe<Tagged> for Recorder {
            fn on_event(&self, ev: &Tagged) {
                self.0.lock().push(ev.0);
            }
            fn name(&self) -> &'static str {
                "recorder"
            }
        }

        let bus = dispatcher();
        let rec = Arc::new(Recorder(Mutex::new(Vec::new())));
        let erased: Arc<dyn Subscribe<Tagged>> = rec.clone();
        bus.subscribe_with(erased);
        bus.publish(&Tagged("x")).expect("publish");
        assert_eq!(*rec.0.lock(), vec!["x"]);
    }

    #[test]
    fn test_global_is_a_single_instance() {
        let a = Dispatcher::global().expect("global");
        let b = Dispatcher::global().expect("global");
        assert!(std::ptr::eq(a, b));
        assert!(!a.is_stopped());
    }

    #[test]
    fn test_every_async_publish_is_delivered() {
        let bus = dispatcher();
        let n = counter(&bus);
        for _ in 0..200 {
            bus.publish_async(Ping).expect("publish_async");
        }
        let deadline = Instant::now() + Duration::from_secs(5);
        while n.load(Ordering::SeqCst) < 200 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(n.load(Ordering::SeqCst), 200);
    }
}
