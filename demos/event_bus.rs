//! # Example: event_bus
//!
//! Wires a few subscribers into a [`Dispatcher`] and publishes events
//! synchronously and asynchronously.
//!
//! Demonstrates how to:
//! - Subscribe closures and [`Subscribe`] objects to typed payloads.
//! - See that a panicking subscriber does not stop the others.
//! - Observe dispatcher diagnostics through [`RuntimeEvent`].
//!
//! ## Run
//! ```bash
//! RUST_LOG=taskbus=debug cargo run --example event_bus
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use taskbus::{Dispatcher, RuntimeEvent, Subscribe};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct OrderPlaced {
    id: u64,
    cents: u64,
}

#[derive(Default)]
struct Revenue {
    orders: AtomicU64,
    cents: AtomicU64,
}

impl Subscribe<OrderPlaced> for Revenue {
    fn on_event(&self, ev: &OrderPlaced) {
        self.orders.fetch_add(1, Ordering::Relaxed);
        self.cents.fetch_add(ev.cents, Ordering::Relaxed);
    }

    fn name(&self) -> &'static str {
        "revenue"
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let revenue = Arc::new(Revenue::default());
    let bus = Dispatcher::builder()
        .with_workers(2)
        .with_subscriber::<OrderPlaced, _>(Arc::clone(&revenue))
        .build()?;

    bus.subscribe(|ev: &OrderPlaced| println!("order #{} placed ({} cents)", ev.id, ev.cents));
    bus.subscribe(|ev: &OrderPlaced| {
        if ev.cents == 0 {
            panic!("free order #{}", ev.id);
        }
    });
    bus.subscribe(|ev: &RuntimeEvent| println!("runtime: {:?} {:?}", ev.kind, ev.reason));

    bus.publish(&OrderPlaced { id: 1, cents: 1250 })?;
    if let Err(err) = bus.publish(&OrderPlaced { id: 2, cents: 0 }) {
        println!("publish reported: {err}");
    }
    for id in 3..=6 {
        bus.publish_async(OrderPlaced { id, cents: 100 * id })?;
    }

    std::thread::sleep(Duration::from_millis(100));
    bus.stop();

    println!(
        "revenue: {} orders, {} cents",
        revenue.orders.load(Ordering::Relaxed),
        revenue.cents.load(Ordering::Relaxed),
    );
    Ok(())
}
