//! # Example: delayed_events
//!
//! Schedules reminders with [`Dispatcher::publish_delayed`] and shows that they
//! fire in deadline order, not in the order they were scheduled. Stopping
//! early discards whatever is still pending, which the built-in [`LogWriter`]
//! reports.
//!
//! ## Run
//! ```bash
//! cargo run --example delayed_events --features logging
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use taskbus::{Dispatcher, LogWriter, RuntimeEvent};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Reminder(&'static str);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let bus = Dispatcher::builder()
        .with_subscriber::<RuntimeEvent, _>(Arc::new(LogWriter::new()))
        .build()?;

    let start = Instant::now();
    bus.subscribe(move |r: &Reminder| {
        println!("{:>5}ms  {}", start.elapsed().as_millis(), r.0);
    });

    bus.publish_delayed(Reminder("stand up"), Duration::from_millis(300))?;
    bus.publish_delayed(Reminder("drink water"), Duration::from_millis(100))?;
    bus.publish_delayed(Reminder("stretch"), Duration::from_millis(200))?;
    bus.publish_delayed(Reminder("go home"), Duration::from_secs(3600))?;
    println!("scheduled {} reminders", bus.pending_timers());

    std::thread::sleep(Duration::from_millis(400));
    bus.stop(); // "go home" is discarded: [timers-discarded] count=1
    Ok(())
}
