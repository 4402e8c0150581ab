//! # Example: pool_basics
//!
//! Submits CPU work to a [`WorkerPool`] and collects the results both by
//! blocking on the handles and by awaiting them from async code.
//!
//! Demonstrates how to:
//! - Size a pool through [`PoolConfig`].
//! - Get results back with [`TaskHandle::join`] and `.await`.
//! - Observe a panicking task as a [`TaskError`] without losing the worker.
//!
//! ## Flow
//! ```text
//! submit(f) ──► TaskQueue ──► worker ──► f() ──► TaskHandle
//!                                                  ├─► join()    (blocking, outside any runtime)
//!                                                  └─► .await    (async)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=taskbus=debug cargo run --example pool_basics
//! ```

use std::time::Duration;

use taskbus::{PoolConfig, TaskError, WorkerPool};
use tracing_subscriber::EnvFilter;

fn fib(n: u64) -> u64 {
    match n {
        0 | 1 => n,
        _ => fib(n - 1) + fib(n - 2),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut cfg = PoolConfig::with_workers(4);
    cfg.thread_name = "fib".into();
    let pool = WorkerPool::with_config(cfg)?;
    println!("pool started with {} workers", pool.worker_count());

    // Blocking joins, from a plain thread.
    let handles = (20..26u64)
        .map(|n| pool.submit(move || (n, fib(n))))
        .collect::<Result<Vec<_>, _>>()?;
    for handle in handles {
        let (n, value) = handle.join()?;
        println!(" ├─► fib({n}) = {value}");
    }

    // Awaiting from async code; `join` must not be called inside the runtime.
    let slow = pool.submit(|| {
        std::thread::sleep(Duration::from_millis(50));
        "slept on a worker"
    })?;
    let rt = tokio::runtime::Builder::new_current_thread().build()?;
    println!(" ├─► {}", rt.block_on(slow)?);

    // A panic is reported through the handle; the worker keeps serving.
    let bad = pool.submit(|| -> u32 { panic!("bad input") })?;
    match bad.join() {
        Err(TaskError::Panicked { message }) => println!(" ├─► task panicked: {message}"),
        other => println!(" ├─► unexpected: {other:?}"),
    }
    println!(" └─► still alive: {}", pool.submit(|| 2 + 2)?.join()?);

    pool.shutdown();
    println!("completed {} tasks", pool.completed());
    Ok(())
}
