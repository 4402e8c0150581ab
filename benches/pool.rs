//! # Pool and dispatcher throughput benchmarks
//!
//! - `pool_submit_join`: pool size × task count sweep; each task sorts 1000
//!   random integers and the batch is joined before the iteration ends.
//! - `dispatch_publish_async`: events delivered through the pool per second.
//!
//! ## Run
//! ```bash
//! cargo bench --bench pool
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::Rng;
use taskbus::{Dispatcher, WorkerPool};

const SORT_LEN: usize = 1000;

/// Simulated heavy task: fill a vector with random values and sort it.
fn heavy_task(n: usize) -> usize {
    let mut rng = rand::rng();
    let mut v: Vec<u32> = (0..n).map(|_| rng.random_range(0..1000)).collect();
    v.sort_unstable();
    v.len()
}

fn benchmark_pool_submit_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_submit_join");
    group.measurement_time(Duration::from_secs(10));

    for workers in [4usize, 8, 16] {
        for tasks in [500usize] {
            let pool = WorkerPool::new(workers).expect("pool");
            group.throughput(Throughput::Elements(tasks as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("workers_{workers}"), tasks),
                &tasks,
                |b, &tasks| {
                    b.iter(|| {
                        let handles: Vec<_> = (0..tasks)
                            .map(|_| pool.submit(|| heavy_task(SORT_LEN)).expect("submit"))
                            .collect();
                        for h in handles {
                            h.join().expect("task");
                        }
                    });
                },
            );
            pool.shutdown();
        }
    }
    group.finish();
}

fn benchmark_publish_async(c: &mut Criterion) {
    struct Tick;

    let mut group = c.benchmark_group("dispatch_publish_async");
    for workers in [1usize, 4] {
        let events = 1000usize;
        let bus = Dispatcher::builder()
            .with_workers(workers)
            .build()
            .expect("dispatcher");
        let seen = Arc::new(AtomicUsize::new(0));
        {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |_: &Tick| {
                seen.fetch_add(1, Ordering::Relaxed);
            });
        }

        group.throughput(Throughput::Elements(events as u64));
        group.bench_with_input(BenchmarkId::new("workers", workers), &events, |b, &events| {
            b.iter(|| {
                let target = seen.load(Ordering::Relaxed) + events;
                for _ in 0..events {
                    bus.publish_async(Tick).expect("publish_async");
                }
                while seen.load(Ordering::Relaxed) < target {
                    std::hint::spin_loop();
                }
            });
        });
        bus.stop();
    }
    group.finish();
}

criterion_group!(benches, benchmark_pool_submit_join, benchmark_publish_async);
criterion_main!(benches);
