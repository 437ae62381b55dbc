//! Benchmarks for the scheduler's hot paths.
//!
//! Benchmarks cover:
//! - Spinlock acquire/release (uncontended)
//! - Bounded queue push/pop throughput
//! - End-to-end submit-and-drain at varying worker counts

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use taskbank::{BoundedQueue, Scheduler, SchedulerConfig, SpinLock, Task};

// ============================================================================
// Spinlock
// ============================================================================

fn bench_spinlock(c: &mut Criterion) {
    let mut group = c.benchmark_group("spinlock");

    group.bench_function("uncontended_lock_unlock", |b| {
        let lock = SpinLock::new(0u64);
        b.iter(|| {
            let mut guard = lock.lock();
            *guard += 1;
            black_box(*guard);
        });
    });

    group.bench_function("try_lock_uncontended", |b| {
        let lock = SpinLock::new(0u64);
        b.iter(|| {
            let guard = lock.try_lock();
            black_box(guard.is_some());
        });
    });

    group.finish();
}

// ============================================================================
// Bounded queue
// ============================================================================

fn bench_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue");
    group.throughput(Throughput::Elements(1));

    group.bench_function("try_push_try_pop", |b| {
        let queue = BoundedQueue::new(128);
        b.iter(|| {
            let _ = queue.try_push(black_box(1u64));
            black_box(queue.try_pop());
        });
    });

    group.bench_function("try_emplace_try_pop_task", |b| {
        let queue: BoundedQueue<Task> = BoundedQueue::new(128);
        b.iter(|| {
            queue.try_emplace(|| {});
            black_box(queue.try_pop());
        });
    });

    group.finish();
}

// ============================================================================
// End-to-end scheduling
// ============================================================================

fn bench_submit_and_drain(c: &mut Criterion) {
    const BATCH: usize = 100;

    let mut group = c.benchmark_group("scheduler");
    group.throughput(Throughput::Elements(BATCH as u64));

    for workers in [1usize, 2, 4] {
        group.bench_with_input(
            BenchmarkId::new("submit_and_drain", workers),
            &workers,
            |b, &workers| {
                let scheduler = Scheduler::with_config(
                    SchedulerConfig::new()
                        .with_worker_count(workers)
                        .with_priority_levels(3)
                        .with_queue_capacity(256),
                )
                .unwrap();
                let done = Arc::new(AtomicUsize::new(0));

                b.iter(|| {
                    let before = done.load(Ordering::Relaxed);
                    for i in 0..BATCH {
                        let done = Arc::clone(&done);
                        scheduler
                            .submit(i % 3, move || {
                                done.fetch_add(1, Ordering::Relaxed);
                            })
                            .unwrap();
                    }
                    while done.load(Ordering::Relaxed) < before + BATCH {
                        std::thread::yield_now();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_spinlock, bench_queue, bench_submit_and_drain);
criterion_main!(benches);
