use criterion::{criterion_group, criterion_main, Criterion, BenchmarkId, Throughput};
use fixed_pool::pool::{ThreadPool, Config as PoolConfig};
use std::hint::black_box;

fn create_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .enable_all()
        .build()
        .unwrap()
}

// Benchmark 1: Submit overhead
fn bench_submit_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_overhead");
    let pool = ThreadPool::with_config(PoolConfig::cpu_bound());

    for size in [100, 1000, 10000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(
            BenchmarkId::new("join", size),
            &size,
            |b, &size| {
                b.iter(|| {
                    let handles: Vec<_> = (0..size)
                        .map(|i| pool.submit(move || black_box(i)))
                        .collect();
                    for h in handles {
                        black_box(h.join().unwrap());
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("await", size),
            &size,
            |b, &size| {
                let rt = create_runtime();
                let pool = &pool;
                b.to_async(&rt).iter(|| async move {
                    let handles: Vec<_> = (0..size)
                        .map(|i| pool.submit(move || black_box(i)))
                        .collect();
                    black_box(futures::future::join_all(handles).await);
                });
            },
        );
    }

    group.finish();
}

// Benchmark 2: CPU-bound throughput by pool size
fn bench_compute_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_scaling");
    group.throughput(Throughput::Elements(1000));

    for threads in [1, 2, 4, num_cpus::get()] {
        let pool = ThreadPool::new(threads);

        group.bench_with_input(
            BenchmarkId::new("fib_20", threads),
            &threads,
            |b, _| {
                b.iter(|| {
                    let handles: Vec<_> = (0..1000)
                        .map(|_| pool.submit(|| fib(black_box(20))))
                        .collect();
                    for h in handles {
                        black_box(h.join().unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

// Benchmark 3: Pool startup + shutdown
fn bench_lifecycle(c: &mut Criterion) {
    c.bench_function("construct_and_stop", |b| {
        b.iter(|| {
            let pool = ThreadPool::new(black_box(4));
            pool.stop();
        });
    });
}

fn fib(n: u64) -> u64 {
    if n < 2 { n } else { fib(n - 1) + fib(n - 2) }
}

criterion_group!(
    benches,
    bench_submit_overhead,
    bench_compute_scaling,
    bench_lifecycle,
);
criterion_main!(benches);
