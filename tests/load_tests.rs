#[cfg(test)]
mod tests {
    use fixed_pool::{
    errors::TaskError,
    pool::{
        Config,
        ThreadPool,
        },
    };
    use std::{
        sync::{Arc, Mutex},
        thread,
        time::{Duration, Instant},
    };

    fn measure<F, T>(name: &str, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();
        println!("✓ {}: {:?}", name, elapsed);
        result
    }

    #[test]
    fn load_test_1_many_small_tasks() {
        println!("\n=== LOAD TEST 1: 100k быстрых задач ===");
        let pool = ThreadPool::with_config(Config::cpu_bound());

        let sum: u64 = measure("100k tasks", || {
            let handles: Vec<_> = (0..100_000u64)
                .map(|i| pool.submit(move || i))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(sum, (0..100_000u64).sum::<u64>());
        assert!(pool.errors().is_empty());
    }

    #[test]
    fn load_test_2_blocking_tasks() {
        println!("\n=== LOAD TEST 2: 1k задач по 1ms на io_bound пуле ===");
        let pool = ThreadPool::with_config(Config::io_bound());

        let results = measure("1k tasks @ 1ms", || {
            let handles: Vec<_> = (0..1_000)
                .map(|i| pool.submit(move || {
                    thread::sleep(Duration::from_millis(1));
                    i * 2
                }))
                .collect();
            handles.into_iter().map(|h| h.join()).collect::<Vec<_>>()
        });

        assert_eq!(results.len(), 1_000);
        assert!(results.iter().enumerate().all(|(i, r)| *r == Ok(i * 2)));
    }

    #[test]
    fn load_test_3_concurrent_submitters() {
        println!("\n=== LOAD TEST 3: 8 потоков отправляют в один пул ===");
        let pool = Arc::new(ThreadPool::new(1));
        let log = Arc::new(Mutex::new(Vec::new()));

        measure("8 x 1k submits", || {
            let submitters: Vec<_> = (0..8)
                .map(|producer| {
                    let pool = pool.clone();
                    let log = log.clone();
                    thread::spawn(move || {
                        let handles: Vec<_> = (0..1_000)
                            .map(|seq| {
                                let log = log.clone();
                                pool.submit(move || log.lock().unwrap().push((producer, seq)))
                            })
                            .collect();
                        for handle in handles {
                            handle.join().unwrap();
                        }
                    })
                })
                .collect();

            for submitter in submitters {
                submitter.join().unwrap();
            }
        });

        // Один воркер: порядок внутри каждого отправителя сохраняется
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 8_000);
        for producer in 0..8 {
            let seqs: Vec<_> = log
                .iter()
                .filter(|(p, _)| *p == producer)
                .map(|(_, seq)| *seq)
                .collect();
            assert_eq!(seqs, (0..1_000).collect::<Vec<_>>());
        }
    }

    #[test]
    fn load_test_4_panics_under_load() {
        println!("\n=== LOAD TEST 4: паники под нагрузкой ===");
        let pool = ThreadPool::new(4);

        let results: Vec<_> = (0..2_000)
            .map(|i| pool.submit(move || {
                if i % 100 == 0 {
                    panic!("Test panic");
                }
                i
            }))
            .map(|h| h.join())
            .collect();

        let panics = results
            .iter()
            .filter(|r| matches!(r, Err(TaskError::Panic(_))))
            .count();
        assert_eq!(panics, 20);
        assert_eq!(pool.metrics().completed_tasks, 1_980);
        assert!(pool.errors().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn load_test_5_await_from_runtime() {
        println!("\n=== LOAD TEST 5: 10k handles через await ===");
        let pool = ThreadPool::new(4);

        let start = Instant::now();
        let handles: Vec<_> = (0..10_000u64)
            .map(|i| pool.submit(move || i % 7))
            .collect();
        let results = futures::future::join_all(handles).await;
        println!("✓ 10k awaited: {:?}", start.elapsed());

        let sum: u64 = results.into_iter().map(|r| r.unwrap()).sum();
        assert_eq!(sum, (0..10_000u64).map(|i| i % 7).sum::<u64>());
    }

    #[test]
    fn load_test_6_stop_under_load() {
        println!("\n=== LOAD TEST 6: остановка с полной очередью ===");
        let pool = ThreadPool::new(2);

        let handles: Vec<_> = (0..50_000)
            .map(|i| pool.submit(move || i))
            .collect();

        measure("stop", || pool.stop());

        let (done, discarded) = handles.into_iter().map(|h| h.join()).fold((0, 0), |(d, x), r| match r {
            Ok(_) => (d + 1, x),
            Err(TaskError::Discarded) => (d, x + 1),
            Err(e) => panic!("unexpected error: {:?}", e),
        });
        println!("  выполнено: {}, выброшено: {}", done, discarded);

        assert_eq!(done + discarded, 50_000);
        assert_eq!(pool.metrics().completed_tasks, done);
        assert_eq!(pool.metrics().queued_tasks, 0);
    }
}
