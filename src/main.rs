use fixed_pool::ThreadPool;
use std::time::Instant;
use tracing_subscriber::EnvFilter;


fn main(){
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let now = Instant::now();
    let pool = ThreadPool::new(0);

    let handles: Vec<_> = (0..1_000_000u64)
        .map(|i| pool.submit(move || i * 2))
        .collect();

    let sum: u64 = handles
        .into_iter()
        .filter_map(|handle| handle.join().ok())
        .sum();

    pool.stop();
    println!("sum: {}, workers: {}, errors: {}", sum, pool.threads_count(), pool.errors().len());
    println!("elapsed: {:?}",now.elapsed());
}
