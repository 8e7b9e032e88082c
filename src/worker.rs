use super::{
    model::WorkerStatus,
    queue::{Task, TaskQueue},
    registry::StatusCell,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};


const SPIN_ROUNDS: usize = 2;


/// Счётчики пула, общие для всех воркеров
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) active_tasks: AtomicUsize,
    pub(crate) idle_workers: AtomicUsize,
    pub(crate) total_submitted: AtomicUsize,
    pub(crate) completed_tasks: AtomicUsize,
    pub(crate) panicked_tasks: AtomicUsize,
}


pub(crate) struct Worker {
    index: usize,
    queue: Arc<TaskQueue>,
    token: CancellationToken,
    status: Arc<StatusCell>,
    counters: Arc<Counters>,
}

impl Worker {
    pub(crate) fn new(
        index: usize,
        queue: Arc<TaskQueue>,
        token: CancellationToken,
        status: Arc<StatusCell>,
        counters: Arc<Counters>,
    ) -> Self {
        Self { index, queue, token, status, counters }
    }

    /// Тело потока воркера: Running -> (цикл) -> Stopped.
    /// Статус Running выставляется пулом при создании ячейки.
    pub(crate) fn run(self) {
        debug!(worker = self.index, "worker started");

        futures::executor::block_on(self.worker_loop());

        self.status.set(WorkerStatus::Stopped);
        debug!(worker = self.index, "worker stopped");
    }

    async fn worker_loop(&self) {
        'outer: loop {
            if self.token.is_cancelled() {
                break;
            }

            if let Some(task) = self.queue.pop() {
                // Флаг мог сброситься между проверкой и pop: новая задача уже не стартует
                if self.token.is_cancelled() {
                    drop(task);
                    break;
                }
                self.execute(task);
                continue;
            }

            for _ in 0..SPIN_ROUNDS {
                if !self.queue.is_empty() {
                    continue 'outer;
                }
                std::hint::spin_loop();
            }

            // Подписываемся до повторной проверки очереди, чтобы не потерять push
            let notified = self.queue.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if !self.queue.is_empty() {
                continue;
            }

            self.counters.idle_workers.fetch_add(1, Ordering::Release);
            let cancelled = tokio::select! {
                biased;
                _ = self.token.cancelled() => true,
                _ = notified => false,
            };
            self.counters.idle_workers.fetch_sub(1, Ordering::Acquire);

            if cancelled {
                break 'outer;
            }
        }
    }

    #[inline]
    fn execute(&self, task: Task) {
        trace!(worker = self.index, "executing task");
        self.counters.active_tasks.fetch_add(1, Ordering::Relaxed);
        task();
        self.counters.active_tasks.fetch_sub(1, Ordering::Release);
    }
}
