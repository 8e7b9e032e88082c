use super::{
    error_log::ErrorLog,
    errors::{PoolError, TaskError},
    handle::TaskHandle,
    model::{
        ErrorRecord,
        PoolMetrics,
        WorkerInfo,
        WorkerStatus,
    },
    queue::{Task, TaskQueue},
    registry::{StatusCell, ThreadRegistry},
    result::TaskResult,
    worker::{Counters, Worker},
};
use std::{
    any::Any,
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{self, Ordering},
        Arc, Condvar, Mutex, MutexGuard,
    },
    thread::{self, JoinHandle, ThreadId},
};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};


/// Конфигурация пула потоков
#[derive(Debug, Clone)]
pub struct Config {
    /// Количество воркеров. `0` - определить по числу аппаратных потоков.
    pub num_threads: usize,
    /// Префикс имени потока, итоговое имя `<thread_name>-<index>`
    pub thread_name: String,
    pub stack_size: Option<usize>,
    /// Источник числа аппаратных потоков, `0` означает "неизвестно"
    pub concurrency_probe: fn() -> usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: 0,
            thread_name: "pool-worker".to_string(),
            stack_size: None,
            concurrency_probe: num_cpus::get,
        }
    }
}

impl Config {
    pub fn cpu_bound() -> Self {
        Self {
            num_threads: num_cpus::get(),
            ..Default::default()
        }
    }

    pub fn io_bound() -> Self {
        Self {
            num_threads: num_cpus::get() * 2, // Для I/O-bound задач
            ..Default::default()
        }
    }
}


#[inline(always)]
fn unlikely(b: bool) -> bool {
    #[cold]
    fn cold() {}
    if b { cold() }
    b
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}


struct WorkerSlot {
    index: usize,
    id: ThreadId,
    handle: Option<JoinHandle<()>>,
}


/// Слоты воркеров и число вызовов `stop`, которые ещё присоединяют потоки
struct Workers {
    slots: Vec<WorkerSlot>,
    joining: usize,
}


/// Пул с фиксированным набором потоков-воркеров.
///
/// Задачи выполняются в порядке отправки (FIFO), результат приходит через
/// [`TaskHandle`]. Внутренние сбои не пробрасываются вызывающему, а копятся
/// в журнале, доступном через [`ThreadPool::errors`].
/// При drop пул вызывает [`ThreadPool::stop`].
pub struct ThreadPool {
    queue: Arc<TaskQueue>,
    cancellation_token: CancellationToken,
    registry: ThreadRegistry,
    errors: ErrorLog,
    counters: Arc<Counters>,
    workers: Mutex<Workers>,
    all_joined: Condvar,
}

impl ThreadPool {
    pub fn new(num_threads: usize) -> Self {
        let config = Config {
            num_threads,
            ..Default::default()
        };
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        let errors = ErrorLog::new();
        let num_threads = if config.num_threads != 0 {
            config.num_threads
        } else {
            match (config.concurrency_probe)() {
                0 => {
                    errors.push(PoolError::UnknownConcurrency);
                    1
                }
                n => n,
            }
        };

        let queue = Arc::new(TaskQueue::new());
        let cancellation_token = CancellationToken::new();
        let registry = ThreadRegistry::new();
        let counters = Arc::new(Counters::default());
        let mut workers = Vec::with_capacity(num_threads);

        // Запускаем воркеры
        for index in 0..num_threads {
            let status = Arc::new(StatusCell::new(WorkerStatus::Running));
            let worker = Worker::new(
                index,
                queue.clone(),
                cancellation_token.child_token(),
                status.clone(),
                counters.clone(),
            );

            let mut builder = thread::Builder::new().name(format!("{}-{}", config.thread_name, index));
            if let Some(size) = config.stack_size {
                builder = builder.stack_size(size);
            }

            match builder.spawn(move || worker.run()) {
                Ok(handle) => {
                    let id = handle.thread().id();
                    registry.register(id, index, status);
                    workers.push(WorkerSlot {
                        index,
                        id,
                        handle: Some(handle),
                    });
                }
                Err(err) => errors.push(PoolError::SpawnFailed {
                    index,
                    reason: err.to_string(),
                }),
            }
        }

        info!(workers = workers.len(), "thread pool started");

        Self {
            queue,
            cancellation_token,
            registry,
            errors,
            counters,
            workers: Mutex::new(Workers {
                slots: workers,
                joining: 0,
            }),
            all_joined: Condvar::new(),
        }
    }

    /// Ставит задачу в очередь и сразу возвращает handle на её результат.
    /// Паника внутри задачи приходит в handle как [`TaskError::Panic`].
    /// После [`ThreadPool::stop`] задача не ставится в очередь,
    /// handle сразу завершается с [`TaskError::Discarded`].
    pub fn submit<F, R>(&self, f: F) -> TaskHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel::<TaskResult<R>>();

        if unlikely(self.cancellation_token.is_cancelled()) {
            debug!("pool is stopped, task discarded");
            return TaskHandle::new(rx);
        }

        self.counters.total_submitted.fetch_add(1, Ordering::Relaxed);
        let counters = self.counters.clone();

        let task: Task = Box::new(move || {
            let result: TaskResult<R> = panic::catch_unwind(AssertUnwindSafe(f))
                .map_err(|payload| TaskError::Panic(panic_message(&*payload)));

            if result.is_ok() {
                counters.completed_tasks.fetch_add(1, Ordering::Relaxed);
            } else {
                counters.panicked_tasks.fetch_add(1, Ordering::Relaxed);
            }

            let _ = tx.send(result);
        });

        self.queue.push(task);

        // stop мог выполнить drain между проверкой флага и push
        atomic::fence(Ordering::SeqCst);
        if unlikely(self.cancellation_token.is_cancelled()) {
            self.queue.drain();
        }

        TaskHandle::new(rx)
    }

    /// Сбрасывает флаг работы и дожидается завершения каждого воркера.
    /// Задача, уже взятая воркером, доводится до конца; оставшиеся в очереди
    /// выбрасываются. Повторный или параллельный вызов ждёт, пока другой
    /// вызов присоединит свои воркеры. Вызов из задачи не ждёт.
    pub fn stop(&self) {
        self.cancellation_token.cancel();
        atomic::fence(Ordering::SeqCst);

        let current = thread::current().id();
        let (pending, from_worker): (Vec<(usize, ThreadId, JoinHandle<()>)>, bool) = {
            let mut workers = self.lock_workers();
            let from_worker = workers.slots.iter().any(|slot| slot.id == current);
            let pending: Vec<_> = workers
                .slots
                .iter_mut()
                .filter_map(|slot| {
                    if slot.id == current && slot.handle.is_some() {
                        // Вызов из задачи: поток не может присоединить сам себя,
                        // его присоединит следующий stop или drop
                        self.errors.push(PoolError::JoinFailed {
                            index: slot.index,
                            reason: "worker cannot join itself".to_string(),
                        });
                        return None;
                    }
                    slot.handle.take().map(|handle| (slot.index, slot.id, handle))
                })
                .collect();
            if !pending.is_empty() {
                workers.joining += 1;
            }
            (pending, from_worker)
        };

        let joined_any = !pending.is_empty();
        for (index, id, handle) in pending {
            if let Err(payload) = handle.join() {
                self.errors.push(PoolError::JoinFailed {
                    index,
                    reason: panic_message(&*payload),
                });
            }
            self.registry.set_status(&id, WorkerStatus::Stopped);
            debug!(worker = index, "worker joined");
        }

        let mut workers = self.lock_workers();
        if joined_any {
            workers.joining -= 1;
            self.all_joined.notify_all();
        }
        if !from_worker {
            while workers.joining > 0 {
                workers = self
                    .all_joined
                    .wait(workers)
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
            }
        }
        drop(workers);

        let discarded = self.queue.drain();
        if !discarded.is_empty() {
            debug!(count = discarded.len(), "discarded queued tasks");
        }
    }

    fn lock_workers(&self) -> MutexGuard<'_, Workers> {
        self.workers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        !self.cancellation_token.is_cancelled()
    }

    /// Снимок журнала ошибок в порядке добавления
    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.errors.snapshot()
    }

    pub fn registered_threads(&self) -> HashMap<ThreadId, WorkerInfo> {
        self.registry.snapshot()
    }

    #[inline]
    pub fn threads_count(&self) -> usize {
        self.registry.len()
    }

    #[inline]
    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            active_tasks: self.counters.active_tasks.load(Ordering::Relaxed),
            idle_workers: self.counters.idle_workers.load(Ordering::Relaxed),
            queued_tasks: self.queue.len(),
            total_submitted: self.counters.total_submitted.load(Ordering::Relaxed),
            completed_tasks: self.counters.completed_tasks.load(Ordering::Relaxed),
            panicked_tasks: self.counters.panicked_tasks.load(Ordering::Relaxed),
        }
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.stop();
    }
}
