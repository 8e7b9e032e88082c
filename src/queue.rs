use std::{
    iter,
    sync::atomic::{AtomicUsize, Ordering},
};
use crossbeam::deque::Injector;
use tokio::sync::{futures::Notified, Notify};


pub type Task = Box<dyn FnOnce() + Send + 'static>;


/// Общая FIFO очередь задач без ограничения по размеру.
/// `pop` не блокирует, ожидание идёт через [`TaskQueue::notified`].
pub struct TaskQueue {
    inject: Injector<Task>,
    notify: Notify,
    len: AtomicUsize,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            inject: Injector::new(),
            notify: Notify::new(),
            len: AtomicUsize::new(0),
        }
    }

    #[inline(always)]
    pub fn push(&self, task: Task) {
        self.len.fetch_add(1, Ordering::Relaxed);
        self.inject.push(task);
        // Если никто не ждёт, Notify сохранит permit для следующего ожидающего
        self.notify.notify_one();
    }

    pub fn pop(&self) -> Option<Task> {
        let task = iter::repeat_with(|| self.inject.steal())
            .find(|steal| !steal.is_retry())
            .and_then(|steal| steal.success());

        if task.is_some() {
            self.len.fetch_sub(1, Ordering::Relaxed);
        }
        task
    }

    /// Future, который завершится при следующем `push`
    #[inline]
    pub fn notified(&self) -> Notified<'_> {
        self.notify.notified()
    }

    /// Извлекает все оставшиеся задачи без выполнения
    pub fn drain(&self) -> Vec<Task> {
        iter::from_fn(|| self.pop()).collect()
    }

    /// Приблизительная длина: счётчик обновляется отдельно от очереди.
    /// Для решения "ждать или нет" используйте [`TaskQueue::is_empty`].
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inject.is_empty()
    }
}
