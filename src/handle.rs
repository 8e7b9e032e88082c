use super::{
    errors::TaskError,
    result::TaskResult,
};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll}
};
use tokio::{
    sync::oneshot::{self, error::TryRecvError},
    time::Duration,
};


/// Handle на результат задачи. Отправитель лежит внутри задачи в очереди,
/// поэтому результат выставляется ровно один раз. Если задача выброшена
/// без выполнения, handle получает [`TaskError::Discarded`].
pub struct TaskHandle<T> {
    receiver: oneshot::Receiver<TaskResult<T>>,
}

impl<T> TaskHandle<T> {

    pub fn new(receiver: oneshot::Receiver<TaskResult<T>>) -> Self {
        Self { receiver }
    }

    /// Блокирует текущий поток до получения результата.
    /// Паникует, если вызван изнутри async-контекста tokio: там используйте `.await`.
    pub fn join(self) -> TaskResult<T> {
        self.receiver
            .blocking_recv()
            .unwrap_or(Err(TaskError::Discarded))
    }

    /// Неблокирующая проверка. `None` пока задача не завершена.
    /// Результат отдаётся один раз, следующие вызовы вернут `Discarded`.
    pub fn try_result(&mut self) -> Option<TaskResult<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(TaskError::Discarded)),
        }
    }

    pub async fn await_timeout(self, timeout: Duration) -> TaskResult<T> {
        match tokio::time::timeout(timeout, self.receiver).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(TaskError::Discarded),
            Err(_) => Err(TaskError::Timeout),
        }
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = TaskResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(res) => Poll::Ready(res.unwrap_or(Err(TaskError::Discarded))),
            Poll::Pending => Poll::Pending,
        }
    }
}
