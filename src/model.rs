use super::errors::PoolError;
use std::{
    fmt,
    panic::Location,
    thread::ThreadId,
    time::SystemTime,
};


/// Состояние воркера в реестре.
/// `Paused` зарезервирован: ни один переход в него не выполняется.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorkerStatus {
    Paused = 0,
    Running = 1,
    Stopped = 2,
}

impl WorkerStatus {
    #[inline]
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => WorkerStatus::Paused,
            1 => WorkerStatus::Running,
            _ => WorkerStatus::Stopped,
        }
    }
}


/// Снимок записи реестра
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerInfo {
    pub id: ThreadId,
    pub index: usize,
    pub status: WorkerStatus,
}


/// Запись журнала ошибок. Неизменяема после создания.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub error: PoolError,
    pub message: String,
    pub timestamp: SystemTime,
    pub worker_id: ThreadId,
    pub location: &'static Location<'static>,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}): {}", self.location.file(), self.location.line(), self.message)
    }
}


#[derive(Debug, Clone)]
pub struct PoolMetrics {
    pub active_tasks: usize,
    pub idle_workers: usize,
    pub queued_tasks: usize,
    pub total_submitted: usize,
    pub completed_tasks: usize,
    pub panicked_tasks: usize,
}

impl PoolMetrics {
    pub fn utilization(&self) -> f64 {
        if self.active_tasks + self.idle_workers == 0 {
            return 0.0;
        }
        self.active_tasks as f64 / (self.active_tasks + self.idle_workers) as f64
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.completed_tasks + self.panicked_tasks;
        if total == 0 {
            return 1.0;
        }
        self.completed_tasks as f64 / total as f64
    }
}
